//! Parser for app environment scripts (`environment.sh`)

use std::sync::OnceLock;

use regex::Regex;

use super::Environment;

fn assignment() -> &'static Regex {
    static ASSIGNMENT: OnceLock<Regex> = OnceLock::new();
    ASSIGNMENT.get_or_init(|| {
        Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)=(.*)$")
            .unwrap_or_else(|e| panic!("invalid assignment pattern: {}", e))
    })
}

/// Parse `KEY=VALUE` and `export KEY=VALUE` lines.
///
/// Blank lines, comments and anything that is not an assignment are
/// skipped. A single pair of surrounding quotes is stripped from values.
pub fn parse_env_script(content: &str) -> Environment {
    let mut env = Environment::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(caps) = assignment().captures(trimmed) {
            env.insert(&caps[1], unquote(caps[2].trim()));
        }
    }

    env
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
