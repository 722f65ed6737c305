//! Entry point parsing

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScifError};

/// A parsed executable invocation: program followed by its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryPoint(Vec<String>);

impl EntryPoint {
    /// The program to execute
    pub fn program(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments following the program
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Split a raw command string into an entry point.
///
/// Tokens are whitespace separated; a command with no tokens is an error.
pub fn parse_entrypoint(raw: &str) -> Result<EntryPoint> {
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        return Err(ScifError::EmptyEntrypoint);
    }
    Ok(EntryPoint(parts))
}
