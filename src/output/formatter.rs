//! Output formatting

use serde::Serialize;

use crate::context::{ContextState, Transition};
use crate::environment::Environment;
use crate::output::human::format_human;
use crate::output::json::format_json;
use crate::registry::AppDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Something the CLI reports back to the user
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// Installed app names
    Apps { apps: Vec<String> },
    /// Result of an inspection
    Inspect { app: String, definition: AppDefinition },
    /// Context after an activation or deactivation
    State {
        transition: Transition,
        state: ContextState,
    },
    /// Environment variables
    Environment {
        app: Option<String>,
        environment: Environment,
    },
}

pub fn format_output(report: &Report, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(report),
        OutputFormat::Json => format_json(report),
    }
}
