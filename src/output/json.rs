//! JSON output formatting

use serde_json::{json, Value};

use crate::output::formatter::Report;

pub fn format_json(report: &Report) -> String {
    let data: Value = match report {
        Report::Apps { apps } => json!({ "apps": apps }),
        Report::Inspect { app, definition } => json!({ app: definition }),
        Report::Environment { environment, .. } => {
            serde_json::to_value(environment).unwrap_or(json!(null))
        }
        other => serde_json::to_value(other).unwrap_or(json!(null)),
    };

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}
