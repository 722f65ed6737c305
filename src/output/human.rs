//! Human-readable output formatting

use crate::context::Transition;
use crate::output::formatter::Report;
use crate::registry::AppDefinition;

pub fn format_human(report: &Report) -> String {
    match report {
        Report::Apps { apps } => {
            if apps.is_empty() {
                return "No apps installed".to_string();
            }
            let mut output = format!("[apps] {}\n", apps.len());
            for (i, app) in apps.iter().enumerate() {
                output.push_str(&format!("{:>4}  {}\n", i + 1, app));
            }
            output
        }
        Report::Inspect { app, definition } => format_definition(app, definition),
        Report::State { transition, state } => {
            let mut output = match transition {
                Transition::Activated { app } => format!("Activated {}\n", app),
                Transition::Reset => "Reset to default context\n".to_string(),
                Transition::UnknownApp { app } => {
                    format!("{} is not an installed SCIF app\n", app)
                }
            };
            output.push_str(&"-".repeat(output.len() - 1));
            output.push('\n');
            output.push_str(&format!(
                "Active:      {}\n",
                state.active.as_deref().unwrap_or("(none)")
            ));
            output.push_str(&format!("Entry point: {}\n", state.entry_point));
            output.push_str(&format!(
                "Entry folder: {}\n",
                state
                    .entry_folder
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(unset)".to_string())
            ));
            output
        }
        Report::Environment { app, environment } => {
            let mut output = match app {
                Some(app) => format!("Environment for {}\n", app),
                None => "Environment\n".to_string(),
            };
            output.push_str(&"-".repeat(output.len() - 1));
            output.push('\n');
            for (key, value) in environment.iter() {
                output.push_str(&format!("{}={}\n", key, value));
            }
            output
        }
    }
}

fn format_definition(app: &str, definition: &AppDefinition) -> String {
    if definition.is_empty() {
        return format!("{}: nothing to show", app);
    }

    let mut output = format!("{}\n{}\n", app, "-".repeat(app.len()));

    if let Some(run) = &definition.apprun {
        output.push_str(&format!("%apprun\n  {}\n", run));
    }
    if let Some(files) = &definition.appfiles {
        output.push_str("%appfiles\n");
        for file in files {
            output.push_str(&format!("  {}\n", file));
        }
    }
    if let Some(labels) = &definition.applabels {
        output.push_str("%applabels\n");
        for (key, value) in labels {
            output.push_str(&format!("  {} {}\n", key, value));
        }
    }
    if let Some(env) = &definition.appenv {
        output.push_str("%appenv\n");
        for (key, value) in env {
            output.push_str(&format!("  {}={}\n", key, value));
        }
    }
    if let Some(steps) = &definition.appinstall {
        output.push_str("%appinstall\n");
        for step in steps {
            output.push_str(&format!("  {}\n", step));
        }
    }
    if let Some(help) = &definition.apphelp {
        output.push_str(&format!("%apphelp\n  {}\n", help));
    }
    if let Some(test) = &definition.apptest {
        output.push_str(&format!("%apptest\n  {}\n", test));
    }

    output
}
