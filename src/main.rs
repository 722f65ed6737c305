//! SCIF CLI - inspect and activate scientific filesystem apps

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use scif::cli::{Args, SubCommand};
use scif::{format_output, AppContext, OutputFormat, Recipe, Report, ScifSettings, Transition};

fn main() {
    let args = Args::parse();
    scif::logging::init_subscriber(if args.verbose { "debug" } else { "warn" });

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Settings from `SCIF_*` variables, with explicit flags on top
fn settings(args: &Args) -> ScifSettings {
    let mut settings = ScifSettings::from_env();
    if let Some(ref base) = args.base {
        settings.rebase(base);
    }
    if let Some(ref entrypoint) = args.entrypoint {
        settings.entrypoint = entrypoint.clone();
    }
    if let Some(ref entryfolder) = args.entryfolder {
        settings.entryfolder = Some(entryfolder.clone());
    }
    settings
}

fn run(args: Args) -> anyhow::Result<()> {
    let recipe = args.recipe.clone().or_else(|| {
        std::env::var_os("SCIF_RECIPE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });
    let registry = match recipe {
        Some(ref path) => Recipe::from_path(path)
            .with_context(|| format!("failed to load recipe {}", path.display()))?
            .into_registry(),
        None => Default::default(),
    };

    let mut ctx = AppContext::new(registry, settings(&args))?;
    let format = if args.json { OutputFormat::Json } else { OutputFormat::Human };

    let report = match args.command {
        SubCommand::Apps => Report::Apps {
            apps: ctx.apps().into_iter().map(str::to_string).collect(),
        },

        SubCommand::Inspect { app, attributes } => {
            if args.strict && ctx.app(&app).is_none() {
                return Err(scif::ScifError::UnknownApp(app).into());
            }
            let definition = ctx.inspect_tokens(&app, &attributes);
            Report::Inspect { app, definition }
        }

        SubCommand::Activate { app, cmd } => {
            let transition = ctx.activate(app.as_deref(), cmd.as_deref())?;
            state_report(&ctx, transition, args.strict)?
        }

        SubCommand::Deactivate { app } => {
            let transition = ctx.deactivate(&app);
            state_report(&ctx, transition, args.strict)?
        }

        SubCommand::Env { app, isolated } => {
            let environment = match app.as_deref() {
                Some(name) if isolated => {
                    if ctx.app(name).is_none() {
                        tracing::warn!("{} is not an installed SCIF app", name);
                        check(Transition::UnknownApp { app: name.to_string() }, args.strict)?;
                    }
                    ctx.app_environment(name, true)
                }
                Some(name) => {
                    check(ctx.activate(Some(name), None)?, args.strict)?;
                    ctx.environment()
                }
                None => ctx.environment(),
            };
            Report::Environment { app, environment }
        }
    };

    println!("{}", format_output(&report, &format));
    Ok(())
}

fn state_report(ctx: &AppContext, transition: Transition, strict: bool) -> anyhow::Result<Report> {
    let transition = check(transition, strict)?;
    Ok(Report::State {
        transition,
        state: ctx.state(),
    })
}

/// Unknown apps were already reported as warnings; `--strict` makes them fatal
fn check(transition: Transition, strict: bool) -> anyhow::Result<Transition> {
    if strict {
        Ok(transition.into_result()?)
    } else {
        Ok(transition)
    }
}
