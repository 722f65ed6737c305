//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scif")]
#[command(author, version, about = "Inspect and activate scientific filesystem apps", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Recipe file (JSON) describing the apps [env: SCIF_RECIPE]
    #[arg(long, short, global = true)]
    pub recipe: Option<PathBuf>,

    /// Root of the scientific filesystem [env: SCIF_BASE]
    #[arg(long, global = true)]
    pub base: Option<PathBuf>,

    /// Default entry point command [env: SCIF_ENTRYPOINT]
    #[arg(long, global = true)]
    pub entrypoint: Option<String>,

    /// Entry folder override, kept across activation [env: SCIF_ENTRYFOLDER]
    #[arg(long, global = true)]
    pub entryfolder: Option<PathBuf>,

    /// Treat unknown apps as errors
    #[arg(long, global = true)]
    pub strict: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// List installed apps
    Apps,

    /// Show selected sections of an app
    Inspect {
        /// App to inspect
        app: String,

        /// Sections to show: a|all, f|files, r|runscript, l|labels,
        /// e|environment, i|install
        #[arg(default_value = "all")]
        attributes: Vec<String>,
    },

    /// Activate an app, or reset to the default context without one
    Activate {
        /// App to activate
        app: Option<String>,

        /// Entry point command to use instead of the app runscript
        #[arg(long)]
        cmd: Option<String>,
    },

    /// Deactivate apps and return to the default context
    Deactivate {
        /// An installed app name
        app: String,
    },

    /// Print the environment, optionally for one app
    Env {
        /// App whose environment to show
        app: Option<String>,

        /// Only the app variables, without the base environment
        #[arg(long)]
        isolated: bool,
    },
}
