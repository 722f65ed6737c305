//! SCIF - apps inside a scientific filesystem
//!
//! A scientific filesystem embeds several independently runnable apps in
//! one container. This crate looks apps up in a parsed recipe, switches
//! the active app (entry point, entry folder, environment) and inspects
//! app definitions.
//!
//! # Example
//!
//! ```no_run
//! use scif::{AppContext, AppDefinition, AppRegistry, ScifSettings};
//!
//! let registry = AppRegistry::new()
//!     .with_app("hello", AppDefinition::new().with_run("echo hello"));
//! let mut ctx = AppContext::new(registry, ScifSettings::default()).unwrap();
//!
//! ctx.activate(Some("hello"), None).unwrap();
//! println!("{} in {:?}", ctx.entry_point(), ctx.entry_folder());
//! ctx.reset();
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod entrypoint;
pub mod environment;
pub mod error;
pub mod logging;
pub mod output;
pub mod registry;

pub use config::ScifSettings;
pub use context::{AppContext, ContextState, Selector, Transition};
pub use entrypoint::{parse_entrypoint, EntryPoint};
pub use environment::{Environment, EnvironmentManager, ScifEnvironment};
pub use error::{Result, ScifError};
pub use output::{format_output, OutputFormat, Report};
pub use registry::{AppDefinition, AppRegistry, Recipe};
