//! App registry for the scientific filesystem
//!
//! The registry is the parsed `apps` section of a recipe: a read-only,
//! ordered mapping from app name to its definition.
//! - Definitions carry the run command, files, labels, environment
//!   and install steps of one app
//! - Any subset of those facets may be absent

mod definition;
mod recipe;

pub use definition::{AppDefinition, APPENV, APPFILES, APPHELP, APPINSTALL, APPLABELS, APPRUN, APPTEST};
pub use recipe::{AppRegistry, Recipe};
