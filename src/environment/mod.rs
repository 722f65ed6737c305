//! Environment management for SCIF apps
//!
//! The environment manager computes the variables an app sees, keeps a
//! live session view of them and loads per-app environment scripts.
//! Nothing here writes to the process environment.

mod scif;
mod script;

pub use scif::ScifEnvironment;
pub use script::parse_env_script;

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Key holding the root folder of the app in an app environment
pub const SCIF_APPROOT: &str = "SCIF_APPROOT";

/// Ordered set of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(IndexMap<String, String>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Overlay another environment on top of this one
    pub fn merge(&mut self, other: &Environment) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    /// Root folder of the app this environment was computed for
    pub fn approot(&self) -> Option<PathBuf> {
        self.get(SCIF_APPROOT).map(PathBuf::from)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(String, String)> for Environment {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Computes, merges and loads app environments for a session
pub trait EnvironmentManager {
    /// Compute the environment for `app`.
    ///
    /// When `isolated` is false the app variables are merged over the
    /// base environment, without any other app's variables. When `update`
    /// is true the live environment switches to this app's variables.
    fn app_env(&mut self, app: &str, isolated: bool, update: bool) -> Environment;

    /// Load the app's environment script into the live environment, if
    /// one exists. Returns the number of variables loaded.
    fn load_script(&mut self, app: &str) -> Result<usize>;

    /// Recompute the live environment. `reset` drops app overlays.
    fn reload(&mut self, reset: bool);

    /// Current live environment
    fn environment(&self) -> Environment;
}
