//! Default environment manager backed by the SCIF folder layout

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::script::parse_env_script;
use super::{Environment, EnvironmentManager};
use crate::config::ScifSettings;
use crate::error::{Result, ScifError};
use crate::registry::AppRegistry;

/// Session-scoped environment for a scientific filesystem.
///
/// The live environment is a base layer (filesystem roots plus suffixed
/// variables for every app) with the active app's overlay on top.
#[derive(Debug, Clone)]
pub struct ScifEnvironment {
    settings: ScifSettings,
    registry: Arc<AppRegistry>,
    base: Environment,
    overlay: Environment,
}

impl ScifEnvironment {
    pub fn new(settings: ScifSettings, registry: Arc<AppRegistry>) -> Self {
        let mut env = Self {
            settings,
            registry,
            base: Environment::new(),
            overlay: Environment::new(),
        };
        env.base = env.base_environment();
        env
    }

    /// Unsuffixed variables for one app, followed by its declared `appenv`.
    /// Unknown apps get an empty environment.
    pub fn app_lookup(&self, app: &str) -> Environment {
        let Some(definition) = self.registry.get(app) else {
            return Environment::new();
        };

        let mut env = self.app_paths(app);
        if let Some(vars) = &definition.appenv {
            for (key, value) in vars {
                env.insert(key.as_str(), value.as_str());
            }
        }
        env
    }

    fn app_paths(&self, app: &str) -> Environment {
        let approot = self.settings.apps.join(app);
        let appmeta = approot.join("scif");
        let appdata = self.settings.data.join(app);

        let mut env = Environment::new();
        env.insert("SCIF_APPNAME", app);
        env.insert("SCIF_APPROOT", path_str(&approot));
        env.insert("SCIF_APPBIN", path_str(&approot.join("bin")));
        env.insert("SCIF_APPLIB", path_str(&approot.join("lib")));
        env.insert("SCIF_APPMETA", path_str(&appmeta));
        env.insert("SCIF_APPDATA", path_str(&appdata));
        env.insert("SCIF_APPINPUT", path_str(&appdata.join("input")));
        env.insert("SCIF_APPOUTPUT", path_str(&appdata.join("output")));
        env.insert("SCIF_APPENV", path_str(&appmeta.join("environment.sh")));
        env.insert("SCIF_APPLABELS", path_str(&appmeta.join("labels.json")));
        env.insert("SCIF_APPHELP", path_str(&appmeta.join("runscript.help")));
        env.insert("SCIF_APPRUN", path_str(&appmeta.join("runscript")));
        env.insert("SCIF_APPTEST", path_str(&appmeta.join("test.sh")));
        env.insert(
            "SCIF_APPRECIPE",
            path_str(&appmeta.join(format!("{}.scif", app))),
        );
        env
    }

    fn base_environment(&self) -> Environment {
        let mut env = Environment::new();
        env.insert("SCIF_DATA", path_str(&self.settings.data));
        env.insert("SCIF_APPS", path_str(&self.settings.apps));
        env.insert("SCIF_SHELL", self.settings.shell.as_str());

        for app in self.registry.names() {
            for (key, value) in self.app_paths(app).iter() {
                if key == "SCIF_APPNAME" {
                    continue;
                }
                env.insert(format!("{}_{}", key, app), value);
            }
        }
        env
    }

    fn live(&self) -> Environment {
        let mut env = self.base.clone();
        env.merge(&self.overlay);
        env
    }
}

impl EnvironmentManager for ScifEnvironment {
    fn app_env(&mut self, app: &str, isolated: bool, update: bool) -> Environment {
        let lookup = self.app_lookup(app);

        let result = if isolated {
            lookup.clone()
        } else {
            let mut merged = self.base.clone();
            merged.merge(&lookup);
            merged
        };

        if update {
            self.overlay = lookup;
            debug!(app, vars = self.overlay.len(), "updated live environment");
        }

        result
    }

    fn load_script(&mut self, app: &str) -> Result<usize> {
        let lookup = self.app_lookup(app);
        let Some(script) = lookup.get("SCIF_APPENV") else {
            return Ok(0);
        };

        let path = Path::new(script);
        if !path.is_file() {
            return Ok(0);
        }

        let content = fs::read_to_string(path).map_err(ScifError::Io)?;
        let vars = parse_env_script(&content);
        let count = vars.len();
        self.overlay.merge(&vars);

        debug!(app, script = %path.display(), count, "loaded environment script");
        Ok(count)
    }

    fn reload(&mut self, reset: bool) {
        self.base = self.base_environment();
        if reset {
            self.overlay.clear();
        }
        debug!(reset, "reloaded environment");
    }

    fn environment(&self) -> Environment {
        self.live()
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
