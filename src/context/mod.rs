//! Active app context for a SCIF session
//!
//! The context tracks which app is active and the entry point and entry
//! folder that follow from it. It starts in the default state, moves to
//! an app on activation and returns to the default on reset. Unknown
//! apps are reported with a warning and leave the state untouched.

mod inspect;

pub use inspect::{select, Selector};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ScifSettings;
use crate::entrypoint::{parse_entrypoint, EntryPoint};
use crate::environment::{Environment, EnvironmentManager, ScifEnvironment};
use crate::error::{Result, ScifError};
use crate::registry::{AppDefinition, AppRegistry};

/// Outcome of an activation or deactivation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// The app is now active
    Activated { app: String },
    /// The default context is in effect
    Reset,
    /// The requested app is not in the registry; nothing changed
    UnknownApp { app: String },
}

impl Transition {
    /// Whether the requested app (if any) was valid
    pub fn is_valid(&self) -> bool {
        !matches!(self, Transition::UnknownApp { .. })
    }

    /// Turn an unknown-app outcome into an error
    pub fn into_result(self) -> Result<Self> {
        match self {
            Transition::UnknownApp { app } => Err(ScifError::UnknownApp(app)),
            other => Ok(other),
        }
    }
}

/// Snapshot of the session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextState {
    pub active: Option<String>,
    pub entry_point: EntryPoint,
    pub entry_folder: Option<PathBuf>,
}

/// History entry for context changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextHistoryEntry {
    pub action: String,
    pub app: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// The active app context of a session
#[derive(Debug)]
pub struct AppContext<E: EnvironmentManager = ScifEnvironment> {
    registry: Arc<AppRegistry>,
    settings: ScifSettings,
    env: E,

    /// Entry point used when no app supplies one
    default_entry_point: EntryPoint,

    active: Option<String>,
    entry_point: EntryPoint,
    entry_folder: Option<PathBuf>,

    history: Vec<ContextHistoryEntry>,
}

impl AppContext<ScifEnvironment> {
    /// Create a context with the default SCIF environment manager
    pub fn new(registry: AppRegistry, settings: ScifSettings) -> Result<Self> {
        let registry = Arc::new(registry);
        let env = ScifEnvironment::new(settings.clone(), Arc::clone(&registry));
        Self::with_environment(registry, settings, env)
    }
}

impl<E: EnvironmentManager> AppContext<E> {
    /// Create a context with a custom environment manager.
    ///
    /// Fails only if the configured default entry point is empty.
    pub fn with_environment(
        registry: Arc<AppRegistry>,
        settings: ScifSettings,
        env: E,
    ) -> Result<Self> {
        let default_entry_point = parse_entrypoint(&settings.entrypoint)?;
        Ok(Self {
            registry,
            entry_point: default_entry_point.clone(),
            entry_folder: settings.entryfolder.clone(),
            default_entry_point,
            settings,
            env,
            active: None,
            history: Vec::new(),
        })
    }

    /// View a single app, if it exists
    pub fn app(&self, name: &str) -> Option<&AppDefinition> {
        self.registry.get(name)
    }

    /// Names of all apps, in registry order
    pub fn apps(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Activate `app`, or return to the default context when `app` is `None`.
    ///
    /// The entry point comes from `cmd` when given, otherwise from the app's
    /// `apprun`, otherwise it is left as it was. The entry folder becomes
    /// the app root unless an entry folder override is configured.
    ///
    /// Unknown apps are logged and reported as [`Transition::UnknownApp`].
    /// The only error is a command that parses to an empty entry point, in
    /// which case the state is left untouched.
    pub fn activate(&mut self, app: Option<&str>, cmd: Option<&str>) -> Result<Transition> {
        let Some(app) = app else {
            warn!("No app selected, will run default {}", self.default_entry_point);
            return Ok(self.reset());
        };

        let registry = Arc::clone(&self.registry);
        let Some(definition) = registry.get(app) else {
            warn!("{} is not an installed SCIF app", app);
            return Ok(Transition::UnknownApp {
                app: app.to_string(),
            });
        };

        let entry_point = match (cmd, definition.apprun.as_deref()) {
            (Some(cmd), _) => Some(parse_entrypoint(cmd)?),
            (None, Some(apprun)) => Some(parse_entrypoint(apprun)?),
            (None, None) => None,
        };

        self.active = Some(app.to_string());
        if let Some(entry_point) = entry_point {
            self.entry_point = entry_point;
        }

        let appenv = self.env.app_env(app, false, true);
        if let Err(e) = self.env.load_script(app) {
            warn!(app, error = %e, "failed to load app environment script");
        }

        if !self.settings.has_entryfolder_override() {
            self.entry_folder = appenv.approot();
        }

        debug!(
            app,
            entrypoint = %self.entry_point,
            entryfolder = ?self.entry_folder,
            "activated app"
        );
        self.record("ACTIVATE", Some(app));

        Ok(Transition::Activated {
            app: app.to_string(),
        })
    }

    /// Return to the default context if `app` is an installed app.
    ///
    /// Deactivation is global: any valid name resets whatever is active.
    pub fn deactivate(&mut self, app: &str) -> Transition {
        if self.registry.contains(app) {
            self.reset()
        } else {
            warn!("{} is not an installed SCIF app", app);
            Transition::UnknownApp {
                app: app.to_string(),
            }
        }
    }

    /// Restore defaults and drop app environment overlays.
    ///
    /// Without an entry folder override the entry folder ends up unset.
    pub fn reset(&mut self) -> Transition {
        self.set_defaults();
        self.env.reload(true);

        if !self.settings.has_entryfolder_override() {
            self.entry_folder = None;
        }

        debug!(entrypoint = %self.entry_point, "reset to default context");
        self.record("RESET", None);
        Transition::Reset
    }

    fn set_defaults(&mut self) {
        self.active = None;
        self.entry_point = self.default_entry_point.clone();
        self.entry_folder = self.settings.entryfolder.clone();
    }

    /// Inspect an app, keeping only the selected facets.
    ///
    /// Returns an empty definition for unknown apps.
    pub fn inspect(&self, app: &str, selectors: &[Selector]) -> AppDefinition {
        match self.registry.get(app) {
            Some(definition) => select(definition, selectors),
            None => AppDefinition::default(),
        }
    }

    /// Inspect with raw attribute tokens (`r`, `labels`, `all`, ...).
    /// Unrecognised tokens select nothing.
    pub fn inspect_tokens<I, S>(&self, app: &str, attributes: I) -> AppDefinition
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors: Vec<Selector> = attributes
            .into_iter()
            .filter_map(|token| match token.as_ref().parse() {
                Ok(selector) => Some(selector),
                Err(e) => {
                    debug!(error = %e, "ignoring inspection attribute");
                    None
                }
            })
            .collect();
        self.inspect(app, &selectors)
    }

    /// Name of the active app
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, app: &str) -> bool {
        self.active.as_deref() == Some(app)
    }

    /// The effective entry point
    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    /// The effective entry folder; `None` lets the runtime pick its default
    pub fn entry_folder(&self) -> Option<&Path> {
        self.entry_folder.as_deref()
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ScifSettings {
        &self.settings
    }

    /// The live session environment
    pub fn environment(&self) -> Environment {
        self.env.environment()
    }

    /// Compute an app environment without changing the live one
    pub fn app_environment(&mut self, app: &str, isolated: bool) -> Environment {
        self.env.app_env(app, isolated, false)
    }

    /// Get context history
    pub fn history(&self) -> &[ContextHistoryEntry] {
        &self.history
    }

    pub fn state(&self) -> ContextState {
        ContextState {
            active: self.active.clone(),
            entry_point: self.entry_point.clone(),
            entry_folder: self.entry_folder.clone(),
        }
    }

    fn record(&mut self, action: &str, app: Option<&str>) {
        self.history.push(ContextHistoryEntry {
            action: action.to_string(),
            app: app.map(str::to_string),
            timestamp: chrono::Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> AppRegistry {
        AppRegistry::new()
            .with_app(
                "hello",
                AppDefinition::new()
                    .with_run("run.sh")
                    .with_files(["hello.txt"])
                    .with_label("VERSION", "1.0")
                    .with_env("GREETING", "hi")
                    .with_install(["touch hello.txt"]),
            )
            .with_app("bare", AppDefinition::new())
    }

    fn context() -> AppContext {
        AppContext::new(registry(), ScifSettings::default()).unwrap()
    }

    fn parsed(cmd: &str) -> EntryPoint {
        parse_entrypoint(cmd).unwrap()
    }

    /// Environment manager that records what it was asked to do
    #[derive(Debug, Default)]
    struct RecordingEnv {
        calls: Vec<String>,
    }

    impl EnvironmentManager for RecordingEnv {
        fn app_env(&mut self, app: &str, isolated: bool, update: bool) -> Environment {
            self.calls
                .push(format!("app_env {} isolated={} update={}", app, isolated, update));
            let mut env = Environment::new();
            env.insert("SCIF_APPROOT", format!("/custom/{}", app));
            env
        }

        fn load_script(&mut self, app: &str) -> Result<usize> {
            self.calls.push(format!("load_script {}", app));
            Err(ScifError::Recipe("broken script".to_string()))
        }

        fn reload(&mut self, reset: bool) {
            self.calls.push(format!("reload reset={}", reset));
        }

        fn environment(&self) -> Environment {
            Environment::new()
        }
    }

    #[test]
    fn test_context_default() {
        let ctx = context();
        assert!(ctx.active().is_none());
        assert_eq!(ctx.entry_point(), &parsed("/bin/bash"));
        assert!(ctx.entry_folder().is_none());
        assert!(ctx.history().is_empty());
    }

    #[test]
    fn test_app_and_apps() {
        let ctx = context();
        assert_eq!(ctx.apps(), vec!["hello", "bare"]);
        assert!(ctx.app("hello").is_some());
        assert!(ctx.app("nope").is_none());
    }

    #[test]
    fn test_apps_empty_registry() {
        let ctx = AppContext::new(AppRegistry::new(), ScifSettings::default()).unwrap();
        assert!(ctx.apps().is_empty());
        assert!(ctx.app("hello").is_none());
    }

    #[test]
    fn test_activate_uses_apprun() {
        let mut ctx = context();
        let transition = ctx.activate(Some("hello"), None).unwrap();

        assert_eq!(transition, Transition::Activated { app: "hello".to_string() });
        assert_eq!(ctx.active(), Some("hello"));
        assert!(ctx.is_active("hello"));
        assert_eq!(ctx.entry_point(), &parsed("run.sh"));
        assert_eq!(ctx.entry_folder(), Some(Path::new("/scif/apps/hello")));
        assert_eq!(ctx.environment().get("SCIF_APPNAME"), Some("hello"));
        assert_eq!(ctx.environment().get("GREETING"), Some("hi"));
    }

    #[test]
    fn test_activate_cmd_wins() {
        let mut ctx = context();
        ctx.activate(Some("hello"), Some("custom.sh --flag")).unwrap();
        assert_eq!(ctx.entry_point(), &parsed("custom.sh --flag"));
    }

    #[test]
    fn test_activate_without_apprun_keeps_entry_point() {
        let mut ctx = context();
        ctx.activate(Some("hello"), None).unwrap();
        ctx.activate(Some("bare"), None).unwrap();

        assert_eq!(ctx.active(), Some("bare"));
        assert_eq!(ctx.entry_point(), &parsed("run.sh"));
        assert_eq!(ctx.entry_folder(), Some(Path::new("/scif/apps/bare")));
        assert!(ctx.environment().get("GREETING").is_none());
    }

    #[test]
    fn test_activate_unknown_is_noop() {
        let mut ctx = context();
        ctx.activate(Some("hello"), None).unwrap();
        let before = ctx.state();
        let history_len = ctx.history().len();

        let transition = ctx.activate(Some("nope"), Some("other.sh")).unwrap();

        assert_eq!(transition, Transition::UnknownApp { app: "nope".to_string() });
        assert!(!transition.is_valid());
        assert_eq!(ctx.state(), before);
        assert_eq!(ctx.history().len(), history_len);
        assert_eq!(ctx.registry(), &registry());
    }

    #[test]
    fn test_activate_empty_cmd_leaves_state() {
        let mut ctx = context();
        let before = ctx.state();
        let result = ctx.activate(Some("hello"), Some("   "));
        assert!(matches!(result, Err(ScifError::EmptyEntrypoint)));
        assert_eq!(ctx.state(), before);
    }

    #[test]
    fn test_activate_none_equals_reset() {
        let mut a = context();
        let mut b = context();
        a.activate(Some("hello"), None).unwrap();
        b.activate(Some("hello"), None).unwrap();

        let transition = a.activate(None, None).unwrap();
        b.reset();

        assert_eq!(transition, Transition::Reset);
        assert_eq!(a.state(), b.state());
        assert!(a.active().is_none());
        assert_eq!(a.environment(), b.environment());
    }

    #[test]
    fn test_reset_round_trip() {
        let mut ctx = context();
        let initial = ctx.state();
        let initial_env = ctx.environment();

        ctx.activate(Some("hello"), Some("custom.sh")).unwrap();
        assert_ne!(ctx.state(), initial);

        ctx.reset();
        assert_eq!(ctx.state(), initial);
        assert_eq!(ctx.environment(), initial_env);
    }

    #[test]
    fn test_deactivate_valid_is_reset() {
        let mut a = context();
        let mut b = context();
        a.activate(Some("hello"), None).unwrap();
        b.activate(Some("hello"), None).unwrap();

        // Any valid name resets, not only the active one
        assert_eq!(a.deactivate("bare"), Transition::Reset);
        b.reset();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_deactivate_invalid_is_noop() {
        let mut ctx = context();
        ctx.activate(Some("hello"), None).unwrap();
        let before = ctx.state();

        let transition = ctx.deactivate("nope");
        assert!(matches!(
            transition.clone().into_result(),
            Err(ScifError::UnknownApp(name)) if name == "nope"
        ));
        assert_eq!(ctx.state(), before);
    }

    #[test]
    fn test_entryfolder_override() {
        let settings = ScifSettings {
            entryfolder: Some(PathBuf::from("/work")),
            ..ScifSettings::default()
        };
        let mut ctx = AppContext::new(registry(), settings).unwrap();
        assert_eq!(ctx.entry_folder(), Some(Path::new("/work")));

        ctx.activate(Some("hello"), None).unwrap();
        assert_eq!(ctx.entry_folder(), Some(Path::new("/work")));

        ctx.reset();
        assert_eq!(ctx.entry_folder(), Some(Path::new("/work")));
    }

    #[test]
    fn test_default_entrypoint_from_settings() {
        let settings = ScifSettings {
            entrypoint: "/bin/sh -l".to_string(),
            ..ScifSettings::default()
        };
        let mut ctx = AppContext::new(registry(), settings).unwrap();
        ctx.activate(Some("hello"), None).unwrap();
        ctx.reset();
        assert_eq!(ctx.entry_point(), &parsed("/bin/sh -l"));
    }

    #[test]
    fn test_empty_default_entrypoint_rejected() {
        let settings = ScifSettings {
            entrypoint: String::new(),
            ..ScifSettings::default()
        };
        assert!(AppContext::new(registry(), settings).is_err());
    }

    #[test]
    fn test_delegates_to_environment_manager() {
        let mut ctx = AppContext::with_environment(
            Arc::new(registry()),
            ScifSettings::default(),
            RecordingEnv::default(),
        )
        .unwrap();

        // A failing script load is logged, not returned
        ctx.activate(Some("bare"), None).unwrap();
        assert_eq!(ctx.entry_folder(), Some(Path::new("/custom/bare")));

        ctx.deactivate("bare");
        ctx.deactivate("nope");

        assert_eq!(
            ctx.env.calls,
            vec![
                "app_env bare isolated=false update=true",
                "load_script bare",
                "reload reset=true",
            ]
        );
    }

    #[test]
    fn test_activate_loads_env_script() {
        let temp_dir = TempDir::new().unwrap();
        let settings = ScifSettings::with_base(temp_dir.path());
        let meta = settings.apps.join("hello").join("scif");
        fs::create_dir_all(&meta).unwrap();
        fs::write(meta.join("environment.sh"), "export TOOL=/opt/tool\n").unwrap();

        let mut ctx = AppContext::new(registry(), settings.clone()).unwrap();
        ctx.activate(Some("hello"), None).unwrap();

        assert_eq!(ctx.environment().get("TOOL"), Some("/opt/tool"));
        assert_eq!(ctx.entry_folder(), Some(settings.apps.join("hello").as_path()));

        ctx.reset();
        assert!(ctx.environment().get("TOOL").is_none());
    }

    #[test]
    fn test_history() {
        let mut ctx = context();
        ctx.activate(Some("hello"), None).unwrap();
        ctx.activate(Some("nope"), None).unwrap();
        ctx.reset();

        let actions: Vec<&str> = ctx.history().iter().map(|h| h.action.as_str()).collect();
        assert_eq!(actions, vec!["ACTIVATE", "RESET"]);
        assert_eq!(ctx.history()[0].app.as_deref(), Some("hello"));
    }

    #[test]
    fn test_inspect_all() {
        let ctx = context();
        assert_eq!(
            ctx.inspect_tokens("hello", ["all"]),
            registry().get("hello").cloned().unwrap()
        );
        assert_eq!(
            ctx.inspect("hello", &[Selector::All]),
            ctx.inspect_tokens("hello", ["a"])
        );
    }

    #[test]
    fn test_inspect_filtered() {
        let ctx = context();

        assert!(ctx.inspect_tokens("hello", Vec::<String>::new()).is_empty());

        let result = ctx.inspect_tokens("hello", ["r"]);
        assert_eq!(result, AppDefinition::new().with_run("run.sh"));

        let result = ctx.inspect_tokens("hello", ["labels", "i", "bogus"]);
        assert_eq!(result.keys(), vec!["applabels", "appinstall"]);

        // Selected facets the app does not define stay absent
        assert!(ctx.inspect_tokens("bare", ["f", "r", "l", "e", "i"]).is_empty());
    }

    #[test]
    fn test_inspect_unknown_app() {
        let ctx = context();
        assert!(ctx.inspect_tokens("nope", ["all"]).is_empty());
    }

    #[test]
    fn test_app_environment_does_not_apply() {
        let mut ctx = context();
        let env = ctx.app_environment("hello", true);
        assert_eq!(env.get("SCIF_APPNAME"), Some("hello"));
        assert!(ctx.environment().get("SCIF_APPNAME").is_none());
        assert!(ctx.active().is_none());
    }
}
