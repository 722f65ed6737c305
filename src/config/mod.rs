//! Configuration defaults for a SCIF session
//!
//! Settings are layered: compiled defaults, then `SCIF_*` environment
//! variables, then whatever the CLI passes in explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default root of the scientific filesystem
pub const DEFAULT_BASE: &str = "/scif";

/// Default shell and entry point
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Session configuration consumed by the app context and environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScifSettings {
    /// Root of the filesystem (`SCIF_BASE`)
    pub base: PathBuf,
    /// Root for app data folders (`SCIF_DATA`)
    pub data: PathBuf,
    /// Root for installed apps (`SCIF_APPS`)
    pub apps: PathBuf,
    /// Shell used by the surrounding runtime (`SCIF_SHELL`)
    pub shell: String,
    /// Default entry point command (`SCIF_ENTRYPOINT`)
    pub entrypoint: String,
    /// Entry folder override (`SCIF_ENTRYFOLDER`). When set, activation
    /// never replaces the entry folder.
    pub entryfolder: Option<PathBuf>,
}

impl Default for ScifSettings {
    fn default() -> Self {
        Self::with_base(DEFAULT_BASE)
    }
}

impl ScifSettings {
    /// Defaults rooted at a custom base folder
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref().to_path_buf();
        Self {
            data: base.join("data"),
            apps: base.join("apps"),
            base,
            shell: DEFAULT_SHELL.to_string(),
            entrypoint: DEFAULT_SHELL.to_string(),
            entryfolder: None,
        }
    }

    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// `SCIF_DATA` and `SCIF_APPS` default to folders under `SCIF_BASE`
    /// when only the base is overridden. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut settings = match get("SCIF_BASE") {
            Some(base) => Self::with_base(base),
            None => Self::default(),
        };

        if let Some(data) = get("SCIF_DATA") {
            settings.data = PathBuf::from(data);
        }
        if let Some(apps) = get("SCIF_APPS") {
            settings.apps = PathBuf::from(apps);
        }
        if let Some(shell) = get("SCIF_SHELL") {
            settings.shell = shell;
        }
        if let Some(entrypoint) = get("SCIF_ENTRYPOINT") {
            settings.entrypoint = entrypoint;
        }
        settings.entryfolder = get("SCIF_ENTRYFOLDER").map(PathBuf::from);

        settings
    }

    /// Move the filesystem root. Data and apps folders follow the base
    /// unless they were overridden separately.
    pub fn rebase(&mut self, base: impl AsRef<Path>) {
        let previous = Self::with_base(&self.base);
        let next = Self::with_base(base);
        if self.data == previous.data {
            self.data = next.data;
        }
        if self.apps == previous.apps {
            self.apps = next.apps;
        }
        self.base = next.base;
    }

    /// Whether an entry folder override is configured
    pub fn has_entryfolder_override(&self) -> bool {
        self.entryfolder.is_some()
    }
}
