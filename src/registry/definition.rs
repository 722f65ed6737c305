//! App definition struct
//!
//! An AppDefinition holds every facet a recipe can declare for one app.
//! Absent facets are `None` and are left out when serialized.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const APPRUN: &str = "apprun";
pub const APPFILES: &str = "appfiles";
pub const APPLABELS: &str = "applabels";
pub const APPENV: &str = "appenv";
pub const APPINSTALL: &str = "appinstall";
pub const APPHELP: &str = "apphelp";
pub const APPTEST: &str = "apptest";

/// The definition of a single app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinition {
    /// Raw run command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apprun: Option<String>,
    /// Files to add into the app root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appfiles: Option<Vec<String>>,
    /// Labels, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applabels: Option<IndexMap<String, String>>,
    /// Environment variables, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appenv: Option<IndexMap<String, String>>,
    /// Install steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appinstall: Option<Vec<String>>,
    /// Help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apphelp: Option<String>,
    /// Test script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apptest: Option<String>,
}

impl AppDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run(mut self, cmd: impl Into<String>) -> Self {
        self.apprun = Some(cmd.into());
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.appfiles = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.applabels
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.appenv
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_install<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.appinstall = Some(steps.into_iter().map(Into::into).collect());
        self
    }

    /// True when no facet is defined
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Names of the facets that are defined, in a stable order
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.apprun.is_some() {
            keys.push(APPRUN);
        }
        if self.appfiles.is_some() {
            keys.push(APPFILES);
        }
        if self.applabels.is_some() {
            keys.push(APPLABELS);
        }
        if self.appenv.is_some() {
            keys.push(APPENV);
        }
        if self.appinstall.is_some() {
            keys.push(APPINSTALL);
        }
        if self.apphelp.is_some() {
            keys.push(APPHELP);
        }
        if self.apptest.is_some() {
            keys.push(APPTEST);
        }
        keys
    }
}
