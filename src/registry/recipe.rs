//! Recipe document and the app registry it carries
//!
//! The registry is filled once when the recipe loads and is only read
//! afterwards. Iteration follows declaration order.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::definition::AppDefinition;
use crate::error::{Result, ScifError};

/// Ordered mapping from app name to definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppRegistry {
    apps: IndexMap<String, AppDefinition>,
}

impl AppRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an app while building the registry
    pub fn with_app(mut self, name: impl Into<String>, definition: AppDefinition) -> Self {
        self.apps.insert(name.into(), definition);
        self
    }

    /// Get the definition for an app, if it exists
    pub fn get(&self, name: &str) -> Option<&AppDefinition> {
        self.apps.get(name)
    }

    /// List all app names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.apps.keys().map(|s| s.as_str()).collect()
    }

    /// Check if an app exists
    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppDefinition)> {
        self.apps.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get the number of apps
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl FromIterator<(String, AppDefinition)> for AppRegistry {
    fn from_iter<T: IntoIterator<Item = (String, AppDefinition)>>(iter: T) -> Self {
        Self {
            apps: iter.into_iter().collect(),
        }
    }
}

/// A parsed recipe. Only the `apps` section is modeled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<AppRegistry>,
}

impl Recipe {
    /// Load a JSON recipe from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(ScifError::Io)?;
        content.parse()
    }

    /// The app registry, empty when the recipe declares no apps
    pub fn into_registry(self) -> AppRegistry {
        self.apps.unwrap_or_default()
    }
}

impl FromStr for Recipe {
    type Err = ScifError;

    fn from_str(s: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        if !value.is_object() {
            return Err(ScifError::Recipe(
                "recipe must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_registry_new() {
        let registry = AppRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
        assert!(registry.get("foo").is_none());
    }

    #[test]
    fn test_registry_order() {
        let registry = AppRegistry::new()
            .with_app("zeta", AppDefinition::new())
            .with_app("alpha", AppDefinition::new())
            .with_app("mid", AppDefinition::new());
        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("alpha"));
    }

    #[test]
    fn test_recipe_without_apps() {
        let recipe: Recipe = "{}".parse().unwrap();
        assert!(recipe.apps.is_none());
        assert!(recipe.into_registry().is_empty());
    }

    #[test]
    fn test_recipe_keeps_declaration_order() {
        let recipe: Recipe = r#"{"apps": {"hello": {"apprun": "echo hello"}, "bar": {}}}"#
            .parse()
            .unwrap();
        let registry = recipe.into_registry();
        assert_eq!(registry.names(), vec!["hello", "bar"]);
        assert_eq!(
            registry.get("hello").and_then(|d| d.apprun.as_deref()),
            Some("echo hello")
        );
    }

    #[test]
    fn test_recipe_keeps_label_and_env_order() {
        let recipe: Recipe = r#"{"apps": {"zeta": {}, "alpha": {
            "applabels": {"Z": "1", "A": "2"},
            "appenv": {"PATH": "/opt/bin", "HOME": "/root"}
        }}}"#
            .parse()
            .unwrap();
        let registry = recipe.into_registry();
        assert_eq!(registry.names(), vec!["zeta", "alpha"]);

        let alpha = registry.get("alpha").unwrap();
        let labels: Vec<&str> = alpha.applabels.as_ref().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(labels, vec!["Z", "A"]);
        let env: Vec<&str> = alpha.appenv.as_ref().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(env, vec!["PATH", "HOME"]);
    }

    #[test]
    fn test_recipe_not_object() {
        let result = "[1, 2]".parse::<Recipe>();
        assert!(matches!(result, Err(ScifError::Recipe(_))));
    }

    #[test]
    fn test_recipe_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipe.json");
        std::fs::write(&path, r#"{"apps": {"foo": {"appfiles": ["x"]}}}"#).unwrap();

        let registry = Recipe::from_path(&path).unwrap().into_registry();
        assert!(registry.contains("foo"));
    }

    #[test]
    fn test_recipe_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Recipe::from_path(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(ScifError::Io(_))));
    }
}
