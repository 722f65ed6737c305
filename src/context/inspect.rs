//! Attribute selectors for app inspection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScifError;
use crate::registry::AppDefinition;

/// One facet of an app definition that inspection can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    All,
    Files,
    Runscript,
    Labels,
    Environment,
    Install,
}

impl Selector {
    /// Long token for this selector
    pub fn name(&self) -> &'static str {
        match self {
            Selector::All => "all",
            Selector::Files => "files",
            Selector::Runscript => "runscript",
            Selector::Labels => "labels",
            Selector::Environment => "environment",
            Selector::Install => "install",
        }
    }

    /// Single letter token for this selector
    pub fn short(&self) -> &'static str {
        &self.name()[..1]
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Selector {
    type Err = ScifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "all" => Ok(Selector::All),
            "f" | "files" => Ok(Selector::Files),
            "r" | "runscript" => Ok(Selector::Runscript),
            "l" | "labels" => Ok(Selector::Labels),
            "e" | "environment" => Ok(Selector::Environment),
            "i" | "install" => Ok(Selector::Install),
            other => Err(ScifError::InvalidAttribute(other.to_string())),
        }
    }
}

/// Copy the selected facets of `definition`.
///
/// `All` returns the definition as is. Every other selector copies its
/// facet only when it is selected and defined, so unselected or absent
/// facets never appear in the result.
pub fn select(definition: &AppDefinition, selectors: &[Selector]) -> AppDefinition {
    if selectors.contains(&Selector::All) {
        return definition.clone();
    }

    let mut result = AppDefinition::default();
    for selector in selectors {
        match selector {
            Selector::Files => result.appfiles = definition.appfiles.clone(),
            Selector::Runscript => result.apprun = definition.apprun.clone(),
            Selector::Labels => result.applabels = definition.applabels.clone(),
            Selector::Environment => result.appenv = definition.appenv.clone(),
            Selector::Install => result.appinstall = definition.appinstall.clone(),
            Selector::All => {}
        }
    }
    result
}
