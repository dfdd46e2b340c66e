use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::PerimeterError;
use crate::resource::{EnforcementBoundary, RawEnforcementBoundary, RawRuleSet, RuleSet};

/// Declarative policy configuration as loaded from a TOML file. Sections are
/// the flat, set-oriented user representation; validation happens in
/// [`to_resources`](ConfigFile::to_resources).
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub rule_sets: Vec<RawRuleSet>,
    #[serde(default)]
    pub enforcement_boundaries: Vec<RawEnforcementBoundary>,
}

/// Fully validated policy resources built from one configuration file.
#[derive(Debug, Default)]
pub struct Resources {
    pub rule_sets: Vec<RuleSet>,
    pub enforcement_boundaries: Vec<EnforcementBoundary>,
}

impl ConfigFile {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, PerimeterError> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| PerimeterError::ConfigParse {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Run full actor, scope and service validation over every declared
    /// resource, producing the typed forms ready for wire projection.
    pub fn to_resources(&self) -> Result<Resources, PerimeterError> {
        let rule_sets = self
            .rule_sets
            .iter()
            .enumerate()
            .map(|(index, raw)| RuleSet::resolve(&format!("rule_sets[{index}]"), raw))
            .collect::<Result<Vec<_>, _>>()?;

        let enforcement_boundaries = self
            .enforcement_boundaries
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                EnforcementBoundary::resolve(&format!("enforcement_boundaries[{index}]"), raw)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Resources {
            rule_sets,
            enforcement_boundaries,
        })
    }
}
