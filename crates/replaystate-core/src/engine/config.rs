use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::event::Event;

const DEFAULT_GENERATOR_CONFIG_YAML: &str = include_str!("../../config/generator.default.yaml");

/// Settings for one gamestate generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub pretty: bool,
    pub footsteps: bool,
    pub extended_events: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            pretty: false,
            footsteps: true,
            extended_events: false,
        }
    }
}

impl GeneratorConfig {
    /// Parse a generator config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, GeneratorConfigError> {
        serde_yaml::from_str(yaml).map_err(GeneratorConfigError::Yaml)
    }

    /// Parse a generator config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, GeneratorConfigError> {
        let yaml = fs::read_to_string(path).map_err(GeneratorConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_GENERATOR_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, GeneratorConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Whether a mapped event should be recorded under these settings.
    pub fn admits(&self, event: &Event) -> bool {
        if matches!(event, Event::PlayerFootstep(_)) {
            return self.footsteps;
        }
        !event.is_extended() || self.extended_events
    }
}

/// Error type for loading `GeneratorConfig`.
#[derive(Debug, Error)]
pub enum GeneratorConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[source] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),
}
