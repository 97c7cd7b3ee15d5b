//! Scenario and solver configuration.
//!
//! Scenario files are YAML:
//!
//! ```yaml
//! solver:
//!   time_limit_secs: 30
//!   workers: 0
//! scenarios:
//!   - name: Base
//!     budget: 10000
//!     min_properties: 5
//!     min_capacity: 40
//!     min_rating: 4.5
//!     mode: standard
//!     excess_penalty: 1.0
//! ```

pub mod scenario;

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use scenario::{builtin_scenarios, ScenarioConfig, ScenarioMode};

/// Overrides [SolverSettings::time_limit_secs] when set; `0` disables the limit.
pub const TIME_LIMIT_ENV: &str = "LISTING_OPTIMIZER_TIME_LIMIT_SECS";

const DEFAULT_TIME_LIMIT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_time_limit_secs() -> Option<u64> {
    Some(DEFAULT_TIME_LIMIT_SECS)
}

/// Settings shared by every scenario in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSettings {
    /// Wall-clock limit per scenario solve. `None` waits indefinitely.
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: Option<u64>,
    /// Worker threads for running scenarios. 0 uses the Rayon default.
    #[serde(default)]
    pub workers: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit_secs(),
            workers: 0,
        }
    }
}

impl SolverSettings {
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Apply [TIME_LIMIT_ENV] if present. Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = env::var(TIME_LIMIT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.time_limit_secs = Some(secs),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {TIME_LIMIT_ENV}"),
            }
        }
        self
    }
}

/// Contents of a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    #[serde(default)]
    pub solver: SolverSettings,
    pub scenarios: Vec<ScenarioConfig>,
}

impl Default for ScenarioFile {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScenarioFile {
    pub fn builtin() -> Self {
        Self {
            solver: SolverSettings::default(),
            scenarios: builtin_scenarios(),
        }
    }

    /// Loads and validates a YAML scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses and validates YAML.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let file: Self = serde_yaml::from_str(s)?;
        file.validate()?;
        Ok(file)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scenarios.is_empty() {
            return Err(ConfigError::Invalid("at least one scenario is required".to_string()));
        }
        let mut names = HashSet::new();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !names.insert(scenario.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate scenario name '{}'",
                    scenario.name
                )));
            }
        }
        Ok(())
    }
}
