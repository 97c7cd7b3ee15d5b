use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::data::validate::MAX_RATING;

/// Which review scores must clear the rating threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMode {
    /// Only the overall rating is checked.
    #[default]
    Standard,
    /// The overall rating and all six sub-ratings are checked.
    Strict,
}

fn default_excess_penalty() -> f64 {
    1.0
}

/// Parameters of one selection scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub name: String,
    /// Target total nightly spend.
    pub budget: f64,
    /// Lower bound on the number of selected listings.
    #[serde(default)]
    pub min_properties: u32,
    /// Lower bound on the combined guest capacity.
    #[serde(default)]
    pub min_capacity: f64,
    /// Rating threshold on the 0–5 scale.
    pub min_rating: f64,
    #[serde(default)]
    pub mode: ScenarioMode,
    /// Objective weight on every unit of spend above `budget`.
    #[serde(default = "default_excess_penalty")]
    pub excess_penalty: f64,
}

impl ScenarioConfig {
    pub fn is_strict(&self) -> bool {
        self.mode == ScenarioMode::Strict
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(format!("scenario '{}': {message}", self.name)));

        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("scenario name must not be empty".to_string()));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return invalid(format!("budget must be positive, got {}", self.budget));
        }
        if !self.min_capacity.is_finite() || self.min_capacity < 0.0 {
            return invalid(format!("min_capacity must be non-negative, got {}", self.min_capacity));
        }
        if !(0.0..=MAX_RATING).contains(&self.min_rating) {
            return invalid(format!("min_rating must be within 0-{MAX_RATING}, got {}", self.min_rating));
        }
        if !self.excess_penalty.is_finite() || self.excess_penalty < 0.0 {
            return invalid(format!(
                "excess_penalty must be non-negative, got {}",
                self.excess_penalty
            ));
        }
        Ok(())
    }
}

/// Scenarios used when no scenario file is given.
pub fn builtin_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig {
            name: "Base".to_string(),
            budget: 10_000.0,
            min_properties: 5,
            min_capacity: 40.0,
            min_rating: 4.5,
            mode: ScenarioMode::Standard,
            excess_penalty: 1.0,
        },
        ScenarioConfig {
            name: "Tight budget".to_string(),
            budget: 5_000.0,
            min_properties: 5,
            min_capacity: 40.0,
            min_rating: 4.5,
            mode: ScenarioMode::Standard,
            excess_penalty: 3.0,
        },
        ScenarioConfig {
            name: "Large group".to_string(),
            budget: 15_000.0,
            min_properties: 8,
            min_capacity: 80.0,
            min_rating: 4.5,
            mode: ScenarioMode::Standard,
            excess_penalty: 1.0,
        },
        ScenarioConfig {
            name: "Strict".to_string(),
            budget: 10_000.0,
            min_properties: 5,
            min_capacity: 40.0,
            min_rating: 4.5,
            mode: ScenarioMode::Strict,
            excess_penalty: 1.0,
        },
    ]
}
