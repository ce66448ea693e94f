use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};

/// Largest eligible pool still served longest-idle-first.
pub const DEFAULT_ROUND_ROBIN_MAX_POOL: usize = 5;

/// Idle time at which the idle score saturates.
pub const DEFAULT_IDLE_HORIZON_HOURS: f64 = 24.0;

/// Relative weights of the three scoring components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub distance: f64,
    pub fairness: f64,
    pub idle: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: 0.4,
            fairness: 0.4,
            idle: 0.2,
        }
    }
}

/// Tunables for the distribution engine. Defaults reproduce the production app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistributionConfig {
    /// Pools with at most this many eligible drivers skip scoring.
    pub round_robin_max_pool: usize,
    pub weights: ScoreWeights,
    pub idle_horizon_hours: f64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            round_robin_max_pool: DEFAULT_ROUND_ROBIN_MAX_POOL,
            weights: ScoreWeights::default(),
            idle_horizon_hours: DEFAULT_IDLE_HORIZON_HOURS,
        }
    }
}

impl DistributionConfig {
    pub fn with_round_robin_max_pool(mut self, max_pool: usize) -> Self {
        self.round_robin_max_pool = max_pool;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_idle_horizon_hours(mut self, hours: f64) -> Self {
        self.idle_horizon_hours = hours;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("distance", self.weights.distance),
            ("fairness", self.weights.fairness),
            ("idle", self.weights.idle),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(DispatchError::InvalidConfig(format!(
                    "{name} weight must be a finite non-negative number, got {value}"
                )));
            }
        }
        if weights.iter().all(|(_, value)| *value == 0.0) {
            return Err(DispatchError::InvalidConfig(
                "at least one score weight must be positive".to_string(),
            ));
        }
        if !self.idle_horizon_hours.is_finite() || self.idle_horizon_hours <= 0.0 {
            return Err(DispatchError::InvalidConfig(format!(
                "idle_horizon_hours must be positive, got {}",
                self.idle_horizon_hours
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
