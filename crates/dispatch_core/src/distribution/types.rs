use std::fmt;

use serde::Serialize;

use crate::driver::DriverRecord;

/// Which selection rule produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    RoundRobin,
    WeightedScoring,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin => f.write_str("round_robin"),
            Self::WeightedScoring => f.write_str("weighted_scoring"),
        }
    }
}

/// Per-driver scoring components, each already normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Great-circle distance to the pickup; `None` when the driver's location is unusable.
    pub distance_km: Option<f64>,
    pub distance: f64,
    pub fairness: f64,
    pub idle: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Score given to a driver whose components cannot be computed.
    pub fn unscorable() -> Self {
        Self {
            distance_km: None,
            distance: 0.0,
            fairness: 0.0,
            idle: 0.0,
            total: 0.0,
        }
    }

    pub fn is_scorable(&self) -> bool {
        self.distance_km.is_some()
    }
}

/// The driver chosen for a ride request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment<'a> {
    pub driver: &'a DriverRecord,
    pub strategy: StrategyKind,
    /// Number of online drivers considered.
    pub eligible_count: usize,
    /// Present only for the weighted scoring branch.
    pub score: Option<ScoreBreakdown>,
}
