//! Ride distribution: pick at most one online driver for a ride request.
//!
//! The engine filters out offline drivers, then hands the remaining pool to one
//! of two [`SelectionStrategy`] implementations depending on its size:
//!
//! - **[`RoundRobin`]** for pools up to `round_robin_max_pool` (5 by default):
//!   longest-idle driver first.
//! - **[`WeightedScoring`]** for larger pools: best blend of distance, fairness
//!   and idle time.
//!
//! The hard cutoff means a sixth driver coming online switches the whole pool to
//! a different rule, not just a marginally different ranking.

mod round_robin;
mod strategy;
mod types;
mod weighted;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::DistributionConfig;
use crate::driver::DriverRecord;
use crate::error::Result;
use crate::ride::RideRequest;

pub use round_robin::RoundRobin;
pub use strategy::SelectionStrategy;
pub use types::{Assignment, ScoreBreakdown, StrategyKind};
pub use weighted::WeightedScoring;

/// Selects drivers for ride requests under a fixed configuration.
#[derive(Debug, Clone)]
pub struct DistributionEngine {
    config: DistributionConfig,
    round_robin: RoundRobin,
    weighted: WeightedScoring,
}

impl DistributionEngine {
    /// Build an engine, rejecting configs that [`DistributionConfig::validate`] refuses.
    pub fn new(config: DistributionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            weighted: WeightedScoring::from_config(&config),
            round_robin: RoundRobin,
            config,
        })
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    /// The strategy used for a pool of `eligible_count` online drivers.
    pub fn strategy_for(&self, eligible_count: usize) -> &dyn SelectionStrategy {
        if eligible_count <= self.config.round_robin_max_pool {
            &self.round_robin
        } else {
            &self.weighted
        }
    }

    /// Choose a driver for `ride` out of `candidates` as of `now`.
    ///
    /// Returns `Ok(None)` when no candidate is online. Fails only when the
    /// ride's pickup coordinates are unusable.
    pub fn distribute<'a>(
        &self,
        ride: &RideRequest,
        candidates: &'a [DriverRecord],
        now: DateTime<Utc>,
    ) -> Result<Option<Assignment<'a>>> {
        ride.validate()?;

        let eligible: Vec<&DriverRecord> = candidates
            .iter()
            .filter(|driver| driver.is_eligible())
            .collect();
        if eligible.is_empty() {
            info!(
                ride_id = %ride.id,
                candidates = candidates.len(),
                "no online drivers for ride request"
            );
            return Ok(None);
        }

        let strategy = self.strategy_for(eligible.len());
        debug!(
            ride_id = %ride.id,
            eligible = eligible.len(),
            strategy = %strategy.kind(),
            "distributing ride request"
        );

        let assignment = strategy.select(ride, &eligible, now);
        if let Some(assignment) = &assignment {
            info!(
                ride_id = %ride.id,
                driver_id = %assignment.driver.id,
                strategy = %assignment.strategy,
                eligible = assignment.eligible_count,
                "selected driver"
            );
        }
        Ok(assignment)
    }

    /// Like [`distribute`](Self::distribute) but returns only the driver.
    pub fn select_driver<'a>(
        &self,
        ride: &RideRequest,
        candidates: &'a [DriverRecord],
        now: DateTime<Utc>,
    ) -> Result<Option<&'a DriverRecord>> {
        Ok(self
            .distribute(ride, candidates, now)?
            .map(|assignment| assignment.driver))
    }
}

impl Default for DistributionEngine {
    fn default() -> Self {
        let config = DistributionConfig::default();
        Self {
            weighted: WeightedScoring::from_config(&config),
            round_robin: RoundRobin,
            config,
        }
    }
}

/// Select a driver with the default configuration.
pub fn select_driver<'a>(
    ride: &RideRequest,
    candidates: &'a [DriverRecord],
    now: DateTime<Utc>,
) -> Result<Option<&'a DriverRecord>> {
    DistributionEngine::default().select_driver(ride, candidates, now)
}
