use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::{DistributionConfig, ScoreWeights};
use crate::driver::DriverRecord;
use crate::geo::Location;
use crate::ride::RideRequest;

use super::strategy::SelectionStrategy;
use super::types::{Assignment, ScoreBreakdown, StrategyKind};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Weighted blend of pickup proximity, ride-count fairness and idle time.
///
/// * distance: `1 / (1 + km)`
/// * fairness: `1 - rides / (max_rides_in_pool + 1)`
/// * idle: `min(hours_idle / horizon, 1)`, never-assigned drivers score `1`
///
/// The highest total wins. Equal totals go to the lowest driver id, then to the
/// earlier record in the pool.
#[derive(Debug, Clone, Copy)]
pub struct WeightedScoring {
    pub weights: ScoreWeights,
    pub idle_horizon_hours: f64,
}

impl WeightedScoring {
    pub fn new(weights: ScoreWeights, idle_horizon_hours: f64) -> Self {
        Self {
            weights,
            idle_horizon_hours,
        }
    }

    pub fn from_config(config: &DistributionConfig) -> Self {
        Self::new(config.weights, config.idle_horizon_hours)
    }

    pub fn distance_score(distance_km: f64) -> f64 {
        1.0 / (1.0 + distance_km)
    }

    pub fn fairness_score(ride_count: u32, max_ride_count: u32) -> f64 {
        1.0 - f64::from(ride_count) / (f64::from(max_ride_count) + 1.0)
    }

    /// Idle score for a driver last assigned at `last_ride_at`.
    ///
    /// Timestamps in the future count as zero idle time.
    pub fn idle_score(&self, last_ride_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        let hours_idle = match last_ride_at {
            Some(at) => ((now - at).num_milliseconds() as f64 / MS_PER_HOUR).max(0.0),
            None => self.idle_horizon_hours,
        };
        (hours_idle / self.idle_horizon_hours).min(1.0)
    }

    /// Score one driver against a pickup point.
    pub fn score(
        &self,
        driver: &DriverRecord,
        pickup: &Location,
        max_ride_count: u32,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        if !driver.location.is_valid() {
            warn!(
                driver_id = %driver.id,
                latitude = driver.location.latitude,
                longitude = driver.location.longitude,
                "driver location unusable, scoring as zero"
            );
            return ScoreBreakdown::unscorable();
        }

        let distance_km = driver.location.distance_km(pickup);
        let distance = Self::distance_score(distance_km);
        let fairness = Self::fairness_score(driver.ride_count, max_ride_count);
        let idle = self.idle_score(driver.last_ride_at, now);
        let total = self.weights.distance * distance
            + self.weights.fairness * fairness
            + self.weights.idle * idle;

        ScoreBreakdown {
            distance_km: Some(distance_km),
            distance,
            fairness,
            idle,
            total,
        }
    }
}

impl Default for WeightedScoring {
    fn default() -> Self {
        Self::from_config(&DistributionConfig::default())
    }
}

/// Ordering used to rank scored drivers; `Greater` means `a` should win over `b`.
///
/// Any scorable driver outranks an unscorable one, even at a total of zero.
fn rank(a: (&DriverRecord, &ScoreBreakdown), b: (&DriverRecord, &ScoreBreakdown)) -> Ordering {
    a.1.is_scorable()
        .cmp(&b.1.is_scorable())
        .then_with(|| a.1.total.total_cmp(&b.1.total))
        .then_with(|| b.0.id.cmp(&a.0.id))
}

impl SelectionStrategy for WeightedScoring {
    fn kind(&self) -> StrategyKind {
        StrategyKind::WeightedScoring
    }

    fn select<'a>(
        &self,
        ride: &RideRequest,
        eligible: &[&'a DriverRecord],
        now: DateTime<Utc>,
    ) -> Option<Assignment<'a>> {
        let max_ride_count = eligible
            .iter()
            .map(|driver| driver.ride_count)
            .max()
            .unwrap_or(0);

        let best = eligible
            .iter()
            .map(|driver| {
                let score = self.score(driver, &ride.pickup, max_ride_count, now);
                debug!(
                    driver_id = %driver.id,
                    total = score.total,
                    distance = score.distance,
                    fairness = score.fairness,
                    idle = score.idle,
                    "scored driver"
                );
                (*driver, score)
            })
            .reduce(|best, candidate| {
                if rank((candidate.0, &candidate.1), (best.0, &best.1)) == Ordering::Greater {
                    candidate
                } else {
                    best
                }
            })?;

        Some(Assignment {
            driver: best.0,
            strategy: StrategyKind::WeightedScoring,
            eligible_count: eligible.len(),
            score: Some(best.1),
        })
    }
}
