use chrono::{DateTime, Utc};

use crate::driver::DriverRecord;
use crate::ride::RideRequest;

use super::types::{Assignment, StrategyKind};

/// A rule that picks one driver out of an already filtered, non-empty pool.
///
/// Implementations must be pure: the same ride, pool (in the same order) and
/// `now` always yield the same driver.
pub trait SelectionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Pick a driver from `eligible`, which only holds online drivers.
    ///
    /// Returns `None` only when `eligible` is empty.
    fn select<'a>(
        &self,
        ride: &RideRequest,
        eligible: &[&'a DriverRecord],
        now: DateTime<Utc>,
    ) -> Option<Assignment<'a>>;
}
