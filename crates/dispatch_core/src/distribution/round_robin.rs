use chrono::{DateTime, Utc};

use crate::driver::DriverRecord;
use crate::ride::RideRequest;

use super::strategy::SelectionStrategy;
use super::types::{Assignment, StrategyKind};

/// Longest-idle-first selection for small pools.
///
/// Drivers are ordered by `last_ride_at` ascending, with never-assigned drivers
/// ahead of everyone else. Pickup distance is ignored. Equal timestamps keep
/// their input order, so the earliest such driver in the pool wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundRobin;

impl SelectionStrategy for RoundRobin {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RoundRobin
    }

    fn select<'a>(
        &self,
        _ride: &RideRequest,
        eligible: &[&'a DriverRecord],
        _now: DateTime<Utc>,
    ) -> Option<Assignment<'a>> {
        // `None < Some(_)` and `min_by_key` keeps the first of equal minima.
        eligible
            .iter()
            .copied()
            .min_by_key(|driver| driver.last_ride_at)
            .map(|driver| Assignment {
                driver,
                strategy: StrategyKind::RoundRobin,
                eligible_count: eligible.len(),
                score: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::geo::Location;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn driver(id: &str, last_ride_at: Option<DateTime<Utc>>) -> DriverRecord {
        DriverRecord::new(id, Location::new(11.5, 43.1)).with_last_ride_at(last_ride_at)
    }

    fn ride() -> RideRequest {
        RideRequest::new("r1", Location::new(11.58, 43.14))
    }

    #[test]
    fn never_assigned_driver_goes_first() {
        let a = driver("a", Some(now() - Duration::hours(10)));
        let b = driver("b", None);
        let c = driver("c", Some(now() - Duration::hours(1)));
        let pool = [&a, &b, &c];

        let assignment = RoundRobin.select(&ride(), &pool, now()).expect("assignment");
        assert_eq!(assignment.driver.id.as_str(), "b");
        assert_eq!(assignment.strategy, StrategyKind::RoundRobin);
        assert_eq!(assignment.eligible_count, 3);
        assert!(assignment.score.is_none());
    }

    #[test]
    fn oldest_ride_wins_when_everyone_has_ridden() {
        let a = driver("a", Some(now() - Duration::hours(2)));
        let b = driver("b", Some(now() - Duration::hours(7)));
        let c = driver("c", Some(now() - Duration::minutes(5)));
        let pool = [&a, &b, &c];

        let assignment = RoundRobin.select(&ride(), &pool, now()).expect("assignment");
        assert_eq!(assignment.driver.id.as_str(), "b");
    }

    #[test]
    fn ties_keep_input_order() {
        let stamp = Some(now() - Duration::hours(3));
        let x = driver("x", stamp);
        let y = driver("y", stamp);
        let first = RoundRobin.select(&ride(), &[&y, &x], now()).expect("assignment");
        assert_eq!(first.driver.id.as_str(), "y");

        let n1 = driver("n1", None);
        let n2 = driver("n2", None);
        let second = RoundRobin.select(&ride(), &[&n2, &n1], now()).expect("assignment");
        assert_eq!(second.driver.id.as_str(), "n2");
    }

    #[test]
    fn empty_pool_selects_nobody() {
        assert!(RoundRobin.select(&ride(), &[], now()).is_none());
    }
}
