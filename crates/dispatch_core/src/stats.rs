use chrono::{DateTime, Utc};
use tracing::debug;

use crate::driver::{DriverId, DriverRecord};

/// Return a new pool reflecting one completed assignment for `driver_id`.
///
/// The matching record has its ride count incremented and `last_ride_at` set to
/// `now`. Every other record is copied unchanged. An unknown id yields an
/// unchanged copy of the pool.
pub fn apply_completed_ride(
    driver_id: &DriverId,
    pool: &[DriverRecord],
    now: DateTime<Utc>,
) -> Vec<DriverRecord> {
    let mut matched = false;
    let updated = pool
        .iter()
        .map(|driver| {
            if &driver.id == driver_id {
                matched = true;
                driver.with_completed_ride(now)
            } else {
                driver.clone()
            }
        })
        .collect();

    if !matched {
        debug!(%driver_id, "completed ride for driver outside the pool");
    }
    updated
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::geo::Location;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn pool() -> Vec<DriverRecord> {
        vec![
            DriverRecord::new("a", Location::new(11.5, 43.1)).with_ride_count(2),
            DriverRecord::new("b", Location::new(11.6, 43.2))
                .with_ride_count(7)
                .with_last_ride_at(Some(now() - Duration::hours(3))),
            DriverRecord::new("c", Location::new(11.7, 43.3)).with_online(false),
        ]
    }

    #[test]
    fn only_the_matching_driver_changes() {
        let before = pool();
        let after = apply_completed_ride(&DriverId::from("b"), &before, now());

        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[1].ride_count, 8);
        assert_eq!(after[1].last_ride_at, Some(now()));
        assert_eq!(after[1].location, before[1].location);
        assert_eq!(before, pool());
    }

    #[test]
    fn unknown_driver_leaves_pool_unchanged() {
        let before = pool();
        let after = apply_completed_ride(&DriverId::from("zzz"), &before, now());
        assert_eq!(after, before);
    }

    #[test]
    fn empty_pool_stays_empty() {
        assert!(apply_completed_ride(&DriverId::from("a"), &[], now()).is_empty());
    }
}
