use chrono::{DateTime, Duration, Utc};
use dispatch_core::test_helpers::{driver_near_pickup, test_now};
use dispatch_core::{DriverRecord, Location};

/// `count` online, never-assigned drivers at the same spot near the pickup.
pub fn identical_online_drivers(count: usize) -> Vec<DriverRecord> {
    (0..count)
        .map(|i| driver_near_pickup(&format!("d{i}"), 0.02, 0.02))
        .collect()
}

pub fn hours_ago(hours: i64) -> Option<DateTime<Utc>> {
    Some(test_now() - Duration::hours(hours))
}

/// Six online drivers around pickup (11.58, 43.14) with varied history.
///
/// Hand-computed totals at [`test_now`]:
///
/// | id | km     | distance | fairness | idle   | total  |
/// |----|--------|----------|----------|--------|--------|
/// | A  | 0.000  | 1.0000   | 0.0909   | 0.0417 | 0.4447 |
/// | B  | 3.113  | 0.2431   | 0.8182   | 0.2083 | 0.4662 |
/// | C  | 21.947 | 0.0436   | 1.0000   | 1.0000 | 0.6174 |
/// | D  | 1.557  | 0.3911   | 0.4545   | 0.5000 | 0.4383 |
/// | E  | 60.964 | 0.0161   | 0.9091   | 1.0000 | 0.5701 |
/// | F  | 0.778  | 0.5623   | 0.6364   | 0.0833 | 0.4961 |
pub fn scenario_pool() -> Vec<DriverRecord> {
    vec![
        DriverRecord::new("A", Location::new(11.58, 43.14))
            .with_ride_count(10)
            .with_last_ride_at(hours_ago(1)),
        DriverRecord::new("B", Location::new(11.60, 43.16))
            .with_ride_count(2)
            .with_last_ride_at(hours_ago(5)),
        DriverRecord::new("C", Location::new(11.70, 43.30)),
        DriverRecord::new("D", Location::new(11.59, 43.15))
            .with_ride_count(6)
            .with_last_ride_at(hours_ago(12)),
        DriverRecord::new("E", Location::new(12.00, 43.50))
            .with_ride_count(1)
            .with_last_ride_at(hours_ago(30)),
        DriverRecord::new("F", Location::new(11.585, 43.145))
            .with_ride_count(4)
            .with_last_ride_at(hours_ago(2)),
    ]
}
