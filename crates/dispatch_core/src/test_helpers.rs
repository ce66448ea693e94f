//! Fixtures shared by unit tests, integration tests and benchmarks.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::driver::DriverRecord;
use crate::geo::Location;
use crate::ride::RideRequest;

/// Pickup point used across tests.
pub const TEST_PICKUP: Location = Location {
    latitude: 11.58,
    longitude: 43.14,
};

/// A fixed reference instant for reproducible scoring.
///
/// # Panics
///
/// Never; the date is a valid UTC instant.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("reference instant should be valid")
}

pub fn test_ride() -> RideRequest {
    RideRequest::new("ride-1", TEST_PICKUP)
}

/// An online driver at an offset (in degrees) from [`TEST_PICKUP`].
pub fn driver_near_pickup(id: &str, dlat: f64, dlng: f64) -> DriverRecord {
    DriverRecord::new(
        id,
        Location::new(TEST_PICKUP.latitude + dlat, TEST_PICKUP.longitude + dlng),
    )
}

/// An online driver whose last ride was `hours` before [`test_now`].
pub fn driver_idle_for(id: &str, hours: i64) -> DriverRecord {
    driver_near_pickup(id, 0.01, 0.01).with_last_ride_at(Some(test_now() - Duration::hours(hours)))
}

/// A reproducible pool of online drivers scattered within roughly 20 km of the pickup.
pub fn random_pool(seed: u64, size: usize) -> Vec<DriverRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|i| {
            let last_ride_at = if rng.gen_bool(0.2) {
                None
            } else {
                Some(test_now() - Duration::minutes(rng.gen_range(1..=72 * 60)))
            };
            driver_near_pickup(
                &format!("driver-{i:05}"),
                rng.gen_range(-0.18..0.18),
                rng.gen_range(-0.18..0.18),
            )
            .with_ride_count(rng.gen_range(0..40))
            .with_last_ride_at(last_ride_at)
            .with_online(rng.gen_bool(0.9))
        })
        .collect()
}
