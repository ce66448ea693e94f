//! Great-circle distance between WGS84 coordinates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite and inside the geographic range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn distance_km(&self, other: &Location) -> f64 {
        great_circle_distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Haversine distance in kilometres between two points given in degrees.
///
/// Coordinates are not range-checked; identical points yield `0.0`.
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(great_circle_distance_km(11.58, 43.14, 11.58, 43.14), 0.0);
        assert_eq!(great_circle_distance_km(-33.9, 151.2, -33.9, 151.2), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = great_circle_distance_km(48.8566, 2.3522, 51.5074, -0.1278);
        let ba = great_circle_distance_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn paris_to_london_is_about_344_km() {
        let distance = great_circle_distance_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!(
            (distance - 343.5).abs() < 2.0,
            "unexpected distance: {distance}"
        );
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let distance = great_circle_distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((distance - 111.19).abs() < 0.05, "unexpected distance: {distance}");
    }

    #[test]
    fn location_validity_checks_range_and_finiteness() {
        assert!(Location::new(11.58, 43.14).is_valid());
        assert!(Location::new(-90.0, 180.0).is_valid());
        assert!(!Location::new(90.5, 0.0).is_valid());
        assert!(!Location::new(0.0, -180.5).is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_valid());
        assert!(!Location::new(0.0, f64::INFINITY).is_valid());
    }
}
