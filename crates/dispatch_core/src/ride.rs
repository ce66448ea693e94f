use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::geo::Location;

/// Opaque ride request identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(pub String);

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RideId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RideId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A pickup request waiting for a driver.
///
/// Only `pickup` influences the decision. `ride_type` and `requested_at` are
/// carried for the calling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: RideId,
    pub pickup: Location,
    /// Requested vehicle class.
    pub ride_type: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
}

impl RideRequest {
    pub fn new(id: impl Into<RideId>, pickup: Location) -> Self {
        Self {
            id: id.into(),
            pickup,
            ride_type: None,
            requested_at: None,
        }
    }

    pub fn with_ride_type(mut self, ride_type: impl Into<String>) -> Self {
        self.ride_type = Some(ride_type.into());
        self
    }

    pub fn with_requested_at(mut self, requested_at: DateTime<Utc>) -> Self {
        self.requested_at = Some(requested_at);
        self
    }

    /// Rejects requests whose pickup cannot be used for distance scoring.
    pub fn validate(&self) -> Result<()> {
        if !self.pickup.is_valid() {
            return Err(DispatchError::invalid_ride(
                &self.id,
                format!(
                    "pickup ({}, {}) is not a finite position inside the geographic range",
                    self.pickup.latitude, self.pickup.longitude
                ),
            ));
        }
        Ok(())
    }
}
