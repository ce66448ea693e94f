use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Location;

/// Opaque driver identifier, stable across distribution calls.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub String);

impl DriverId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DriverId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DriverId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Snapshot of one candidate driver's assignment-relevant state.
///
/// Records are values: updating a driver's stats produces a new record
/// (see [`DriverRecord::with_completed_ride`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub id: DriverId,
    /// Most recently reported position.
    pub location: Location,
    /// Rides assigned to this driver so far.
    pub ride_count: u32,
    /// Time of the most recent assignment; `None` means never assigned.
    pub last_ride_at: Option<DateTime<Utc>>,
    pub is_online: bool,
}

impl DriverRecord {
    /// An online driver that has never been assigned a ride.
    pub fn new(id: impl Into<DriverId>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
            ride_count: 0,
            last_ride_at: None,
            is_online: true,
        }
    }

    pub fn with_ride_count(mut self, ride_count: u32) -> Self {
        self.ride_count = ride_count;
        self
    }

    pub fn with_last_ride_at(mut self, last_ride_at: Option<DateTime<Utc>>) -> Self {
        self.last_ride_at = last_ride_at;
        self
    }

    pub fn with_online(mut self, is_online: bool) -> Self {
        self.is_online = is_online;
        self
    }

    /// Offline drivers never take part in selection.
    pub fn is_eligible(&self) -> bool {
        self.is_online
    }

    /// Copy of this record after one more assigned ride at `now`.
    pub fn with_completed_ride(&self, now: DateTime<Utc>) -> Self {
        Self {
            ride_count: self.ride_count.saturating_add(1),
            last_ride_at: Some(now),
            ..self.clone()
        }
    }
}
