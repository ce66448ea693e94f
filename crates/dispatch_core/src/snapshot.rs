//! Point-in-time exports of the driver and ride-request collections.
//!
//! Documents arrive loosely shaped: coordinates may be missing, counters may be
//! absent and timestamps are either RFC 3339 strings or epoch milliseconds. This
//! module turns them into the typed records the engine consumes.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::driver::{DriverId, DriverRecord};
use crate::error::{DispatchError, Result};
use crate::geo::Location;
use crate::ride::{RideId, RideRequest};

/// Status of a ride request still looking for a driver.
pub const WAITING_STATUS: &str = "waiting";

/// A stored timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    EpochMillis(i64),
    Text(String),
}

impl StoredTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::EpochMillis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
        }
    }
}

fn parse_timestamp(
    id: &str,
    field: &str,
    value: Option<&StoredTimestamp>,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(stamp) => stamp.to_datetime().map(Some).ok_or_else(|| {
            DispatchError::InvalidDocument {
                id: id.to_string(),
                reason: format!("{field} is not a valid timestamp: {stamp:?}"),
            }
        }),
    }
}

/// One document of the drivers collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDocument {
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// `null` or absent means offline.
    #[serde(default)]
    pub is_online: Option<bool>,
    /// Stores may hand back whole numbers as floats (`2.0`).
    #[serde(default)]
    pub ride_count: Option<f64>,
    #[serde(default)]
    pub last_ride_time: Option<StoredTimestamp>,
    /// Vehicle class the driver serves.
    #[serde(default)]
    pub driver_type: Option<String>,
}

impl DriverDocument {
    /// Type one raw document, reporting the failure against its `id` when it has one.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|err| DispatchError::InvalidDocument {
            id: value
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("<unknown>")
                .to_string(),
            reason: err.to_string(),
        })
    }

    fn ride_count(&self) -> Result<u32> {
        match self.ride_count {
            None => Ok(0),
            Some(count)
                if count.is_finite()
                    && count >= 0.0
                    && count.fract() == 0.0
                    && count <= f64::from(u32::MAX) =>
            {
                Ok(count as u32)
            }
            Some(count) => Err(DispatchError::InvalidDocument {
                id: self.id.clone(),
                reason: format!("rideCount must be a non-negative whole number, got {count}"),
            }),
        }
    }

    /// Build a record from this document.
    ///
    /// Drivers without a reported position yield `Ok(None)`: they cannot be
    /// placed relative to a pickup. An unparsable `lastRideTime` or a
    /// fractional or negative `rideCount` is an error.
    pub fn to_record(&self) -> Result<Option<DriverRecord>> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Ok(None);
        };
        let ride_count = self.ride_count()?;
        let last_ride_at =
            parse_timestamp(&self.id, "lastRideTime", self.last_ride_time.as_ref())?;

        Ok(Some(DriverRecord {
            id: DriverId::from(self.id.as_str()),
            location: Location::new(latitude, longitude),
            ride_count,
            last_ride_at,
            is_online: self.is_online.unwrap_or(false),
        }))
    }
}

/// One document of the ride requests collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRequestDocument {
    pub id: String,
    #[serde(default)]
    pub pickup_lat: Option<f64>,
    #[serde(default)]
    pub pickup_lng: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ride_type: Option<String>,
    #[serde(default)]
    pub requested_at: Option<StoredTimestamp>,
}

impl RideRequestDocument {
    /// Requests without a status are treated as waiting.
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|status| status == WAITING_STATUS)
    }
}

impl TryFrom<&RideRequestDocument> for RideRequest {
    type Error = DispatchError;

    fn try_from(doc: &RideRequestDocument) -> Result<Self> {
        let (Some(latitude), Some(longitude)) = (doc.pickup_lat, doc.pickup_lng) else {
            return Err(DispatchError::invalid_ride(
                &doc.id,
                "pickup coordinates are missing",
            ));
        };
        let requested_at = parse_timestamp(&doc.id, "requestedAt", doc.requested_at.as_ref())?;

        let ride = RideRequest {
            id: RideId::from(doc.id.as_str()),
            pickup: Location::new(latitude, longitude),
            ride_type: doc.ride_type.clone(),
            requested_at,
        };
        ride.validate()?;
        Ok(ride)
    }
}

/// A store export holding both collections.
///
/// Driver documents stay raw until read so that one badly shaped driver is
/// skipped instead of failing the whole export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub drivers: Vec<Value>,
    #[serde(default)]
    pub ride_requests: Vec<RideRequestDocument>,
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Driver documents that could be typed, in document order.
    pub fn driver_documents(&self) -> impl Iterator<Item = DriverDocument> + '_ {
        self.drivers
            .iter()
            .filter_map(|value| match DriverDocument::from_value(value) {
                Ok(doc) => Some(doc),
                Err(err) => {
                    warn!(error = %err, "skipping driver document");
                    None
                }
            })
    }

    /// Every usable driver, in document order.
    ///
    /// Documents that are badly shaped, have no position or carry a corrupt
    /// field are skipped.
    pub fn driver_pool(&self) -> Vec<DriverRecord> {
        self.driver_documents()
            .filter_map(|doc| match doc.to_record() {
                Ok(Some(record)) => Some(record),
                Ok(None) => {
                    debug!(driver_id = %doc.id, "driver has no location, skipping");
                    None
                }
                Err(err) => {
                    warn!(driver_id = %doc.id, error = %err, "skipping driver document");
                    None
                }
            })
            .collect()
    }

    /// Narrow `pool` to drivers able to serve `ride`.
    ///
    /// A driver is excluded only when both the ride and the driver document name
    /// a vehicle class and the two differ.
    pub fn candidates_for(&self, ride: &RideRequest, pool: &[DriverRecord]) -> Vec<DriverRecord> {
        let Some(requested) = ride.ride_type.as_deref() else {
            return pool.to_vec();
        };
        let driver_types: HashMap<String, String> = self
            .driver_documents()
            .filter_map(|doc| doc.driver_type.map(|kind| (doc.id, kind)))
            .collect();

        pool.iter()
            .filter(|driver| {
                driver_types
                    .get(driver.id.as_str())
                    .is_none_or(|kind| kind == requested)
            })
            .cloned()
            .collect()
    }

    /// Waiting ride requests in document order.
    pub fn pending_requests(&self) -> impl Iterator<Item = &RideRequestDocument> {
        self.ride_requests.iter().filter(|doc| doc.is_pending())
    }

    pub fn ride_request(&self, id: &str) -> Option<&RideRequestDocument> {
        self.ride_requests.iter().find(|doc| doc.id == id)
    }
}
