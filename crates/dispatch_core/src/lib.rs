//! Ride distribution for the Caval driver app.
//!
//! Given one ride request and a snapshot of candidate drivers, the engine picks
//! at most one online driver to notify. Small pools are served longest-idle-first;
//! larger pools are ranked by a weighted blend of pickup distance, ride-count
//! fairness and idle time.

pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod distribution;
pub mod driver;
pub mod error;
pub mod geo;
pub mod ride;
pub mod snapshot;
pub mod stats;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DistributionConfig, ScoreWeights};
pub use dispatcher::Dispatcher;
pub use distribution::{select_driver, Assignment, DistributionEngine, ScoreBreakdown, StrategyKind};
pub use driver::{DriverId, DriverRecord};
pub use error::{DispatchError, Result};
pub use geo::{great_circle_distance_km, Location};
pub use ride::{RideId, RideRequest};
pub use stats::apply_completed_ride;
