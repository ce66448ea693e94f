use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::config::DistributionConfig;
use crate::distribution::{Assignment, DistributionEngine};
use crate::driver::{DriverId, DriverRecord};
use crate::error::Result;
use crate::ride::RideRequest;
use crate::stats::apply_completed_ride;

/// Binds a [`DistributionEngine`] to a [`Clock`].
///
/// This is where "now" is read. Everything below it takes time as an argument.
#[derive(Debug)]
pub struct Dispatcher<C: Clock = SystemClock> {
    engine: DistributionEngine,
    clock: C,
}

impl Dispatcher<SystemClock> {
    /// Wall-clock dispatcher with the given config.
    pub fn with_system_clock(config: DistributionConfig) -> Result<Self> {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(config: DistributionConfig, clock: C) -> Result<Self> {
        Ok(Self {
            engine: DistributionEngine::new(config)?,
            clock,
        })
    }

    pub fn engine(&self) -> &DistributionEngine {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Pick a driver for `ride` from `pool` as of the clock's current time.
    pub fn dispatch<'a>(
        &self,
        ride: &RideRequest,
        pool: &'a [DriverRecord],
    ) -> Result<Option<Assignment<'a>>> {
        self.engine.distribute(ride, pool, self.clock.now())
    }

    /// Record that `driver_id` accepted a ride now.
    pub fn complete_ride(&self, driver_id: &DriverId, pool: &[DriverRecord]) -> Vec<DriverRecord> {
        apply_completed_ride(driver_id, pool, self.clock.now())
    }
}
