//! Dispatch a stream of rides over a random 40-driver pool and print how the
//! assignments spread across drivers.
//!
//! Run with: cargo run -p dispatch_core --example dispatch_cycle

use std::collections::BTreeMap;

use chrono::Duration;
use dispatch_core::test_helpers::{random_pool, test_now, TEST_PICKUP};
use dispatch_core::{DistributionConfig, Dispatcher, FixedClock, Location, RideRequest};

fn main() {
    const NUM_DRIVERS: usize = 40;
    const NUM_RIDES: usize = 200;

    let clock = FixedClock::new(test_now());
    let dispatcher = match Dispatcher::new(DistributionConfig::default(), &clock) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            eprintln!("invalid config: {err}");
            return;
        }
    };

    let mut pool = random_pool(123, NUM_DRIVERS);
    let mut per_strategy = BTreeMap::new();
    let mut unmatched = 0;

    for i in 0..NUM_RIDES {
        let offset = (i % 10) as f64 * 0.01;
        let ride = RideRequest::new(
            format!("ride-{i}"),
            Location::new(TEST_PICKUP.latitude + offset, TEST_PICKUP.longitude - offset),
        );
        let accepted = match dispatcher.dispatch(&ride, &pool) {
            Ok(Some(assignment)) => {
                *per_strategy.entry(assignment.strategy.to_string()).or_insert(0) += 1;
                Some(assignment.driver.id.clone())
            }
            Ok(None) => None,
            Err(err) => {
                eprintln!("ride {} rejected: {err}", ride.id);
                None
            }
        };
        match accepted {
            Some(driver_id) => pool = dispatcher.complete_ride(&driver_id, &pool),
            None => unmatched += 1,
        }
        clock.advance(Duration::minutes(3));
    }

    println!("--- Dispatch cycle ({NUM_RIDES} rides, {NUM_DRIVERS} drivers, seed 123) ---");
    println!("Unmatched rides: {unmatched}");
    for (strategy, count) in &per_strategy {
        println!("Assigned via {strategy}: {count}");
    }

    let mut online: Vec<_> = pool.iter().filter(|d| d.is_online).collect();
    online.sort_by(|a, b| b.ride_count.cmp(&a.ride_count).then_with(|| a.id.cmp(&b.id)));
    println!("\nRide counts (online drivers):");
    for driver in online {
        println!("  {:<14} rides={:>3}", driver.id.as_str(), driver.ride_count);
    }
}
