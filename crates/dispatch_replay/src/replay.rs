//! Runs the distribution engine over a recorded store export.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dispatch_core::snapshot::{RideRequestDocument, Snapshot};
use dispatch_core::{
    DispatchError, Dispatcher, DistributionConfig, DriverId, DriverRecord, FixedClock,
    RideRequest, ScoreBreakdown, StrategyKind,
};
use serde::Serialize;
use tracing::{info, warn};

/// What happened to one ride request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideOutcome {
    pub ride_id: String,
    pub evaluated_at: DateTime<Utc>,
    pub candidates: usize,
    pub driver_id: Option<String>,
    pub strategy: Option<StrategyKind>,
    pub score: Option<ScoreBreakdown>,
    /// Set when the request itself was unusable.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub outcomes: Vec<RideOutcome>,
    /// Ride counts after every assignment was accepted, by driver id.
    pub ride_counts: BTreeMap<String, u32>,
}

impl ReplayReport {
    pub fn assigned(&self) -> usize {
        self.outcomes.iter().filter(|o| o.driver_id.is_some()).count()
    }
}

pub struct Replay<'s> {
    snapshot: &'s Snapshot,
    dispatcher: Dispatcher<FixedClock>,
    base_time: DateTime<Utc>,
}

impl<'s> Replay<'s> {
    pub fn new(
        snapshot: &'s Snapshot,
        config: DistributionConfig,
        base_time: DateTime<Utc>,
    ) -> Result<Self, DispatchError> {
        Ok(Self {
            snapshot,
            dispatcher: Dispatcher::new(config, FixedClock::new(base_time))?,
            base_time,
        })
    }

    /// Dispatch a single request against the untouched driver pool.
    pub fn select(&self, doc: &RideRequestDocument) -> RideOutcome {
        let pool = self.snapshot.driver_pool();
        self.evaluate(doc, &pool).0
    }

    /// Dispatch every pending request in order, accepting each assignment
    /// before moving to the next request.
    pub fn run(&self) -> ReplayReport {
        let mut pool = self.snapshot.driver_pool();
        let mut outcomes = Vec::new();

        for doc in self.snapshot.pending_requests() {
            let (outcome, accepted) = self.evaluate(doc, &pool);
            if let Some(driver_id) = accepted {
                pool = self.dispatcher.complete_ride(&driver_id, &pool);
            }
            outcomes.push(outcome);
        }

        let ride_counts = pool
            .iter()
            .map(|driver| (driver.id.to_string(), driver.ride_count))
            .collect();
        let report = ReplayReport {
            outcomes,
            ride_counts,
        };
        info!(
            rides = report.outcomes.len(),
            assigned = report.assigned(),
            "replay finished"
        );
        report
    }

    fn evaluate(
        &self,
        doc: &RideRequestDocument,
        pool: &[DriverRecord],
    ) -> (RideOutcome, Option<DriverId>) {
        let mut outcome = RideOutcome {
            ride_id: doc.id.clone(),
            evaluated_at: self.dispatcher.now().max(self.base_time),
            candidates: 0,
            driver_id: None,
            strategy: None,
            score: None,
            error: None,
        };

        let ride = match RideRequest::try_from(doc) {
            Ok(ride) => ride,
            Err(err) => {
                warn!(ride_id = %doc.id, error = %err, "skipping ride request");
                outcome.error = Some(err.to_string());
                return (outcome, None);
            }
        };

        // Untimed requests inherit the latest time seen so far.
        let evaluated_at = ride
            .requested_at
            .unwrap_or_else(|| self.dispatcher.now().max(self.base_time));
        self.dispatcher.clock().set(evaluated_at);
        outcome.evaluated_at = self.dispatcher.now();

        let candidates = self.snapshot.candidates_for(&ride, pool);
        outcome.candidates = candidates.len();

        match self.dispatcher.dispatch(&ride, &candidates) {
            Ok(Some(assignment)) => {
                outcome.driver_id = Some(assignment.driver.id.to_string());
                outcome.strategy = Some(assignment.strategy);
                outcome.score = assignment.score;
                let accepted = assignment.driver.id.clone();
                (outcome, Some(accepted))
            }
            Ok(None) => (outcome, None),
            Err(err) => {
                warn!(ride_id = %doc.id, error = %err, "ride request rejected");
                outcome.error = Some(err.to_string());
                (outcome, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const EXPORT: &str = r#"{
        "drivers": [
            {"id": "a", "latitude": 11.58, "longitude": 43.14, "isOnline": true, "rideCount": 1,
             "lastRideTime": "2024-05-01T09:00:00Z"},
            {"id": "b", "latitude": 11.60, "longitude": 43.16, "isOnline": true},
            {"id": "c", "latitude": 11.61, "longitude": 43.17, "isOnline": false}
        ],
        "rideRequests": [
            {"id": "r1", "pickupLat": 11.58, "pickupLng": 43.14},
            {"id": "r2", "pickupLat": 11.58, "pickupLng": 43.14, "requestedAt": "2024-05-01T12:30:00Z"},
            {"id": "r3", "pickupLng": 43.14},
            {"id": "r4", "pickupLat": 11.58, "pickupLng": 43.14, "status": "cancelled"},
            {"id": "r5", "pickupLat": 11.58, "pickupLng": 43.14}
        ]
    }"#;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn replay_accepts_each_assignment_before_the_next_ride() {
        let snapshot = Snapshot::from_json_str(EXPORT).expect("snapshot");
        let replay = Replay::new(&snapshot, DistributionConfig::default(), base()).expect("replay");

        let report = replay.run();
        let ids: Vec<&str> = report.outcomes.iter().map(|o| o.ride_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3", "r5"]);

        let drivers: Vec<Option<&str>> = report
            .outcomes
            .iter()
            .map(|o| o.driver_id.as_deref())
            .collect();
        // b never rode, then a (09:00) is older than b (12:00), then b (12:00) older than a (12:30).
        assert_eq!(drivers, vec![Some("b"), Some("a"), None, Some("b")]);
        assert_eq!(report.outcomes[1].evaluated_at, base() + chrono::Duration::minutes(30));
        assert_eq!(report.outcomes[3].evaluated_at, base() + chrono::Duration::minutes(30));
        assert!(report.outcomes[2].error.is_some());
        assert_eq!(report.assigned(), 3);

        assert_eq!(report.ride_counts["a"], 2);
        assert_eq!(report.ride_counts["b"], 2);
        assert_eq!(report.ride_counts["c"], 0);
    }

    #[test]
    fn untimed_request_does_not_move_the_clock_backwards() {
        let snapshot = Snapshot::from_json_str(
            r#"{
                "drivers": [
                    {"id": "a", "latitude": 11.58, "longitude": 43.14, "isOnline": true},
                    {"id": "b", "latitude": 11.60, "longitude": 43.16, "isOnline": true}
                ],
                "rideRequests": [
                    {"id": "r1", "pickupLat": 11.58, "pickupLng": 43.14, "requestedAt": "2024-05-01T13:00:00Z"},
                    {"id": "r2", "pickupLat": 11.58, "pickupLng": 43.14},
                    {"id": "r3", "pickupLat": 11.58, "pickupLng": 43.14}
                ]
            }"#,
        )
        .expect("snapshot");
        let replay = Replay::new(&snapshot, DistributionConfig::default(), base()).expect("replay");

        let report = replay.run();
        let one_pm = base() + chrono::Duration::hours(1);
        let times: Vec<DateTime<Utc>> = report.outcomes.iter().map(|o| o.evaluated_at).collect();
        assert_eq!(times, vec![one_pm, one_pm, one_pm]);

        // a and b both finish at 13:00, so the third ride goes back to a by input order.
        let drivers: Vec<Option<&str>> = report
            .outcomes
            .iter()
            .map(|o| o.driver_id.as_deref())
            .collect();
        assert_eq!(drivers, vec![Some("a"), Some("b"), Some("a")]);
    }

    #[test]
    fn select_does_not_mutate_the_pool() {
        let snapshot = Snapshot::from_json_str(EXPORT).expect("snapshot");
        let replay = Replay::new(&snapshot, DistributionConfig::default(), base()).expect("replay");
        let doc = snapshot.ride_request("r1").expect("r1");

        let first = replay.select(doc);
        let second = replay.select(doc);
        assert_eq!(first, second);
        assert_eq!(first.driver_id.as_deref(), Some("b"));
        assert_eq!(first.strategy, Some(StrategyKind::RoundRobin));
        assert_eq!(first.candidates, 3);
    }
}
