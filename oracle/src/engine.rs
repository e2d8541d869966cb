//! Consensus engine: oracle registration, status requests and response tallies.

use crate::error::OracleError;
use crate::registry::{Oracle, OracleRegistry};
use crate::request::StatusRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use surety_types::{AccountId, Amount, FlightKey, FlightStatus, ProtocolParams, Timestamp};
use surety_vrf::{draw_index, draw_indexes, VrfProvider};

/// Events emitted by the engine for the facade to publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleEvent {
    /// An oracle registered and received its indexes.
    OracleRegistered { oracle: AccountId, indexes: Vec<u8> },
    /// Oracles holding `index` should report on `flight`.
    OracleRequest {
        index: u8,
        flight: FlightKey,
        requester: AccountId,
    },
    /// An accepted response that has not (yet) reached quorum on its own.
    OracleReport {
        flight: FlightKey,
        status: FlightStatus,
        index: u8,
        oracle: AccountId,
        count: usize,
    },
    /// Quorum reached; the flight status is final.
    FlightStatusInfo {
        flight: FlightKey,
        status: FlightStatus,
        index: u8,
    },
    /// A request timed out before reaching quorum.
    RequestExpired { flight: FlightKey, index: u8 },
}

/// The accepted status of a flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub status: FlightStatus,
    /// Index of the request that reached quorum.
    pub index: u8,
    pub resolved_at: Timestamp,
    pub reporters: Vec<AccountId>,
}

pub struct ConsensusEngine {
    params: ProtocolParams,
    registry: OracleRegistry,
    /// Open requests keyed by flight and open index.
    requests: BTreeMap<(FlightKey, u8), StatusRequest>,
    resolved: BTreeMap<FlightKey, Resolution>,
    /// Mixed into every random draw; never reused.
    nonce: u64,
    pending_events: Vec<OracleEvent>,
}

impl ConsensusEngine {
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params,
            registry: OracleRegistry::new(),
            requests: BTreeMap::new(),
            resolved: BTreeMap::new(),
            nonce: 0,
            pending_events: Vec::new(),
        }
    }

    /// Register `caller` as an oracle and assign its indexes.
    pub fn register_oracle(
        &mut self,
        vrf: &dyn VrfProvider,
        caller: &AccountId,
        fee: Amount,
        now: Timestamp,
    ) -> Result<Vec<u8>, OracleError> {
        let admission = self.prepare_oracle(vrf, caller, fee, now)?;
        self.admit_oracle(admission)
    }

    /// Run every registration check and draw the caller's indexes without
    /// changing state.
    pub fn prepare_oracle(
        &self,
        vrf: &dyn VrfProvider,
        caller: &AccountId,
        fee: Amount,
        now: Timestamp,
    ) -> Result<OracleAdmission, OracleError> {
        let required = self.params.registration_fee();
        if fee < required {
            return Err(OracleError::InsufficientFee { fee, required });
        }
        if self.registry.contains(caller) {
            return Err(OracleError::OracleAlreadyRegistered(caller.clone()));
        }

        let context = self.draw_context(caller, now);
        let indexes = draw_indexes(
            vrf,
            &context,
            self.params.index_space,
            self.params.indexes_per_oracle,
        )?;
        Ok(OracleAdmission {
            oracle: Oracle {
                id: caller.clone(),
                indexes,
                registered_at: now,
            },
        })
    }

    /// Record an oracle prepared by [`ConsensusEngine::prepare_oracle`].
    pub fn admit_oracle(&mut self, admission: OracleAdmission) -> Result<Vec<u8>, OracleError> {
        let OracleAdmission { oracle } = admission;
        if self.registry.contains(&oracle.id) {
            return Err(OracleError::OracleAlreadyRegistered(oracle.id));
        }
        self.nonce = self.nonce.wrapping_add(1);
        let indexes = oracle.indexes.clone();

        tracing::info!(oracle = %oracle.id, ?indexes, "oracle registered");
        self.pending_events.push(OracleEvent::OracleRegistered {
            oracle: oracle.id.clone(),
            indexes: indexes.clone(),
        });
        self.registry.insert(oracle);
        Ok(indexes)
    }

    /// The indexes assigned to `caller`.
    pub fn indexes_of(&self, caller: &AccountId) -> Result<&[u8], OracleError> {
        self.registry
            .get(caller)
            .map(|o| o.indexes.as_slice())
            .ok_or_else(|| OracleError::NotRegisteredOracle(caller.clone()))
    }

    /// Open a status request for `flight` at a freshly drawn index.
    ///
    /// Re-opening an index that is already open keeps its tally.
    pub fn fetch_flight_status(
        &mut self,
        vrf: &dyn VrfProvider,
        caller: &AccountId,
        flight: &FlightKey,
        now: Timestamp,
    ) -> Result<u8, OracleError> {
        if self.resolved.contains_key(flight) {
            return Err(OracleError::AlreadyResolved(flight.clone()));
        }

        let mut context = self.draw_context(caller, now);
        context.extend_from_slice(&flight.digest());
        let index = draw_index(vrf, &context, self.params.index_space)?;
        self.nonce = self.nonce.wrapping_add(1);

        self.requests
            .entry((flight.clone(), index))
            .or_insert_with(|| StatusRequest::new(flight.clone(), index, caller.clone(), now));

        tracing::debug!(%flight, index, requester = %caller, "status request opened");
        self.pending_events.push(OracleEvent::OracleRequest {
            index,
            flight: flight.clone(),
            requester: caller.clone(),
        });
        Ok(index)
    }

    /// Record `oracle`'s report for the request `(flight, index)`.
    ///
    /// Returns the accepted status when this report completed the quorum.
    pub fn submit_response(
        &mut self,
        oracle: &AccountId,
        index: u8,
        flight: &FlightKey,
        status_code: u8,
        now: Timestamp,
    ) -> Result<Option<FlightStatus>, OracleError> {
        let holder = self
            .registry
            .get(oracle)
            .ok_or_else(|| OracleError::NotRegisteredOracle(oracle.clone()))?;
        if !holder.holds(index) {
            tracing::warn!(%oracle, index, %flight, "response with foreign index rejected");
            return Err(OracleError::IndexMismatch {
                oracle: oracle.clone(),
                index,
            });
        }
        let status = FlightStatus::from_code(status_code)
            .filter(FlightStatus::is_resolved)
            .ok_or(OracleError::InvalidStatus(status_code))?;
        if self.resolved.contains_key(flight) {
            return Err(OracleError::AlreadyResolved(flight.clone()));
        }

        let request = self
            .requests
            .get_mut(&(flight.clone(), index))
            .ok_or_else(|| OracleError::NoSuchRequest {
                flight: flight.clone(),
                index,
            })?;
        if request.responses.has_responded(oracle) {
            return Err(OracleError::DuplicateResponse {
                oracle: oracle.clone(),
                flight: flight.clone(),
                index,
            });
        }

        let count = request.responses.record(oracle.clone(), status);
        tracing::debug!(%oracle, %flight, index, %status, count, "oracle response recorded");
        self.pending_events.push(OracleEvent::OracleReport {
            flight: flight.clone(),
            status,
            index,
            oracle: oracle.clone(),
            count,
        });

        if count < self.params.oracle_quorum as usize {
            return Ok(None);
        }

        let reporters = request.responses.reporters(status);
        self.resolved.insert(
            flight.clone(),
            Resolution {
                status,
                index,
                resolved_at: now,
                reporters,
            },
        );
        self.requests.retain(|(key, _), _| key != flight);

        tracing::info!(%flight, %status, index, "flight status resolved");
        self.pending_events.push(OracleEvent::FlightStatusInfo {
            flight: flight.clone(),
            status,
            index,
        });
        Ok(Some(status))
    }

    /// Close requests older than the configured timeout. Returns how many
    /// were closed; always zero when no timeout is configured.
    pub fn expire_requests(&mut self, now: Timestamp) -> usize {
        let Some(timeout) = self.params.status_request_timeout_secs else {
            return 0;
        };
        let expired: Vec<(FlightKey, u8)> = self
            .requests
            .iter()
            .filter(|(_, req)| req.opened_at.has_expired(timeout, now))
            .map(|(key, _)| key.clone())
            .collect();

        for (flight, index) in &expired {
            self.requests.remove(&(flight.clone(), *index));
            tracing::warn!(%flight, index, timeout, "status request expired");
            self.pending_events.push(OracleEvent::RequestExpired {
                flight: flight.clone(),
                index: *index,
            });
        }
        expired.len()
    }

    /// Final status of `flight`, `Unknown` while unresolved.
    pub fn status_of(&self, flight: &FlightKey) -> FlightStatus {
        self.resolved
            .get(flight)
            .map_or(FlightStatus::Unknown, |r| r.status)
    }

    pub fn resolution(&self, flight: &FlightKey) -> Option<&Resolution> {
        self.resolved.get(flight)
    }

    pub fn request(&self, flight: &FlightKey, index: u8) -> Option<&StatusRequest> {
        self.requests.get(&(flight.clone(), index))
    }

    pub fn open_requests(&self) -> impl Iterator<Item = &StatusRequest> {
        self.requests.values()
    }

    pub fn registry(&self) -> &OracleRegistry {
        &self.registry
    }

    pub fn oracle_count(&self) -> usize {
        self.registry.len()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn snapshot(&self) -> OracleSnapshot {
        OracleSnapshot {
            oracles: self.registry.iter().cloned().collect(),
            requests: self.requests.values().cloned().collect(),
            resolved: self
                .resolved
                .iter()
                .map(|(k, r)| (k.clone(), r.clone()))
                .collect(),
            nonce: self.nonce,
        }
    }

    pub fn restore(snapshot: OracleSnapshot, params: ProtocolParams) -> Self {
        Self {
            params,
            registry: snapshot.oracles.into_iter().collect(),
            requests: snapshot
                .requests
                .into_iter()
                .map(|r| ((r.flight.clone(), r.index), r))
                .collect(),
            resolved: snapshot.resolved.into_iter().collect(),
            nonce: snapshot.nonce,
            pending_events: Vec::new(),
        }
    }

    /// `caller ‖ now ‖ nonce`. The nonce moves on once the draw is used.
    fn draw_context(&self, caller: &AccountId, now: Timestamp) -> Vec<u8> {
        let id = caller.as_str().as_bytes();
        let mut context = Vec::with_capacity(id.len() + 24);
        context.extend_from_slice(&(id.len() as u64).to_be_bytes());
        context.extend_from_slice(id);
        context.extend_from_slice(&now.as_secs().to_be_bytes());
        context.extend_from_slice(&self.nonce.to_be_bytes());
        context
    }
}

/// A caller that passed every registration check, with its drawn indexes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleAdmission {
    oracle: Oracle,
}

impl OracleAdmission {
    pub fn indexes(&self) -> &[u8] {
        &self.oracle.indexes
    }
}

/// Serializable engine state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSnapshot {
    pub oracles: Vec<Oracle>,
    pub requests: Vec<StatusRequest>,
    pub resolved: Vec<(FlightKey, Resolution)>,
    pub nonce: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_nullables::NullRandom;
    use surety_vrf::SeededVrf;

    const LATE_AIRLINE: u8 = 20;
    const ON_TIME: u8 = 10;

    fn test_addr(s: &str) -> AccountId {
        AccountId::new(format!("oracle_{s}"))
    }

    fn flight() -> FlightKey {
        FlightKey::new(AccountId::new("airline_a"), "ND1309", Timestamp::new(1_700_000_000))
    }

    fn now() -> Timestamp {
        Timestamp::new(1_700_000_100)
    }

    /// Engine pre-loaded with oracles holding the given indexes.
    fn engine_with(oracles: &[(&str, [u8; 3])]) -> ConsensusEngine {
        let snapshot = OracleSnapshot {
            oracles: oracles
                .iter()
                .map(|(id, idx)| Oracle {
                    id: test_addr(id),
                    indexes: idx.to_vec(),
                    registered_at: Timestamp::EPOCH,
                })
                .collect(),
            ..Default::default()
        };
        ConsensusEngine::restore(snapshot, ProtocolParams::surety_defaults())
    }

    /// Open a request at exactly `index`.
    fn open_at(engine: &mut ConsensusEngine, index: u8) {
        let vrf = NullRandom::constant([index; 32]);
        let opened = engine
            .fetch_flight_status(&vrf, &AccountId::new("passenger"), &flight(), now())
            .unwrap();
        assert_eq!(opened, index);
    }

    #[test]
    fn registration_requires_fee() {
        let mut engine = ConsensusEngine::new(ProtocolParams::surety_defaults());
        let vrf = SeededVrf::new([1u8; 32]);
        let err = engine
            .register_oracle(&vrf, &test_addr("1"), Amount::new(999_999), now())
            .unwrap_err();
        assert!(matches!(err, OracleError::InsufficientFee { .. }));
        assert_eq!(engine.oracle_count(), 0);
    }

    #[test]
    fn registration_assigns_distinct_indexes_once() {
        let mut engine = ConsensusEngine::new(ProtocolParams::surety_defaults());
        let vrf = NullRandom::constant([47u8; 32]);
        let indexes = engine
            .register_oracle(&vrf, &test_addr("1"), Amount::units(1), now())
            .unwrap();
        assert_eq!(indexes.len(), 3);
        assert_eq!(indexes[0], 7);
        assert!(indexes.iter().all(|&i| i < 10));
        assert_ne!(indexes[0], indexes[1]);
        assert_ne!(indexes[1], indexes[2]);
        assert_ne!(indexes[0], indexes[2]);

        let err = engine
            .register_oracle(&vrf, &test_addr("1"), Amount::units(1), now())
            .unwrap_err();
        assert!(matches!(err, OracleError::OracleAlreadyRegistered(_)));
        assert_eq!(engine.indexes_of(&test_addr("1")).unwrap(), indexes.as_slice());
    }

    #[test]
    fn unknown_caller_has_no_indexes() {
        let engine = ConsensusEngine::new(ProtocolParams::surety_defaults());
        assert!(matches!(
            engine.indexes_of(&test_addr("x")),
            Err(OracleError::NotRegisteredOracle(_))
        ));
    }

    #[test]
    fn prepared_oracle_is_not_registered_until_admitted() {
        let mut engine = ConsensusEngine::new(ProtocolParams::surety_defaults());
        let vrf = NullRandom::constant([23u8; 32]);
        let admission = engine
            .prepare_oracle(&vrf, &test_addr("1"), Amount::units(1), now())
            .unwrap();
        assert_eq!(admission.indexes()[0], 3);
        assert_eq!(engine.oracle_count(), 0);
        assert_eq!(engine.snapshot().nonce, 0);
        assert!(engine.drain_events().is_empty());

        let indexes = engine.admit_oracle(admission.clone()).unwrap();
        assert_eq!(indexes, admission.indexes());
        assert_eq!(engine.snapshot().nonce, 1);
        assert!(matches!(
            engine.admit_oracle(admission),
            Err(OracleError::OracleAlreadyRegistered(_))
        ));
    }

    #[test]
    fn nonce_advances_per_draw() {
        let mut engine = ConsensusEngine::new(ProtocolParams::surety_defaults());
        let vrf = SeededVrf::new([5u8; 32]);
        engine
            .register_oracle(&vrf, &test_addr("1"), Amount::units(1), now())
            .unwrap();
        engine
            .fetch_flight_status(&vrf, &test_addr("1"), &flight(), now())
            .unwrap();
        assert_eq!(engine.snapshot().nonce, 2);
    }

    #[test]
    fn three_matching_responses_resolve() {
        let mut engine = engine_with(&[("1", [1, 2, 3]), ("2", [1, 4, 5]), ("3", [6, 7, 1])]);
        open_at(&mut engine, 1);

        assert_eq!(
            engine
                .submit_response(&test_addr("1"), 1, &flight(), LATE_AIRLINE, now())
                .unwrap(),
            None
        );
        assert_eq!(
            engine
                .submit_response(&test_addr("2"), 1, &flight(), LATE_AIRLINE, now())
                .unwrap(),
            None
        );
        assert_eq!(engine.status_of(&flight()), FlightStatus::Unknown);
        let resolved = engine
            .submit_response(&test_addr("3"), 1, &flight(), LATE_AIRLINE, now())
            .unwrap();
        assert_eq!(resolved, Some(FlightStatus::LateAirline));
        assert_eq!(engine.status_of(&flight()), FlightStatus::LateAirline);
        assert_eq!(engine.resolution(&flight()).unwrap().reporters.len(), 3);
        assert_eq!(engine.open_requests().count(), 0);

        let events = engine.drain_events();
        assert!(matches!(events[0], OracleEvent::OracleRequest { index: 1, .. }));
        assert!(matches!(
            events.last(),
            Some(OracleEvent::FlightStatusInfo {
                status: FlightStatus::LateAirline,
                index: 1,
                ..
            })
        ));
    }

    #[test]
    fn foreign_index_rejected_and_tally_unchanged() {
        let mut engine = engine_with(&[("1", [1, 2, 3]), ("2", [4, 5, 6])]);
        open_at(&mut engine, 4);
        let err = engine
            .submit_response(&test_addr("1"), 4, &flight(), LATE_AIRLINE, now())
            .unwrap_err();
        assert!(matches!(err, OracleError::IndexMismatch { index: 4, .. }));
        assert_eq!(engine.request(&flight(), 4).unwrap().responses.total(), 0);
    }

    #[test]
    fn held_index_without_open_request_rejected() {
        let mut engine = engine_with(&[("1", [1, 2, 3])]);
        open_at(&mut engine, 1);
        let err = engine
            .submit_response(&test_addr("1"), 2, &flight(), LATE_AIRLINE, now())
            .unwrap_err();
        assert!(matches!(err, OracleError::NoSuchRequest { index: 2, .. }));
    }

    #[test]
    fn unknown_and_invalid_codes_rejected() {
        let mut engine = engine_with(&[("1", [1, 2, 3])]);
        open_at(&mut engine, 1);
        for code in [0u8, 7, 60] {
            let err = engine
                .submit_response(&test_addr("1"), 1, &flight(), code, now())
                .unwrap_err();
            assert!(matches!(err, OracleError::InvalidStatus(c) if c == code));
        }
    }

    #[test]
    fn unregistered_oracle_rejected() {
        let mut engine = engine_with(&[("1", [1, 2, 3])]);
        open_at(&mut engine, 1);
        let err = engine
            .submit_response(&test_addr("9"), 1, &flight(), LATE_AIRLINE, now())
            .unwrap_err();
        assert!(matches!(err, OracleError::NotRegisteredOracle(_)));
    }

    #[test]
    fn same_oracle_counts_once() {
        let mut engine = engine_with(&[("1", [1, 2, 3]), ("2", [1, 5, 6])]);
        open_at(&mut engine, 1);
        engine
            .submit_response(&test_addr("1"), 1, &flight(), LATE_AIRLINE, now())
            .unwrap();
        let err = engine
            .submit_response(&test_addr("1"), 1, &flight(), ON_TIME, now())
            .unwrap_err();
        assert!(matches!(err, OracleError::DuplicateResponse { .. }));
        let tally = &engine.request(&flight(), 1).unwrap().responses;
        assert_eq!(tally.count(FlightStatus::LateAirline), 1);
        assert_eq!(tally.count(FlightStatus::OnTime), 0);
    }

    #[test]
    fn split_reports_do_not_resolve() {
        let mut engine = engine_with(&[
            ("1", [1, 2, 3]),
            ("2", [1, 4, 5]),
            ("3", [1, 6, 7]),
            ("4", [1, 8, 9]),
        ]);
        open_at(&mut engine, 1);
        for (id, code) in [("1", LATE_AIRLINE), ("2", ON_TIME), ("3", LATE_AIRLINE), ("4", ON_TIME)] {
            assert_eq!(
                engine
                    .submit_response(&test_addr(id), 1, &flight(), code, now())
                    .unwrap(),
                None
            );
        }
        assert_eq!(engine.status_of(&flight()), FlightStatus::Unknown);
    }

    #[test]
    fn first_resolution_wins_across_requests() {
        let mut engine = engine_with(&[
            ("1", [1, 2, 3]),
            ("2", [1, 2, 4]),
            ("3", [1, 2, 5]),
        ]);
        open_at(&mut engine, 1);
        open_at(&mut engine, 2);
        assert_eq!(engine.open_requests().count(), 2);

        for id in ["1", "2"] {
            engine
                .submit_response(&test_addr(id), 2, &flight(), ON_TIME, now())
                .unwrap();
        }
        for id in ["1", "2", "3"] {
            engine
                .submit_response(&test_addr(id), 1, &flight(), LATE_AIRLINE, now())
                .unwrap();
        }
        assert_eq!(engine.status_of(&flight()), FlightStatus::LateAirline);
        assert_eq!(engine.open_requests().count(), 0);

        let err = engine
            .submit_response(&test_addr("3"), 2, &flight(), ON_TIME, now())
            .unwrap_err();
        assert!(matches!(err, OracleError::AlreadyResolved(_)));
        assert_eq!(engine.status_of(&flight()), FlightStatus::LateAirline);
    }

    #[test]
    fn reopening_same_index_keeps_tally() {
        let mut engine = engine_with(&[("1", [1, 2, 3])]);
        open_at(&mut engine, 1);
        engine
            .submit_response(&test_addr("1"), 1, &flight(), LATE_AIRLINE, now())
            .unwrap();
        open_at(&mut engine, 1);
        assert_eq!(engine.request(&flight(), 1).unwrap().responses.total(), 1);
    }

    #[test]
    fn resolved_flight_cannot_be_fetched() {
        let mut engine = engine_with(&[("1", [1, 2, 3]), ("2", [1, 4, 5]), ("3", [1, 6, 7])]);
        open_at(&mut engine, 1);
        for id in ["1", "2", "3"] {
            engine
                .submit_response(&test_addr(id), 1, &flight(), ON_TIME, now())
                .unwrap();
        }
        let vrf = NullRandom::constant([1u8; 32]);
        let err = engine
            .fetch_flight_status(&vrf, &AccountId::new("passenger"), &flight(), now())
            .unwrap_err();
        assert!(matches!(err, OracleError::AlreadyResolved(_)));
    }

    #[test]
    fn requests_stay_open_without_timeout() {
        let mut engine = engine_with(&[("1", [1, 2, 3])]);
        open_at(&mut engine, 1);
        assert_eq!(engine.expire_requests(Timestamp::new(u64::MAX)), 0);
        assert_eq!(engine.open_requests().count(), 1);
    }

    #[test]
    fn timeout_closes_stale_requests() {
        let params = ProtocolParams {
            status_request_timeout_secs: Some(3_600),
            ..ProtocolParams::surety_defaults()
        };
        let mut engine = ConsensusEngine::restore(
            OracleSnapshot {
                oracles: vec![Oracle {
                    id: test_addr("1"),
                    indexes: vec![1, 2, 3],
                    registered_at: Timestamp::EPOCH,
                }],
                ..Default::default()
            },
            params,
        );
        open_at(&mut engine, 1);
        engine.drain_events();

        assert_eq!(engine.expire_requests(Timestamp::new(now().as_secs() + 3_599)), 0);
        assert_eq!(engine.expire_requests(Timestamp::new(now().as_secs() + 3_600)), 1);
        assert!(engine.request(&flight(), 1).is_none());
        assert_eq!(
            engine.drain_events(),
            vec![OracleEvent::RequestExpired {
                flight: flight(),
                index: 1
            }]
        );

        let err = engine
            .submit_response(&test_addr("1"), 1, &flight(), ON_TIME, now())
            .unwrap_err();
        assert!(matches!(err, OracleError::NoSuchRequest { .. }));
    }

    #[test]
    fn snapshot_round_trip_keeps_open_tallies() {
        let mut engine = engine_with(&[("1", [1, 2, 3]), ("2", [1, 4, 5]), ("3", [1, 6, 7])]);
        open_at(&mut engine, 1);
        engine
            .submit_response(&test_addr("1"), 1, &flight(), LATE_AIRLINE, now())
            .unwrap();

        let mut restored =
            ConsensusEngine::restore(engine.snapshot(), ProtocolParams::surety_defaults());
        assert_eq!(restored.oracle_count(), 3);
        restored
            .submit_response(&test_addr("2"), 1, &flight(), LATE_AIRLINE, now())
            .unwrap();
        let status = restored
            .submit_response(&test_addr("3"), 1, &flight(), LATE_AIRLINE, now())
            .unwrap();
        assert_eq!(status, Some(FlightStatus::LateAirline));
    }
}
