//! The application facade: the only entry point external callers use.
//!
//! Every mutating operation takes a [`CallContext`] carrying the
//! authenticated caller, the value attached to the call and the substrate
//! time. Operations run to completion one at a time (`&mut self`); a failed
//! operation leaves no observable change.

use std::sync::Arc;

use surety_governance::{Admission, AirlineRegistry};
use surety_insurance::{Flight, InsuranceLedger, InsurancePolicy};
use surety_oracle::{ConsensusEngine, OracleEvent};
use surety_store::{LedgerAccount, LedgerStore, MetaStore};
use surety_types::{AccountId, Amount, FlightKey, FlightStatus, ProtocolParams, Timestamp};
use surety_utils::{StatsCounter, StatsSnapshot};
use surety_vrf::VrfProvider;

use crate::config::AppConfig;
use crate::event::{AppEvent, EventBus};
use crate::snapshot::{AppSnapshot, SNAPSHOT_VERSION};
use crate::AppError;

/// Metadata key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "surety_snapshot";

const STAT_NAMES: &[&str] = &[
    "airline_proposals",
    "airline_votes",
    "airlines_funded",
    "flights_registered",
    "policies_sold",
    "oracles_registered",
    "status_requests",
    "oracle_responses",
    "flights_resolved",
    "credit_claims",
    "withdrawals",
    "requests_expired",
    "status_deliveries_failed",
    "rejected",
];

/// Caller identity, attached value and time of one external call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: AccountId,
    /// Value sent with the call. Only `fund`, `buy_insurance` and
    /// `register_oracle` use it; other operations ignore it.
    pub value: Amount,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: AccountId, now: Timestamp) -> Self {
        Self {
            caller,
            value: Amount::ZERO,
            now,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

pub struct SuretyApp {
    owner: AccountId,
    operational: bool,
    params: ProtocolParams,
    airlines: AirlineRegistry,
    oracles: ConsensusEngine,
    insurance: InsuranceLedger,
    ledger: Arc<dyn LedgerStore + Send + Sync>,
    vrf: Arc<dyn VrfProvider>,
    events: Vec<AppEvent>,
    bus: EventBus,
    stats: StatsCounter,
}

impl SuretyApp {
    /// Fresh engine: the seed airline registered (unfunded), operational.
    pub fn genesis(
        config: &AppConfig,
        ledger: Arc<dyn LedgerStore + Send + Sync>,
        vrf: Arc<dyn VrfProvider>,
        now: Timestamp,
    ) -> Result<Self, AppError> {
        let snapshot = AppSnapshot::genesis(config, now)?;
        tracing::info!(owner = %config.owner, vrf = vrf.name(), "genesis state created");
        Self::from_snapshot(snapshot, ledger, vrf)
    }

    /// Rebuild an engine from a snapshot.
    pub fn from_snapshot(
        snapshot: AppSnapshot,
        ledger: Arc<dyn LedgerStore + Send + Sync>,
        vrf: Arc<dyn VrfProvider>,
    ) -> Result<Self, AppError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(AppError::Snapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        snapshot.params.validate().map_err(AppError::Snapshot)?;
        let params = snapshot.params;
        Ok(Self {
            owner: snapshot.owner,
            operational: snapshot.operational,
            airlines: AirlineRegistry::restore(snapshot.airlines, params.clone()),
            oracles: ConsensusEngine::restore(snapshot.oracles, params.clone()),
            insurance: InsuranceLedger::restore(snapshot.insurance, params.clone()),
            params,
            ledger,
            vrf,
            events: Vec::new(),
            bus: EventBus::new(),
            stats: StatsCounter::new(STAT_NAMES),
        })
    }

    // ── Operating flag ──────────────────────────────────────────────────

    /// Owner-only; allowed while halted so the owner can resume.
    pub fn set_operating_status(
        &mut self,
        ctx: &CallContext,
        operational: bool,
    ) -> Result<(), AppError> {
        if ctx.caller != self.owner {
            return self.reject(Err(AppError::NotOwner(ctx.caller.clone())));
        }
        if self.operational != operational {
            tracing::warn!(operational, by = %ctx.caller, "operating status changed");
        }
        self.operational = operational;
        self.publish(AppEvent::OperatingStatusChanged {
            operational,
            by: ctx.caller.clone(),
        });
        Ok(())
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    // ── Airlines ────────────────────────────────────────────────────────

    /// Propose `candidate` (or vote for it if another airline already did).
    pub fn register_airline(
        &mut self,
        ctx: &CallContext,
        candidate: &AccountId,
        name: &str,
    ) -> Result<Admission, AppError> {
        let result = self.require_operational().and_then(|()| {
            self.airlines
                .register_airline(&ctx.caller, candidate, name, ctx.now)
                .map_err(AppError::from)
        });
        let admission = self.reject(result)?;
        self.stats.increment("airline_proposals");
        self.pump_events();
        Ok(admission)
    }

    pub fn vote(&mut self, ctx: &CallContext, candidate: &AccountId) -> Result<Admission, AppError> {
        let result = self.require_operational().and_then(|()| {
            self.airlines
                .vote(&ctx.caller, candidate, ctx.now)
                .map_err(AppError::from)
        });
        let admission = self.reject(result)?;
        self.stats.increment("airline_votes");
        self.pump_events();
        Ok(admission)
    }

    /// Escrow `ctx.value` for the calling airline. Returns its funded total.
    pub fn fund(&mut self, ctx: &CallContext) -> Result<Amount, AppError> {
        let result = self
            .require_operational()
            .and_then(|()| self.require_balance(ctx))
            .and_then(|()| {
                self.airlines
                    .check_fund(&ctx.caller, ctx.value)
                    .map_err(AppError::from)
            })
            .and_then(|_| self.collect_value(ctx));
        self.reject(result)?;
        let total = self.airlines.fund(&ctx.caller, ctx.value)?;
        self.stats.increment("airlines_funded");
        self.pump_events();
        Ok(total)
    }

    pub fn is_airline(&self, id: &AccountId) -> bool {
        self.airlines.is_airline(id)
    }

    pub fn is_airline_funded(&self, id: &AccountId) -> bool {
        self.airlines.is_airline_funded(id)
    }

    pub fn airlines(&self) -> &AirlineRegistry {
        &self.airlines
    }

    // ── Flights and insurance ───────────────────────────────────────────

    /// Register a flight for the calling (funded) airline.
    pub fn register_flight(
        &mut self,
        ctx: &CallContext,
        code: &str,
        timestamp: Timestamp,
    ) -> Result<FlightKey, AppError> {
        let result = self
            .require_operational()
            .and_then(|()| self.airlines.require_funded(&ctx.caller).map_err(AppError::from))
            .and_then(|()| {
                self.insurance
                    .register_flight(&ctx.caller, code, timestamp, ctx.now)
                    .map_err(AppError::from)
            });
        let key = self.reject(result)?;

        // Oracles may have answered before the airline registered the flight.
        if self.oracles.resolution(&key).is_some() {
            self.deliver_status(&key);
        }
        self.stats.increment("flights_registered");
        self.pump_events();
        Ok(key)
    }

    /// Buy cover on a flight with `ctx.value` as premium. Returns the payout
    /// an airline-caused delay would credit.
    pub fn buy_insurance(
        &mut self,
        ctx: &CallContext,
        airline: &AccountId,
        code: &str,
        timestamp: Timestamp,
    ) -> Result<Amount, AppError> {
        let key = FlightKey::new(airline.clone(), code, timestamp);
        let result = self
            .require_operational()
            .and_then(|()| self.require_balance(ctx))
            .and_then(|()| {
                self.insurance
                    .check_purchase(&ctx.caller, &key, ctx.value)
                    .map_err(AppError::from)
            })
            .and_then(|_| self.collect_value(ctx));
        self.reject(result)?;
        let payout = self
            .insurance
            .buy_insurance(&ctx.caller, &key, ctx.value, ctx.now)?;
        self.stats.increment("policies_sold");
        self.pump_events();
        Ok(payout)
    }

    /// Re-run crediting for a flight. Returns the amount newly credited.
    ///
    /// A resolution the ledger has not seen yet is applied first.
    pub fn claim_credit(
        &mut self,
        ctx: &CallContext,
        airline: &AccountId,
        code: &str,
        timestamp: Timestamp,
    ) -> Result<Amount, AppError> {
        let key = FlightKey::new(airline.clone(), code, timestamp);
        let result = self
            .require_operational()
            .and_then(|()| self.escrow_balance())
            .and_then(|escrow| {
                let synced = self.sync_resolution(&key, escrow)?;
                let claimed = self.insurance.claim_credit(&key, escrow)?;
                Ok(synced.saturating_add(claimed))
            });
        let credited = self.reject(result)?;
        self.stats.increment("credit_claims");
        self.pump_events();
        Ok(credited)
    }

    /// Pay the caller's whole credit out of escrow.
    ///
    /// The credit is zeroed before the transfer runs and restored only if the
    /// transfer fails, so a transfer that re-enters cannot pay twice.
    pub fn withdraw_credits(&mut self, ctx: &CallContext) -> Result<Amount, AppError> {
        let result = self.require_operational().and_then(|()| {
            self.insurance
                .take_credit(&ctx.caller)
                .map_err(AppError::from)
        });
        let amount = self.reject(result)?;

        let to = LedgerAccount::Wallet(ctx.caller.clone());
        if let Err(e) = self.ledger.transfer(&LedgerAccount::Contract, &to, amount) {
            self.insurance.restore_credit(&ctx.caller, amount);
            return self.reject(Err(AppError::Store(e)));
        }

        tracing::info!(passenger = %ctx.caller, %amount, "credit withdrawn");
        self.stats.increment("withdrawals");
        self.pump_events();
        self.publish(AppEvent::CreditWithdrawn {
            passenger: ctx.caller.clone(),
            amount,
        });
        Ok(amount)
    }

    pub fn credit_of(&self, passenger: &AccountId) -> Amount {
        self.insurance.credit_of(passenger)
    }

    pub fn flight(&self, key: &FlightKey) -> Option<&Flight> {
        self.insurance.flight(key)
    }

    pub fn policy(&self, passenger: &AccountId, key: &FlightKey) -> Option<&InsurancePolicy> {
        self.insurance.policy(passenger, key)
    }

    /// Final status of a flight as decided by oracle consensus.
    pub fn flight_status(&self, key: &FlightKey) -> FlightStatus {
        self.oracles.status_of(key)
    }

    // ── Oracles ─────────────────────────────────────────────────────────

    /// Register the caller as an oracle, paying `ctx.value` as fee.
    pub fn register_oracle(&mut self, ctx: &CallContext) -> Result<Vec<u8>, AppError> {
        let result = self
            .require_operational()
            .and_then(|()| self.require_balance(ctx))
            .and_then(|()| {
                self.oracles
                    .prepare_oracle(self.vrf.as_ref(), &ctx.caller, ctx.value, ctx.now)
                    .map_err(AppError::from)
            })
            .and_then(|admission| self.collect_value(ctx).map(|()| admission));
        let admission = self.reject(result)?;
        let indexes = self.oracles.admit_oracle(admission)?;
        self.stats.increment("oracles_registered");
        self.pump_events();
        Ok(indexes)
    }

    pub fn get_my_indexes(&self, caller: &AccountId) -> Result<Vec<u8>, AppError> {
        Ok(self.oracles.indexes_of(caller)?.to_vec())
    }

    /// Ask oracles for a flight's status. Returns the index opened.
    pub fn fetch_flight_status(
        &mut self,
        ctx: &CallContext,
        airline: &AccountId,
        code: &str,
        timestamp: Timestamp,
    ) -> Result<u8, AppError> {
        let key = FlightKey::new(airline.clone(), code, timestamp);
        let result = self.require_operational().and_then(|()| {
            self.oracles
                .fetch_flight_status(self.vrf.as_ref(), &ctx.caller, &key, ctx.now)
                .map_err(AppError::from)
        });
        let index = self.reject(result)?;
        self.stats.increment("status_requests");
        self.pump_events();
        Ok(index)
    }

    /// Report a flight status as the calling oracle. Returns the final status
    /// when this report completed the quorum.
    ///
    /// The resolution stands even if delivering it to the insurance ledger
    /// fails; `claim_credit` picks it up later.
    pub fn submit_oracle_response(
        &mut self,
        ctx: &CallContext,
        index: u8,
        airline: &AccountId,
        code: &str,
        timestamp: Timestamp,
        status_code: u8,
    ) -> Result<Option<FlightStatus>, AppError> {
        let key = FlightKey::new(airline.clone(), code, timestamp);
        let result = self.require_operational().and_then(|()| {
            self.oracles
                .submit_response(&ctx.caller, index, &key, status_code, ctx.now)
                .map_err(AppError::from)
        });
        let resolved = self.reject(result)?;
        self.stats.increment("oracle_responses");
        self.pump_events();
        Ok(resolved)
    }

    /// Close status requests older than the configured timeout.
    pub fn expire_requests(&mut self, ctx: &CallContext) -> Result<usize, AppError> {
        self.reject(self.require_operational())?;
        let expired = self.oracles.expire_requests(ctx.now);
        self.stats.add("requests_expired", expired as u64);
        self.pump_events();
        Ok(expired)
    }

    pub fn oracles(&self) -> &ConsensusEngine {
        &self.oracles
    }

    // ── Balances, events, persistence ───────────────────────────────────

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn wallet_balance(&self, id: &AccountId) -> Result<Amount, AppError> {
        Ok(self.ledger.balance(&LedgerAccount::Wallet(id.clone()))?)
    }

    pub fn escrow_balance(&self) -> Result<Amount, AppError> {
        Ok(self.ledger.balance(&LedgerAccount::Contract)?)
    }

    /// Drain the event log.
    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register a listener invoked for every event as it is published.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&AppEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            version: SNAPSHOT_VERSION,
            owner: self.owner.clone(),
            operational: self.operational,
            params: self.params.clone(),
            airlines: self.airlines.snapshot(),
            oracles: self.oracles.snapshot(),
            insurance: self.insurance.snapshot(),
        }
    }

    /// Persist the engine state to a metadata store.
    pub fn save_to_store(&self, store: &dyn MetaStore) -> Result<(), AppError> {
        let bytes = self.snapshot().to_bytes()?;
        store.put_meta(SNAPSHOT_KEY, &bytes)?;
        tracing::debug!(bytes = bytes.len(), "snapshot saved");
        Ok(())
    }

    /// Restore engine state from a metadata store.
    pub fn load_from_store(
        store: &dyn MetaStore,
        ledger: Arc<dyn LedgerStore + Send + Sync>,
        vrf: Arc<dyn VrfProvider>,
    ) -> Result<Self, AppError> {
        let bytes = store
            .get_meta(SNAPSHOT_KEY)?
            .ok_or_else(|| AppError::Snapshot(format!("no snapshot under {SNAPSHOT_KEY}")))?;
        Self::from_snapshot(AppSnapshot::from_bytes(&bytes)?, ledger, vrf)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_operational(&self) -> Result<(), AppError> {
        if self.operational {
            Ok(())
        } else {
            Err(AppError::ContractNotOperational)
        }
    }

    fn require_balance(&self, ctx: &CallContext) -> Result<(), AppError> {
        if ctx.value.is_zero() {
            return Ok(());
        }
        let available = self.wallet_balance(&ctx.caller)?;
        if available < ctx.value {
            return Err(AppError::InsufficientBalance {
                needed: ctx.value,
                available,
            });
        }
        Ok(())
    }

    /// Move the call's value into escrow. Runs after the component check and
    /// before the component applies the call.
    fn collect_value(&self, ctx: &CallContext) -> Result<(), AppError> {
        if ctx.value.is_zero() {
            return Ok(());
        }
        let from = LedgerAccount::Wallet(ctx.caller.clone());
        self.ledger
            .transfer(&from, &LedgerAccount::Contract, ctx.value)
            .map_err(|e| {
                tracing::warn!(caller = %ctx.caller, value = %ctx.value, error = %e, "value transfer failed");
                AppError::from(e)
            })
    }

    /// Count and log a rejected call.
    fn reject<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(e) = &result {
            self.stats.increment("rejected");
            tracing::warn!(kind = %e.kind(), error = %e, "operation rejected");
        }
        result
    }

    fn publish(&mut self, event: AppEvent) {
        self.bus.emit(&event);
        self.events.push(event);
    }

    /// Apply the oracle resolution of `flight` to the insurance ledger if the
    /// ledger has not resolved it yet. Returns the amount credited.
    fn sync_resolution(&mut self, flight: &FlightKey, escrow: Amount) -> Result<Amount, AppError> {
        if self.insurance.status_of(flight).is_resolved() {
            return Ok(Amount::ZERO);
        }
        let Some(status) = self.oracles.resolution(flight).map(|r| r.status) else {
            return Ok(Amount::ZERO);
        };
        Ok(self.insurance.apply_status(flight, status, escrow)?)
    }

    /// Deliver a resolved status to the insurance ledger. A failure is
    /// logged and counted; the ledger catches up on the next `claim_credit`.
    fn deliver_status(&mut self, flight: &FlightKey) {
        let delivered = self
            .escrow_balance()
            .and_then(|escrow| self.sync_resolution(flight, escrow));
        if let Err(e) = delivered {
            self.stats.increment("status_deliveries_failed");
            tracing::error!(%flight, kind = %e.kind(), error = %e, "status delivery failed");
        }
    }

    /// Move component events into the log, routing final flight statuses to
    /// the insurance ledger. Every drained event is published.
    fn pump_events(&mut self) {
        for event in self.airlines.drain_events() {
            self.publish(AppEvent::Governance(event));
        }
        for event in self.oracles.drain_events() {
            if let OracleEvent::FlightStatusInfo { flight, .. } = &event {
                self.stats.increment("flights_resolved");
                self.deliver_status(flight);
            }
            self.publish(AppEvent::Oracle(event));
        }
        for event in self.insurance.drain_events() {
            self.publish(AppEvent::Insurance(event));
        }
    }
}
