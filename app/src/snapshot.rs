//! Serializable engine state and its JSON summary.

use serde::{Deserialize, Serialize};
use surety_governance::{AirlineRegistry, RegistrySnapshot};
use surety_insurance::InsuranceSnapshot;
use surety_oracle::OracleSnapshot;
use surety_types::{AccountId, Amount, FlightKey, FlightStatus, ProtocolParams, Timestamp};

use crate::{AppConfig, AppError};

/// Bumped whenever the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete engine state apart from balances, which live in the ledger store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub version: u32,
    pub owner: AccountId,
    pub operational: bool,
    pub params: ProtocolParams,
    pub airlines: RegistrySnapshot,
    pub oracles: OracleSnapshot,
    pub insurance: InsuranceSnapshot,
}

impl AppSnapshot {
    /// Genesis state: the seed airline registered (unfunded), no oracles or
    /// flights, engine operational.
    pub fn genesis(config: &AppConfig, now: Timestamp) -> Result<Self, AppError> {
        config.validate()?;
        let airlines = AirlineRegistry::genesis(
            config.genesis_airline.clone(),
            config.genesis_airline_name.clone(),
            config.params.clone(),
            now,
        );
        Ok(Self {
            version: SNAPSHOT_VERSION,
            owner: config.owner.clone(),
            operational: true,
            params: config.params.clone(),
            airlines: airlines.snapshot(),
            oracles: OracleSnapshot::default(),
            insurance: InsuranceSnapshot::default(),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, AppError> {
        bincode::serialize(self).map_err(|e| AppError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| AppError::Snapshot(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(AppError::Snapshot(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }

    /// Operator-facing view of the state.
    pub fn summary(&self) -> SnapshotSummary {
        use surety_governance::AirlineState;

        let mut airlines = Vec::new();
        let mut pending = Vec::new();
        for (_, state) in &self.airlines.airlines {
            match state {
                AirlineState::Registered(a) => airlines.push(AirlineSummary {
                    id: a.id.clone(),
                    name: a.name.clone(),
                    funded: a.is_funded,
                    funded_amount: a.funded_amount.to_string(),
                }),
                AirlineState::Pending(p) => pending.push(PendingSummary {
                    candidate: p.candidate.clone(),
                    sponsor: p.sponsor.clone(),
                    votes: p.votes(),
                }),
            }
        }

        let flights = self
            .insurance
            .flights
            .iter()
            .map(|f| FlightSummary {
                key: f.key.clone(),
                status: f.status,
                status_code: f.status.code(),
                premiums: f.premiums.to_string(),
                credited: f.credited.to_string(),
            })
            .collect();

        let outstanding = self
            .insurance
            .credits
            .iter()
            .fold(Amount::ZERO, |acc, (_, a)| acc.saturating_add(*a));

        SnapshotSummary {
            owner: self.owner.clone(),
            operational: self.operational,
            airlines,
            pending,
            flights,
            policies: self.insurance.policies.len(),
            oracles: self.oracles.oracles.len(),
            open_requests: self.oracles.requests.len(),
            outstanding_credit: outstanding.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SnapshotSummary {
    pub owner: AccountId,
    pub operational: bool,
    pub airlines: Vec<AirlineSummary>,
    pub pending: Vec<PendingSummary>,
    pub flights: Vec<FlightSummary>,
    pub policies: usize,
    pub oracles: usize,
    pub open_requests: usize,
    pub outstanding_credit: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AirlineSummary {
    pub id: AccountId,
    pub name: String,
    pub funded: bool,
    pub funded_amount: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PendingSummary {
    pub candidate: AccountId,
    pub sponsor: AccountId,
    pub votes: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct FlightSummary {
    pub key: FlightKey,
    pub status: FlightStatus,
    pub status_code: u8,
    pub premiums: String,
    pub credited: String,
}
