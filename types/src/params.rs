//! Genesis constants.
//!
//! Every value here is fixed when the engine is created. No operation can
//! change them afterwards; only a new genesis (config file) can.

use crate::amount::{Amount, UNIT};
use serde::{Deserialize, Serialize};

/// Raw amounts are kept as `u64` here so the table stays TOML-representable.
const UNIT_RAW: u64 = UNIT as u64;

/// All engine parameters, fixed at genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    // ── Airlines ─────────────────────────────────────────────────────────
    /// Registered-airline count below which new airlines join without a vote.
    pub bootstrap_airlines: u32,

    /// Minimum value (raw) an airline must escrow to become funded.
    pub min_airline_funding: u64,

    // ── Insurance ────────────────────────────────────────────────────────
    /// Maximum premium (raw) a passenger may pay for one policy.
    pub premium_cap: u64,

    /// Payout multiplier in basis points (15_000 = 1.5x the premium).
    pub payout_multiplier_bps: u32,

    // ── Oracles ──────────────────────────────────────────────────────────
    /// Fee (raw) an oracle pays to register.
    pub oracle_registration_fee: u64,

    /// Matching responses needed before a status is accepted.
    pub oracle_quorum: u32,

    /// Indexes are drawn from `0..index_space`.
    pub index_space: u8,

    /// Distinct indexes assigned to each oracle.
    pub indexes_per_oracle: usize,

    /// Seconds after which an unanswered status request is closed.
    /// `None` keeps requests open until quorum.
    pub status_request_timeout_secs: Option<u64>,
}

impl ProtocolParams {
    /// Reference configuration.
    pub fn surety_defaults() -> Self {
        Self {
            bootstrap_airlines: 4,
            min_airline_funding: 10 * UNIT_RAW,

            premium_cap: UNIT_RAW,
            payout_multiplier_bps: 15_000,

            oracle_registration_fee: UNIT_RAW,
            oracle_quorum: 3,
            index_space: 10,
            indexes_per_oracle: 3,
            status_request_timeout_secs: None,
        }
    }

    pub fn min_funding(&self) -> Amount {
        Amount::new(u128::from(self.min_airline_funding))
    }

    pub fn premium_cap(&self) -> Amount {
        Amount::new(u128::from(self.premium_cap))
    }

    pub fn registration_fee(&self) -> Amount {
        Amount::new(u128::from(self.oracle_registration_fee))
    }

    /// Votes needed to admit a candidate when `registered` airlines exist.
    pub fn airline_quorum(registered: u32) -> u32 {
        registered.div_ceil(2)
    }

    /// Reject parameter sets the engines cannot operate under.
    pub fn validate(&self) -> Result<(), String> {
        if self.oracle_quorum == 0 {
            return Err("oracle_quorum must be at least 1".into());
        }
        if self.indexes_per_oracle == 0 {
            return Err("indexes_per_oracle must be at least 1".into());
        }
        if usize::from(self.index_space) < self.indexes_per_oracle {
            return Err(format!(
                "index_space {} cannot hold {} distinct indexes",
                self.index_space, self.indexes_per_oracle
            ));
        }
        if self.payout_multiplier_bps == 0 {
            return Err("payout_multiplier_bps must be non-zero".into());
        }
        if self.status_request_timeout_secs == Some(0) {
            return Err("status_request_timeout_secs must be non-zero when set".into());
        }
        Ok(())
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::surety_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ProtocolParams::default().validate().is_ok());
    }

    #[test]
    fn quorum_rounds_up() {
        assert_eq!(ProtocolParams::airline_quorum(4), 2);
        assert_eq!(ProtocolParams::airline_quorum(5), 3);
        assert_eq!(ProtocolParams::airline_quorum(6), 3);
    }

    #[test]
    fn index_space_must_fit_the_triple() {
        let params = ProtocolParams {
            index_space: 2,
            ..ProtocolParams::default()
        };
        assert!(params.validate().is_err());
    }
}
