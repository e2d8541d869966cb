use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use surety_types::{AccountId, Amount, Timestamp};

/// A registered consortium member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub id: AccountId,
    pub name: String,
    pub is_funded: bool,
    /// Cumulative value escrowed by this airline.
    pub funded_amount: Amount,
    pub registered_at: Timestamp,
}

impl Airline {
    pub fn new(id: AccountId, name: String, registered_at: Timestamp) -> Self {
        Self {
            id,
            name,
            is_funded: false,
            funded_amount: Amount::ZERO,
            registered_at,
        }
    }
}

/// A candidate waiting for enough votes.
///
/// The sponsor proposed the candidate and cannot vote for it; `voters` holds
/// the other funded airlines that have voted so far.
///
/// The sponsor is not an implicit first vote. A proposal starts at zero, so
/// with five members E proposing F still needs three votes from A, B and C.
/// Counting the sponsor would admit F after two.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub candidate: AccountId,
    pub name: String,
    pub sponsor: AccountId,
    pub voters: BTreeSet<AccountId>,
    pub proposed_at: Timestamp,
}

impl PendingRegistration {
    pub fn votes(&self) -> u32 {
        self.voters.len() as u32
    }

    pub fn has_voted(&self, voter: &AccountId) -> bool {
        &self.sponsor == voter || self.voters.contains(voter)
    }
}

/// Where an identity stands. Identities absent from the registry are
/// unregistered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirlineState {
    Pending(PendingRegistration),
    Registered(Airline),
}

/// Result of a registration or vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The candidate is now a registered airline.
    Registered,
    /// The candidate still needs `needed - votes` more votes.
    Pending { votes: u32, needed: u32 },
}

impl Admission {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }
}
