//! Airline registry: admission, voting and funding.

use crate::airline::{Admission, Airline, AirlineState, PendingRegistration};
use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use surety_types::{AccountId, Amount, ProtocolParams, Timestamp};

/// Events emitted by the registry for the facade to publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    /// A candidate became a registered (still unfunded) airline.
    AirlineRegistered {
        airline: AccountId,
        name: String,
        votes: u32,
    },
    /// A funded airline proposed a candidate once voting was required.
    AirlineProposed {
        candidate: AccountId,
        sponsor: AccountId,
        needed: u32,
    },
    /// A vote was recorded for a pending candidate.
    AirlineVoted {
        candidate: AccountId,
        voter: AccountId,
        votes: u32,
        needed: u32,
    },
    /// An airline escrowed funds.
    AirlineFunded {
        airline: AccountId,
        amount: Amount,
        total: Amount,
    },
}

pub struct AirlineRegistry {
    params: ProtocolParams,
    airlines: BTreeMap<AccountId, AirlineState>,
    registered: u32,
    pending_events: Vec<GovernanceEvent>,
}

impl AirlineRegistry {
    /// Create a registry whose only member is the (unfunded) seed airline.
    pub fn genesis(
        seed: AccountId,
        name: impl Into<String>,
        params: ProtocolParams,
        now: Timestamp,
    ) -> Self {
        let mut airlines = BTreeMap::new();
        let airline = Airline::new(seed.clone(), name.into(), now);
        tracing::info!(airline = %seed, "genesis airline registered");
        airlines.insert(seed, AirlineState::Registered(airline));
        Self {
            params,
            airlines,
            registered: 1,
            pending_events: Vec::new(),
        }
    }

    /// `sponsor` proposes `candidate`.
    ///
    /// During bootstrap the candidate is admitted at once. Afterwards the
    /// first call opens a pending registration; a call from a different
    /// funded airline for an already-pending candidate counts as its vote.
    pub fn register_airline(
        &mut self,
        sponsor: &AccountId,
        candidate: &AccountId,
        name: &str,
        now: Timestamp,
    ) -> Result<Admission, GovernanceError> {
        self.require_funded(sponsor)?;

        match self.airlines.get(candidate) {
            Some(AirlineState::Registered(_)) => {
                return Err(GovernanceError::AlreadyRegistered(candidate.clone()));
            }
            Some(AirlineState::Pending(pending)) => {
                if &pending.sponsor == sponsor {
                    return Err(GovernanceError::AlreadyPending {
                        candidate: candidate.clone(),
                        sponsor: sponsor.clone(),
                    });
                }
                return self.vote(sponsor, candidate, now);
            }
            None => {}
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(GovernanceError::EmptyName);
        }

        if self.registered < self.params.bootstrap_airlines {
            self.promote(candidate.clone(), name.to_string(), 0, now);
            return Ok(Admission::Registered);
        }

        let needed = self.quorum();
        let pending = PendingRegistration {
            candidate: candidate.clone(),
            name: name.to_string(),
            sponsor: sponsor.clone(),
            voters: BTreeSet::new(),
            proposed_at: now,
        };
        self.airlines
            .insert(candidate.clone(), AirlineState::Pending(pending));
        tracing::info!(%candidate, %sponsor, needed, "airline proposed, voting required");
        self.pending_events.push(GovernanceEvent::AirlineProposed {
            candidate: candidate.clone(),
            sponsor: sponsor.clone(),
            needed,
        });
        Ok(Admission::Pending { votes: 0, needed })
    }

    /// `voter` votes for a pending `candidate`.
    pub fn vote(
        &mut self,
        voter: &AccountId,
        candidate: &AccountId,
        now: Timestamp,
    ) -> Result<Admission, GovernanceError> {
        self.require_funded(voter)?;
        let needed = self.quorum();

        let pending = match self.airlines.get_mut(candidate) {
            Some(AirlineState::Pending(pending)) => pending,
            Some(AirlineState::Registered(_)) => {
                return Err(GovernanceError::AlreadyRegistered(candidate.clone()));
            }
            None => return Err(GovernanceError::NotPending(candidate.clone())),
        };

        if pending.has_voted(voter) {
            tracing::warn!(%candidate, %voter, "duplicate airline vote rejected");
            return Err(GovernanceError::DuplicateVote {
                candidate: candidate.clone(),
                voter: voter.clone(),
            });
        }
        pending.voters.insert(voter.clone());
        let votes = pending.votes();
        let name = pending.name.clone();

        tracing::debug!(%candidate, %voter, votes, needed, "airline vote recorded");
        self.pending_events.push(GovernanceEvent::AirlineVoted {
            candidate: candidate.clone(),
            voter: voter.clone(),
            votes,
            needed,
        });

        if votes >= needed {
            self.promote(candidate.clone(), name, votes, now);
            Ok(Admission::Registered)
        } else {
            Ok(Admission::Pending { votes, needed })
        }
    }

    /// Everything `fund` would reject, without changing state. Returns the
    /// cumulative total the airline would reach.
    pub fn check_fund(&self, airline: &AccountId, amount: Amount) -> Result<Amount, GovernanceError> {
        let minimum = self.params.min_funding();
        let entry = match self.airlines.get(airline) {
            Some(AirlineState::Registered(entry)) => entry,
            _ => return Err(GovernanceError::NotAirline(airline.clone())),
        };
        if amount < minimum {
            tracing::warn!(%airline, %amount, %minimum, "airline funding below minimum");
            return Err(GovernanceError::InsufficientFunds { amount, minimum });
        }
        entry
            .funded_amount
            .checked_add(amount)
            .ok_or_else(|| GovernanceError::Overflow(airline.clone()))
    }

    /// Record `amount` escrowed by `airline`; returns the cumulative total.
    ///
    /// Moving the value itself is the caller's job. Callers that must move it
    /// first run [`AirlineRegistry::check_fund`] before the transfer.
    pub fn fund(&mut self, airline: &AccountId, amount: Amount) -> Result<Amount, GovernanceError> {
        let total = self.check_fund(airline, amount)?;
        if let Some(AirlineState::Registered(entry)) = self.airlines.get_mut(airline) {
            entry.funded_amount = total;
            entry.is_funded = true;
        }

        tracing::info!(%airline, %amount, %total, "airline funded");
        self.pending_events.push(GovernanceEvent::AirlineFunded {
            airline: airline.clone(),
            amount,
            total,
        });
        Ok(total)
    }

    /// Check that the caller could exercise airline rights (sponsor, vote,
    /// register flights).
    pub fn require_funded(&self, airline: &AccountId) -> Result<(), GovernanceError> {
        if self.is_airline_funded(airline) {
            Ok(())
        } else {
            Err(GovernanceError::NotFunded(airline.clone()))
        }
    }

    pub fn is_airline(&self, id: &AccountId) -> bool {
        matches!(self.airlines.get(id), Some(AirlineState::Registered(_)))
    }

    pub fn is_airline_funded(&self, id: &AccountId) -> bool {
        self.airline(id).is_some_and(|a| a.is_funded)
    }

    pub fn airline(&self, id: &AccountId) -> Option<&Airline> {
        match self.airlines.get(id) {
            Some(AirlineState::Registered(airline)) => Some(airline),
            _ => None,
        }
    }

    pub fn pending(&self, id: &AccountId) -> Option<&PendingRegistration> {
        match self.airlines.get(id) {
            Some(AirlineState::Pending(pending)) => Some(pending),
            _ => None,
        }
    }

    /// Votes cast so far for a pending candidate.
    pub fn pending_votes(&self, id: &AccountId) -> Option<u32> {
        self.pending(id).map(PendingRegistration::votes)
    }

    pub fn registered_count(&self) -> u32 {
        self.registered
    }

    /// Votes a pending candidate needs at the current membership size.
    pub fn quorum(&self) -> u32 {
        ProtocolParams::airline_quorum(self.registered)
    }

    pub fn airlines(&self) -> impl Iterator<Item = &Airline> {
        self.airlines.values().filter_map(|state| match state {
            AirlineState::Registered(airline) => Some(airline),
            AirlineState::Pending(_) => None,
        })
    }

    pub fn pending_candidates(&self) -> impl Iterator<Item = &PendingRegistration> {
        self.airlines.values().filter_map(|state| match state {
            AirlineState::Pending(pending) => Some(pending),
            AirlineState::Registered(_) => None,
        })
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            airlines: self
                .airlines
                .iter()
                .map(|(id, state)| (id.clone(), state.clone()))
                .collect(),
        }
    }

    pub fn restore(snapshot: RegistrySnapshot, params: ProtocolParams) -> Self {
        let airlines: BTreeMap<_, _> = snapshot.airlines.into_iter().collect();
        let registered = airlines
            .values()
            .filter(|s| matches!(s, AirlineState::Registered(_)))
            .count() as u32;
        Self {
            params,
            airlines,
            registered,
            pending_events: Vec::new(),
        }
    }

    fn promote(&mut self, id: AccountId, name: String, votes: u32, now: Timestamp) {
        let airline = Airline::new(id.clone(), name.clone(), now);
        self.airlines
            .insert(id.clone(), AirlineState::Registered(airline));
        self.registered += 1;
        tracing::info!(airline = %id, votes, registered = self.registered, "airline registered");
        self.pending_events.push(GovernanceEvent::AirlineRegistered {
            airline: id,
            name,
            votes,
        });
    }
}

/// Serializable registry state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub airlines: Vec<(AccountId, AirlineState)>,
}
