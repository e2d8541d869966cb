//! Core insurance ledger: flights, policies and passenger credit.

use crate::error::InsuranceError;
use crate::flight::Flight;
use crate::policy::InsurancePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use surety_types::{AccountId, Amount, FlightKey, FlightStatus, ProtocolParams, Timestamp};

/// Events emitted by the ledger for the facade to publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsuranceEvent {
    FlightRegistered {
        flight: FlightKey,
    },
    InsurancePurchased {
        passenger: AccountId,
        flight: FlightKey,
        premium: Amount,
    },
    /// A final status reached a registered flight.
    FlightStatusApplied {
        flight: FlightKey,
        status: FlightStatus,
    },
    PassengerCredited {
        passenger: AccountId,
        flight: FlightKey,
        amount: Amount,
    },
    /// Escrow could not cover the payout; the policy stays uncredited and is
    /// retried on the next crediting pass.
    CreditDeferred {
        passenger: AccountId,
        flight: FlightKey,
        payout: Amount,
        available: Amount,
    },
}

pub struct InsuranceLedger {
    params: ProtocolParams,
    flights: BTreeMap<FlightKey, Flight>,
    /// Policies per flight, keyed by passenger.
    policies: BTreeMap<FlightKey, BTreeMap<AccountId, InsurancePolicy>>,
    credits: BTreeMap<AccountId, Amount>,
    /// Sum of all credit balances (granted but not yet withdrawn).
    outstanding: Amount,
    pending_events: Vec<InsuranceEvent>,
}

impl InsuranceLedger {
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params,
            flights: BTreeMap::new(),
            policies: BTreeMap::new(),
            credits: BTreeMap::new(),
            outstanding: Amount::ZERO,
            pending_events: Vec::new(),
        }
    }

    /// Register a flight for `airline`. Eligibility of the airline is checked
    /// by the caller.
    pub fn register_flight(
        &mut self,
        airline: &AccountId,
        code: &str,
        timestamp: Timestamp,
        now: Timestamp,
    ) -> Result<FlightKey, InsuranceError> {
        let key = FlightKey::new(airline.clone(), code, timestamp);
        if key.code.is_empty() {
            return Err(InsuranceError::EmptyFlightCode);
        }
        if self.flights.contains_key(&key) {
            return Err(InsuranceError::DuplicateFlight(key));
        }
        self.flights.insert(key.clone(), Flight::new(key.clone(), now));

        tracing::info!(flight = %key, "flight registered");
        self.pending_events
            .push(InsuranceEvent::FlightRegistered { flight: key.clone() });
        Ok(key)
    }

    /// Everything `buy_insurance` would reject, without changing state.
    /// Returns the payout the policy would carry.
    pub fn check_purchase(
        &self,
        passenger: &AccountId,
        flight: &FlightKey,
        premium: Amount,
    ) -> Result<Amount, InsuranceError> {
        let entry = self
            .flights
            .get(flight)
            .ok_or_else(|| InsuranceError::FlightNotFound(flight.clone()))?;
        if entry.is_resolved() {
            return Err(InsuranceError::FlightAlreadyResolved(flight.clone()));
        }
        if premium.is_zero() {
            return Err(InsuranceError::ZeroPremium);
        }
        let cap = self.params.premium_cap();
        if premium > cap {
            tracing::warn!(%passenger, %flight, %premium, %cap, "premium above cap");
            return Err(InsuranceError::PremiumTooHigh { premium, cap });
        }
        if self.policy(passenger, flight).is_some() {
            return Err(InsuranceError::PolicyExists {
                passenger: passenger.clone(),
                flight: flight.clone(),
            });
        }
        entry
            .premiums
            .checked_add(premium)
            .ok_or_else(|| InsuranceError::Overflow(format!("premiums on {flight}")))?;
        premium
            .checked_mul_bps(self.params.payout_multiplier_bps)
            .ok_or_else(|| InsuranceError::Overflow(format!("payout for {premium}")))
    }

    /// Record a policy for `passenger`; returns its payout.
    ///
    /// Moving the premium into escrow is the caller's job. Callers that must
    /// move it first run [`InsuranceLedger::check_purchase`] before the
    /// transfer.
    pub fn buy_insurance(
        &mut self,
        passenger: &AccountId,
        flight: &FlightKey,
        premium: Amount,
        now: Timestamp,
    ) -> Result<Amount, InsuranceError> {
        let payout = self.check_purchase(passenger, flight, premium)?;
        if let Some(entry) = self.flights.get_mut(flight) {
            entry.premiums = entry.premiums.saturating_add(premium);
        }
        let covers = self.policies.entry(flight.clone()).or_default();
        covers.insert(
            passenger.clone(),
            InsurancePolicy {
                passenger: passenger.clone(),
                flight: flight.clone(),
                premium,
                payout,
                credited: false,
                purchased_at: now,
            },
        );

        tracing::info!(%passenger, %flight, %premium, %payout, "insurance purchased");
        self.pending_events.push(InsuranceEvent::InsurancePurchased {
            passenger: passenger.clone(),
            flight: flight.clone(),
            premium,
        });
        Ok(payout)
    }

    /// Deliver a final status to a flight and, for an airline-caused delay,
    /// run the crediting pass. Returns the amount newly credited.
    ///
    /// Unregistered flights are ignored. A flight keeps the first status it
    /// receives.
    pub fn apply_status(
        &mut self,
        flight: &FlightKey,
        status: FlightStatus,
        escrow: Amount,
    ) -> Result<Amount, InsuranceError> {
        let Some(entry) = self.flights.get_mut(flight) else {
            tracing::debug!(%flight, %status, "status for unregistered flight ignored");
            return Ok(Amount::ZERO);
        };
        if !status.is_resolved() {
            return Ok(Amount::ZERO);
        }
        if entry.is_resolved() {
            if entry.status != status {
                tracing::warn!(%flight, current = %entry.status, ignored = %status, "conflicting status ignored");
            }
        } else {
            entry.status = status;
            tracing::info!(%flight, %status, "flight status applied");
            self.pending_events.push(InsuranceEvent::FlightStatusApplied {
                flight: flight.clone(),
                status,
            });
        }

        if self.status_of(flight).pays_out() {
            self.credit_flight(flight, escrow)
        } else {
            Ok(Amount::ZERO)
        }
    }

    /// Re-run the crediting pass for `flight`. Returns zero when the flight
    /// does not pay out or every policy is already credited.
    pub fn claim_credit(
        &mut self,
        flight: &FlightKey,
        escrow: Amount,
    ) -> Result<Amount, InsuranceError> {
        let entry = self
            .flights
            .get(flight)
            .ok_or_else(|| InsuranceError::FlightNotFound(flight.clone()))?;
        if !entry.status.pays_out() {
            return Ok(Amount::ZERO);
        }
        self.credit_flight(flight, escrow)
    }

    /// Credit every uncredited policy on `flight`.
    ///
    /// `escrow` is the contract's current balance. Credits granted by this
    /// pass never exceed `escrow` minus credit already outstanding.
    fn credit_flight(&mut self, flight: &FlightKey, escrow: Amount) -> Result<Amount, InsuranceError> {
        let mut available = escrow.saturating_sub(self.outstanding);
        let mut total = Amount::ZERO;

        let (Some(entry), Some(covers)) =
            (self.flights.get_mut(flight), self.policies.get_mut(flight))
        else {
            return Ok(total);
        };

        for policy in covers.values_mut().filter(|p| !p.credited) {
            if policy.payout > available {
                tracing::warn!(
                    passenger = %policy.passenger,
                    %flight,
                    payout = %policy.payout,
                    %available,
                    "escrow short, credit deferred"
                );
                self.pending_events.push(InsuranceEvent::CreditDeferred {
                    passenger: policy.passenger.clone(),
                    flight: flight.clone(),
                    payout: policy.payout,
                    available,
                });
                continue;
            }

            let balance = self.credits.entry(policy.passenger.clone()).or_default();
            *balance = balance
                .checked_add(policy.payout)
                .ok_or_else(|| InsuranceError::Overflow(format!("credit of {}", policy.passenger)))?;
            available = available.saturating_sub(policy.payout);
            self.outstanding = self.outstanding.saturating_add(policy.payout);
            entry.credited = entry.credited.saturating_add(policy.payout);
            total = total.saturating_add(policy.payout);
            policy.credited = true;

            tracing::info!(passenger = %policy.passenger, %flight, amount = %policy.payout, "passenger credited");
            self.pending_events.push(InsuranceEvent::PassengerCredited {
                passenger: policy.passenger.clone(),
                flight: flight.clone(),
                amount: policy.payout,
            });
        }
        Ok(total)
    }

    /// Zero `passenger`'s credit and return what it held.
    ///
    /// The caller performs the transfer afterwards and hands the amount back
    /// through [`InsuranceLedger::restore_credit`] if the transfer fails.
    pub fn take_credit(&mut self, passenger: &AccountId) -> Result<Amount, InsuranceError> {
        let amount = self
            .credits
            .remove(passenger)
            .filter(|a| !a.is_zero())
            .ok_or_else(|| InsuranceError::NoCredit(passenger.clone()))?;
        self.outstanding = self.outstanding.saturating_sub(amount);
        Ok(amount)
    }

    /// Put back credit taken by a withdrawal whose transfer failed.
    pub fn restore_credit(&mut self, passenger: &AccountId, amount: Amount) {
        let balance = self.credits.entry(passenger.clone()).or_default();
        *balance = balance.saturating_add(amount);
        self.outstanding = self.outstanding.saturating_add(amount);
        tracing::warn!(%passenger, %amount, "withdrawal reverted, credit restored");
    }

    pub fn credit_of(&self, passenger: &AccountId) -> Amount {
        self.credits.get(passenger).copied().unwrap_or(Amount::ZERO)
    }

    pub fn outstanding_credit(&self) -> Amount {
        self.outstanding
    }

    pub fn flight(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    pub fn status_of(&self, key: &FlightKey) -> FlightStatus {
        self.flights
            .get(key)
            .map_or(FlightStatus::Unknown, |f| f.status)
    }

    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.flights.values()
    }

    pub fn policy(&self, passenger: &AccountId, flight: &FlightKey) -> Option<&InsurancePolicy> {
        self.policies.get(flight).and_then(|c| c.get(passenger))
    }

    pub fn policies_for(&self, flight: &FlightKey) -> impl Iterator<Item = &InsurancePolicy> {
        self.policies.get(flight).into_iter().flat_map(|c| c.values())
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<InsuranceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn snapshot(&self) -> InsuranceSnapshot {
        InsuranceSnapshot {
            flights: self.flights.values().cloned().collect(),
            policies: self
                .policies
                .values()
                .flat_map(|c| c.values().cloned())
                .collect(),
            credits: self
                .credits
                .iter()
                .map(|(id, a)| (id.clone(), *a))
                .collect(),
        }
    }

    pub fn restore(snapshot: InsuranceSnapshot, params: ProtocolParams) -> Self {
        let mut policies: BTreeMap<FlightKey, BTreeMap<AccountId, InsurancePolicy>> =
            BTreeMap::new();
        for policy in snapshot.policies {
            policies
                .entry(policy.flight.clone())
                .or_default()
                .insert(policy.passenger.clone(), policy);
        }
        let credits: BTreeMap<_, _> = snapshot.credits.into_iter().collect();
        let outstanding = credits
            .values()
            .fold(Amount::ZERO, |acc, a| acc.saturating_add(*a));
        Self {
            params,
            flights: snapshot
                .flights
                .into_iter()
                .map(|f| (f.key.clone(), f))
                .collect(),
            policies,
            credits,
            outstanding,
            pending_events: Vec::new(),
        }
    }
}

/// Serializable ledger state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceSnapshot {
    pub flights: Vec<Flight>,
    pub policies: Vec<InsurancePolicy>,
    pub credits: Vec<(AccountId, Amount)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_types::UNIT;

    fn test_addr(s: &str) -> AccountId {
        AccountId::new(format!("passenger_{s}"))
    }

    fn airline() -> AccountId {
        AccountId::new("airline_a")
    }

    fn now() -> Timestamp {
        Timestamp::new(1_700_000_000)
    }

    fn ledger_with_flight() -> (InsuranceLedger, FlightKey) {
        let mut ledger = InsuranceLedger::new(ProtocolParams::surety_defaults());
        let key = ledger
            .register_flight(&airline(), "ND1309", Timestamp::new(1_700_086_400), now())
            .unwrap();
        (ledger, key)
    }

    /// Plenty of escrow for any test.
    fn escrow() -> Amount {
        Amount::units(1_000)
    }

    #[test]
    fn duplicate_flight_rejected() {
        let (mut ledger, key) = ledger_with_flight();
        let err = ledger
            .register_flight(&airline(), "ND1309", key.timestamp, now())
            .unwrap_err();
        assert_eq!(err, InsuranceError::DuplicateFlight(key));
        // same code at another time is a different flight
        assert!(ledger
            .register_flight(&airline(), "ND1309", Timestamp::new(1), now())
            .is_ok());
    }

    #[test]
    fn empty_code_rejected() {
        let mut ledger = InsuranceLedger::new(ProtocolParams::surety_defaults());
        assert_eq!(
            ledger.register_flight(&airline(), " ", now(), now()),
            Err(InsuranceError::EmptyFlightCode)
        );
    }

    #[test]
    fn buy_validates_flight_and_premium() {
        let (mut ledger, key) = ledger_with_flight();
        let missing = FlightKey::new(airline(), "XX1", now());
        assert_eq!(
            ledger.buy_insurance(&test_addr("p"), &missing, Amount::units(1), now()),
            Err(InsuranceError::FlightNotFound(missing))
        );
        assert_eq!(
            ledger.buy_insurance(&test_addr("p"), &key, Amount::ZERO, now()),
            Err(InsuranceError::ZeroPremium)
        );
        assert!(matches!(
            ledger.buy_insurance(&test_addr("p"), &key, Amount::new(UNIT + 1), now()),
            Err(InsuranceError::PremiumTooHigh { .. })
        ));
        assert!(ledger.policy(&test_addr("p"), &key).is_none());
    }

    #[test]
    fn payout_is_one_and_a_half_times_premium() {
        let (mut ledger, key) = ledger_with_flight();
        let payout = ledger
            .buy_insurance(&test_addr("p"), &key, Amount::units(1), now())
            .unwrap();
        assert_eq!(payout, Amount::new(1_500_000));
        assert_eq!(ledger.flight(&key).unwrap().premiums, Amount::units(1));
    }

    #[test]
    fn repurchase_rejected() {
        let (mut ledger, key) = ledger_with_flight();
        ledger
            .buy_insurance(&test_addr("p"), &key, Amount::new(UNIT / 2), now())
            .unwrap();
        assert!(matches!(
            ledger.buy_insurance(&test_addr("p"), &key, Amount::new(UNIT / 2), now()),
            Err(InsuranceError::PolicyExists { .. })
        ));
        assert_eq!(
            ledger.policy(&test_addr("p"), &key).unwrap().premium,
            Amount::new(UNIT / 2)
        );
    }

    #[test]
    fn late_airline_credits_each_policy_once() {
        let (mut ledger, key) = ledger_with_flight();
        ledger
            .buy_insurance(&test_addr("p"), &key, Amount::units(1), now())
            .unwrap();
        ledger
            .buy_insurance(&test_addr("q"), &key, Amount::new(UNIT / 2), now())
            .unwrap();

        let credited = ledger
            .apply_status(&key, FlightStatus::LateAirline, escrow())
            .unwrap();
        assert_eq!(credited, Amount::new(2_250_000));
        assert_eq!(ledger.credit_of(&test_addr("p")), Amount::new(1_500_000));
        assert_eq!(ledger.credit_of(&test_addr("q")), Amount::new(750_000));

        assert_eq!(ledger.claim_credit(&key, escrow()).unwrap(), Amount::ZERO);
        assert_eq!(
            ledger
                .apply_status(&key, FlightStatus::LateAirline, escrow())
                .unwrap(),
            Amount::ZERO
        );
        assert_eq!(ledger.credit_of(&test_addr("p")), Amount::new(1_500_000));
        assert_eq!(ledger.flight(&key).unwrap().credited, Amount::new(2_250_000));
    }

    #[test]
    fn other_statuses_do_not_credit() {
        for status in [
            FlightStatus::OnTime,
            FlightStatus::LateWeather,
            FlightStatus::LateTechnical,
            FlightStatus::LateOther,
        ] {
            let (mut ledger, key) = ledger_with_flight();
            ledger
                .buy_insurance(&test_addr("p"), &key, Amount::units(1), now())
                .unwrap();
            assert_eq!(ledger.apply_status(&key, status, escrow()).unwrap(), Amount::ZERO);
            assert_eq!(ledger.claim_credit(&key, escrow()).unwrap(), Amount::ZERO);
            assert_eq!(ledger.credit_of(&test_addr("p")), Amount::ZERO);
        }
    }

    #[test]
    fn first_status_sticks() {
        let (mut ledger, key) = ledger_with_flight();
        ledger
            .apply_status(&key, FlightStatus::OnTime, escrow())
            .unwrap();
        ledger
            .apply_status(&key, FlightStatus::LateAirline, escrow())
            .unwrap();
        assert_eq!(ledger.status_of(&key), FlightStatus::OnTime);
    }

    #[test]
    fn resolved_flight_cannot_be_insured() {
        let (mut ledger, key) = ledger_with_flight();
        ledger
            .apply_status(&key, FlightStatus::LateWeather, escrow())
            .unwrap();
        assert_eq!(
            ledger.buy_insurance(&test_addr("p"), &key, Amount::units(1), now()),
            Err(InsuranceError::FlightAlreadyResolved(key))
        );
    }

    #[test]
    fn claim_on_unknown_flight_fails() {
        let mut ledger = InsuranceLedger::new(ProtocolParams::surety_defaults());
        let key = FlightKey::new(airline(), "XX1", now());
        assert_eq!(
            ledger.claim_credit(&key, escrow()),
            Err(InsuranceError::FlightNotFound(key))
        );
    }

    #[test]
    fn status_for_unregistered_flight_ignored() {
        let mut ledger = InsuranceLedger::new(ProtocolParams::surety_defaults());
        let key = FlightKey::new(airline(), "XX1", now());
        assert_eq!(
            ledger
                .apply_status(&key, FlightStatus::LateAirline, escrow())
                .unwrap(),
            Amount::ZERO
        );
        assert!(ledger.flight(&key).is_none());
    }

    #[test]
    fn short_escrow_defers_credit_until_claim() {
        let (mut ledger, key) = ledger_with_flight();
        ledger
            .buy_insurance(&test_addr("p"), &key, Amount::units(1), now())
            .unwrap();
        let credited = ledger
            .apply_status(&key, FlightStatus::LateAirline, Amount::units(1))
            .unwrap();
        assert_eq!(credited, Amount::ZERO);
        assert!(!ledger.policy(&test_addr("p"), &key).unwrap().credited);
        assert!(ledger
            .drain_events()
            .iter()
            .any(|e| matches!(e, InsuranceEvent::CreditDeferred { .. })));

        let credited = ledger.claim_credit(&key, Amount::units(2)).unwrap();
        assert_eq!(credited, Amount::new(1_500_000));
        assert!(ledger.policy(&test_addr("p"), &key).unwrap().credited);
    }

    #[test]
    fn outstanding_credit_reduces_available_escrow() {
        let mut ledger = InsuranceLedger::new(ProtocolParams::surety_defaults());
        let f1 = ledger
            .register_flight(&airline(), "F1", Timestamp::new(10), now())
            .unwrap();
        let f2 = ledger
            .register_flight(&airline(), "F2", Timestamp::new(10), now())
            .unwrap();
        ledger
            .buy_insurance(&test_addr("p"), &f1, Amount::units(1), now())
            .unwrap();
        ledger
            .buy_insurance(&test_addr("q"), &f2, Amount::units(1), now())
            .unwrap();

        // 2 units of escrow: the first 1.5 payout fits, the second does not
        let escrow = Amount::units(2);
        ledger
            .apply_status(&f1, FlightStatus::LateAirline, escrow)
            .unwrap();
        let second = ledger
            .apply_status(&f2, FlightStatus::LateAirline, escrow)
            .unwrap();
        assert_eq!(second, Amount::ZERO);
        assert_eq!(ledger.outstanding_credit(), Amount::new(1_500_000));
    }

    #[test]
    fn take_credit_zeroes_balance() {
        let (mut ledger, key) = ledger_with_flight();
        ledger
            .buy_insurance(&test_addr("p"), &key, Amount::units(1), now())
            .unwrap();
        ledger
            .apply_status(&key, FlightStatus::LateAirline, escrow())
            .unwrap();

        assert_eq!(ledger.take_credit(&test_addr("p")).unwrap(), Amount::new(1_500_000));
        assert_eq!(ledger.credit_of(&test_addr("p")), Amount::ZERO);
        assert_eq!(ledger.outstanding_credit(), Amount::ZERO);
        assert_eq!(
            ledger.take_credit(&test_addr("p")),
            Err(InsuranceError::NoCredit(test_addr("p")))
        );

        ledger.restore_credit(&test_addr("p"), Amount::new(1_500_000));
        assert_eq!(ledger.credit_of(&test_addr("p")), Amount::new(1_500_000));
        assert_eq!(ledger.outstanding_credit(), Amount::new(1_500_000));
    }

    #[test]
    fn snapshot_restore_keeps_credited_flags() {
        let (mut ledger, key) = ledger_with_flight();
        ledger
            .buy_insurance(&test_addr("p"), &key, Amount::units(1), now())
            .unwrap();
        ledger
            .apply_status(&key, FlightStatus::LateAirline, escrow())
            .unwrap();

        let mut restored =
            InsuranceLedger::restore(ledger.snapshot(), ProtocolParams::surety_defaults());
        assert_eq!(restored.outstanding_credit(), Amount::new(1_500_000));
        assert_eq!(restored.claim_credit(&key, escrow()).unwrap(), Amount::ZERO);
        assert_eq!(restored.policies_for(&key).count(), 1);
    }

    #[test]
    fn check_purchase_leaves_state_alone() {
        let (mut ledger, key) = ledger_with_flight();
        assert_eq!(
            ledger.check_purchase(&test_addr("p"), &key, Amount::units(1)),
            Ok(Amount::new(1_500_000))
        );
        assert!(ledger.policy(&test_addr("p"), &key).is_none());
        assert_eq!(ledger.flight(&key).unwrap().premiums, Amount::ZERO);
        ledger.drain_events();
        assert!(ledger.drain_events().is_empty());
    }

    #[test]
    fn padded_code_names_the_registered_flight() {
        let mut ledger = InsuranceLedger::new(ProtocolParams::surety_defaults());
        let key = ledger
            .register_flight(&airline(), " ND1309 ", Timestamp::new(1_700_086_400), now())
            .unwrap();
        assert_eq!(key.code, "ND1309");
        let padded = FlightKey::new(airline(), "ND1309  ", Timestamp::new(1_700_086_400));
        assert_eq!(
            ledger.buy_insurance(&test_addr("p"), &padded, Amount::units(1), now()),
            Ok(Amount::new(1_500_000))
        );
        assert!(ledger.policy(&test_addr("p"), &key).is_some());
    }
}
