//! Open status requests and their response tallies.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use surety_types::{AccountId, FlightKey, FlightStatus, Timestamp};

/// Oracles grouped by the status they reported.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTally {
    by_status: BTreeMap<u8, BTreeSet<AccountId>>,
}

impl ResponseTally {
    /// Whether `oracle` has reported any status.
    pub fn has_responded(&self, oracle: &AccountId) -> bool {
        self.by_status.values().any(|set| set.contains(oracle))
    }

    /// Record a report and return the number of oracles now agreeing on it.
    pub fn record(&mut self, oracle: AccountId, status: FlightStatus) -> usize {
        let set = self.by_status.entry(status.code()).or_default();
        set.insert(oracle);
        set.len()
    }

    pub fn count(&self, status: FlightStatus) -> usize {
        self.by_status.get(&status.code()).map_or(0, BTreeSet::len)
    }

    /// Oracles that reported `status`, in identity order.
    pub fn reporters(&self, status: FlightStatus) -> Vec<AccountId> {
        self.by_status
            .get(&status.code())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.by_status.values().map(BTreeSet::len).sum()
    }
}

/// A request for oracles holding `index` to report on `flight`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub flight: FlightKey,
    pub index: u8,
    pub requester: AccountId,
    pub opened_at: Timestamp,
    pub responses: ResponseTally,
}

impl StatusRequest {
    pub fn new(flight: FlightKey, index: u8, requester: AccountId, opened_at: Timestamp) -> Self {
        Self {
            flight,
            index,
            requester,
            opened_at,
            responses: ResponseTally::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_per_status() {
        let mut tally = ResponseTally::default();
        assert_eq!(tally.record(AccountId::new("o1"), FlightStatus::LateAirline), 1);
        assert_eq!(tally.record(AccountId::new("o2"), FlightStatus::LateAirline), 2);
        assert_eq!(tally.record(AccountId::new("o3"), FlightStatus::OnTime), 1);
        assert_eq!(tally.count(FlightStatus::LateAirline), 2);
        assert_eq!(tally.count(FlightStatus::LateWeather), 0);
        assert_eq!(tally.total(), 3);
        assert!(tally.has_responded(&AccountId::new("o3")));
        assert!(!tally.has_responded(&AccountId::new("o4")));
    }
}
