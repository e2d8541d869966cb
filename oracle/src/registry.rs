//! Registered oracles and their index sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use surety_types::{AccountId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oracle {
    pub id: AccountId,
    /// Distinct indexes fixed at registration.
    pub indexes: Vec<u8>,
    pub registered_at: Timestamp,
}

impl Oracle {
    pub fn holds(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}

/// Oracle identities and their immutable index sets.
#[derive(Clone, Debug, Default)]
pub struct OracleRegistry {
    oracles: BTreeMap<AccountId, Oracle>,
}

impl OracleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new oracle. Returns `false` (and changes nothing) if the
    /// identity is already registered.
    pub fn insert(&mut self, oracle: Oracle) -> bool {
        if self.oracles.contains_key(&oracle.id) {
            return false;
        }
        self.oracles.insert(oracle.id.clone(), oracle);
        true
    }

    pub fn get(&self, id: &AccountId) -> Option<&Oracle> {
        self.oracles.get(id)
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.oracles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }

    /// Oracles holding `index`.
    pub fn holders(&self, index: u8) -> impl Iterator<Item = &Oracle> {
        self.oracles.values().filter(move |o| o.holds(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Oracle> {
        self.oracles.values()
    }
}

impl FromIterator<Oracle> for OracleRegistry {
    fn from_iter<I: IntoIterator<Item = Oracle>>(iter: I) -> Self {
        Self {
            oracles: iter.into_iter().map(|o| (o.id.clone(), o)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle(id: &str, indexes: &[u8]) -> Oracle {
        Oracle {
            id: AccountId::new(id),
            indexes: indexes.to_vec(),
            registered_at: Timestamp::EPOCH,
        }
    }

    #[test]
    fn insert_is_first_write_wins() {
        let mut reg = OracleRegistry::new();
        assert!(reg.insert(oracle("o1", &[1, 2, 3])));
        assert!(!reg.insert(oracle("o1", &[4, 5, 6])));
        assert_eq!(reg.get(&AccountId::new("o1")).unwrap().indexes, vec![1, 2, 3]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn holders_filters_by_index() {
        let reg: OracleRegistry = [oracle("o1", &[1, 2, 3]), oracle("o2", &[3, 4, 5])]
            .into_iter()
            .collect();
        assert_eq!(reg.holders(3).count(), 2);
        assert_eq!(reg.holders(1).count(), 1);
        assert_eq!(reg.holders(9).count(), 0);
    }
}
