//! Operation counters.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe, fixed set of named counters.
///
/// Names outside the set given at construction are ignored, so a typo never
/// allocates a new counter at runtime.
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|&n| (n, AtomicU64::new(0))).collect(),
        }
    }

    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Current values, ordered by name.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot(
            self.counters
                .iter()
                .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
                .collect(),
        )
    }
}

/// Point-in-time copy of every counter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatsSnapshot(pub BTreeMap<&'static str, u64>);

impl StatsSnapshot {
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_ignored() {
        let stats = StatsCounter::new(&["a", "b"]);
        stats.increment("a");
        stats.add("b", 5);
        stats.increment("zzz");
        assert_eq!(stats.get("a"), 1);
        assert_eq!(stats.get("b"), 5);
        assert_eq!(stats.get("zzz"), 0);
        assert_eq!(stats.snapshot().0.len(), 2);
    }

    #[test]
    fn snapshot_is_ordered() {
        let stats = StatsCounter::new(&["zeta", "alpha"]);
        stats.increment("zeta");
        let snap = stats.snapshot();
        let names: Vec<_> = snap.0.keys().copied().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(snap.get("zeta"), 1);
    }
}
