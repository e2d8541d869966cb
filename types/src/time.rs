//! Substrate time.
//!
//! Every call carries the substrate's clock reading in Unix seconds; the
//! engines never read the wall clock themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Wall-clock reading, for operator tooling. A clock behind the epoch
    /// reads as [`Timestamp::EPOCH`].
    pub fn now() -> Self {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(Self::EPOCH, |d| Self(d.as_secs()))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// `secs` later, saturating at the far end of the range.
    pub fn plus(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// True once `now` is at least `timeout_secs` past this instant.
    pub fn has_expired(&self, timeout_secs: u64, now: Timestamp) -> bool {
        now >= self.plus(timeout_secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
