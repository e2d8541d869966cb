//! Nullable clock: substrate time under test control.

use std::cell::Cell;
use surety_types::Timestamp;

/// Hands out the `now` a test wants each call to carry.
pub struct NullClock {
    secs: Cell<u64>,
}

impl NullClock {
    pub fn new(start_secs: u64) -> Self {
        Self {
            secs: Cell::new(start_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.get())
    }

    /// Move forward by `secs` and return the new reading.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let next = self.now().plus(secs);
        self.secs.set(next.as_secs());
        next
    }
}
