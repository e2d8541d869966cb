use serde::{Deserialize, Serialize};
use surety_types::{Amount, FlightKey, FlightStatus, Timestamp};

/// A flight registered by a funded airline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub key: FlightKey,
    /// `Unknown` until oracle consensus delivers a final status.
    pub status: FlightStatus,
    pub registered_at: Timestamp,
    /// Sum of premiums paid on this flight.
    pub premiums: Amount,
    /// Sum of credits granted on this flight.
    pub credited: Amount,
}

impl Flight {
    pub fn new(key: FlightKey, registered_at: Timestamp) -> Self {
        Self {
            key,
            status: FlightStatus::Unknown,
            registered_at,
            premiums: Amount::ZERO,
            credited: Amount::ZERO,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }
}
