//! Flight identity and status codes.

use crate::{AccountId, Timestamp};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

const FLIGHT_KEY_DOMAIN: &[u8] = b"surety-flight-key";

/// Identifies one scheduled flight: operating airline, flight code, departure.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    pub airline: AccountId,
    pub code: String,
    pub timestamp: Timestamp,
}

impl FlightKey {
    /// Surrounding whitespace in `code` is dropped, so `" F1 "` and `"F1"`
    /// name the same flight.
    pub fn new(airline: AccountId, code: impl Into<String>, timestamp: Timestamp) -> Self {
        let code = code.into();
        let trimmed = code.trim();
        let code = if trimmed.len() == code.len() {
            code
        } else {
            trimmed.to_string()
        };
        Self {
            airline,
            code,
            timestamp,
        }
    }

    /// Stable 32-byte digest of the key.
    ///
    /// Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` never collide.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Blake2b256::new();
        hasher.update(FLIGHT_KEY_DOMAIN);
        for part in [self.airline.as_str().as_bytes(), self.code.as_bytes()] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        hasher.update(self.timestamp.as_secs().to_be_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.airline, self.code, self.timestamp)
    }
}

/// Reported status of a flight. Numeric codes match the oracle wire values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    #[default]
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::OnTime,
        Self::LateAirline,
        Self::LateWeather,
        Self::LateTechnical,
        Self::LateOther,
    ];

    pub fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::OnTime => 10,
            Self::LateAirline => 20,
            Self::LateWeather => 30,
            Self::LateTechnical => 40,
            Self::LateOther => 50,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Whether this status is final (anything but Unknown).
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Only an airline-caused delay pays out.
    pub fn pays_out(&self) -> bool {
        matches!(self, Self::LateAirline)
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::OnTime => "on-time",
            Self::LateAirline => "late-airline",
            Self::LateWeather => "late-weather",
            Self::LateTechnical => "late-technical",
            Self::LateOther => "late-other",
        };
        write!(f, "{name}({})", self.code())
    }
}
