//! Caller identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated caller identity (airline, passenger, oracle or owner).
///
/// The engine never authenticates anything itself: the substrate hands us an
/// identity it has already verified, and we only compare them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an identity from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.is_empty(), "account id must not be empty");
        Self(s)
    }

    /// Fallible constructor for identities coming from config or snapshots.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(AccountId::parse("  air1 ").unwrap().as_str(), "air1");
        assert!(AccountId::parse("   ").is_none());
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn new_rejects_empty() {
        let _ = AccountId::new("");
    }
}
