//! Value amounts.
//!
//! Amounts are fixed-point integers (u128) to avoid floating-point errors.
//! One display unit is [`UNIT`] raw units, so a 1.5x payout on a 1 unit
//! premium is exactly 1_500_000 raw.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw units per display unit.
pub const UNIT: u128 = 1_000_000;

/// Basis-point denominator used for multipliers.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// An amount of value held in the ledger, in raw units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole display units.
    pub fn units(units: u128) -> Self {
        Self(units.saturating_mul(UNIT))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Scale by a basis-point multiplier, rounding down.
    pub fn checked_mul_bps(self, bps: u32) -> Option<Self> {
        self.0
            .checked_mul(u128::from(bps))
            .map(|scaled| Self(scaled / BPS_DENOMINATOR))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:06}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_and_a_half_times_one_unit() {
        let premium = Amount::units(1);
        assert_eq!(premium.checked_mul_bps(15_000), Some(Amount::new(1_500_000)));
    }

    #[test]
    fn display_trims_fraction() {
        assert_eq!(Amount::new(1_500_000).to_string(), "1.5");
        assert_eq!(Amount::units(10).to_string(), "10");
        assert_eq!(Amount::new(1).to_string(), "0.000001");
    }

    #[test]
    fn checked_sub_underflow_is_none() {
        assert_eq!(Amount::units(1).checked_sub(Amount::units(2)), None);
    }
}
