use serde::{Deserialize, Serialize};
use surety_types::{AccountId, Amount, FlightKey, Timestamp};

/// One passenger's cover on one flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub passenger: AccountId,
    pub flight: FlightKey,
    pub premium: Amount,
    /// `premium × multiplier`, fixed at purchase.
    pub payout: Amount,
    /// Set once the payout has been added to the passenger's credit.
    pub credited: bool,
    pub purchased_at: Timestamp,
}
