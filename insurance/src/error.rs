use surety_types::{AccountId, Amount, Classify, ErrorKind, FlightKey};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsuranceError {
    #[error("flight {0} is already registered")]
    DuplicateFlight(FlightKey),

    #[error("flight code must not be empty")]
    EmptyFlightCode,

    #[error("flight {0} not found")]
    FlightNotFound(FlightKey),

    #[error("flight {0} already has a final status")]
    FlightAlreadyResolved(FlightKey),

    #[error("premium must be greater than zero")]
    ZeroPremium,

    #[error("premium too high: {premium} > {cap}")]
    PremiumTooHigh { premium: Amount, cap: Amount },

    #[error("{passenger} already holds a policy on {flight}")]
    PolicyExists {
        passenger: AccountId,
        flight: FlightKey,
    },

    #[error("{0} has no credit to withdraw")]
    NoCredit(AccountId),

    #[error("amount overflow: {0}")]
    Overflow(String),
}

impl Classify for InsuranceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateFlight(_)
            | Self::FlightAlreadyResolved(_)
            | Self::PolicyExists { .. } => ErrorKind::State,
            Self::EmptyFlightCode
            | Self::ZeroPremium
            | Self::PremiumTooHigh { .. }
            | Self::Overflow(_) => ErrorKind::Validation,
            Self::FlightNotFound(_) | Self::NoCredit(_) => ErrorKind::NotFound,
        }
    }
}
