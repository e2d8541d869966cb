use surety_types::{AccountId, Amount, Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("airline {0} is not funded")]
    NotFunded(AccountId),

    #[error("{0} is not a registered airline")]
    NotAirline(AccountId),

    #[error("airline {0} is already registered")]
    AlreadyRegistered(AccountId),

    #[error("{sponsor} already proposed {candidate}")]
    AlreadyPending {
        candidate: AccountId,
        sponsor: AccountId,
    },

    #[error("{voter} has already voted for {candidate}")]
    DuplicateVote {
        candidate: AccountId,
        voter: AccountId,
    },

    #[error("no pending registration for {0}")]
    NotPending(AccountId),

    #[error("insufficient funding: {amount} < {minimum}")]
    InsufficientFunds { amount: Amount, minimum: Amount },

    #[error("airline name must not be empty")]
    EmptyName,

    #[error("funding overflow for {0}")]
    Overflow(AccountId),
}

impl Classify for GovernanceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFunded(_) | Self::NotAirline(_) => ErrorKind::Authorization,
            Self::AlreadyRegistered(_)
            | Self::AlreadyPending { .. }
            | Self::DuplicateVote { .. } => ErrorKind::State,
            Self::NotPending(_) => ErrorKind::NotFound,
            Self::InsufficientFunds { .. } | Self::EmptyName | Self::Overflow(_) => {
                ErrorKind::Validation
            }
        }
    }
}
