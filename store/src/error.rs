use surety_types::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("insufficient balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: String,
        needed: u128,
        available: u128,
    },

    #[error("balance overflow in {0}")]
    Overflow(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Classify for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientBalance { .. } => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Overflow(_) | Self::Backend(_) | Self::Serialization(_) => {
                ErrorKind::Infrastructure
            }
        }
    }
}
