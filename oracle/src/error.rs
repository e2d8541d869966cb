use surety_types::{AccountId, Amount, Classify, ErrorKind, FlightKey};
use surety_vrf::VrfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("insufficient registration fee: {fee} < {required}")]
    InsufficientFee { fee: Amount, required: Amount },

    #[error("oracle {0} is already registered")]
    OracleAlreadyRegistered(AccountId),

    #[error("{0} is not a registered oracle")]
    NotRegisteredOracle(AccountId),

    #[error("index {index} does not match oracle {oracle}")]
    IndexMismatch { oracle: AccountId, index: u8 },

    #[error("invalid status code {0}")]
    InvalidStatus(u8),

    #[error("flight {0} is already resolved")]
    AlreadyResolved(FlightKey),

    #[error("no open request for {flight} at index {index}")]
    NoSuchRequest { flight: FlightKey, index: u8 },

    #[error("oracle {oracle} already responded to {flight} at index {index}")]
    DuplicateResponse {
        oracle: AccountId,
        flight: FlightKey,
        index: u8,
    },

    #[error("randomness error: {0}")]
    Vrf(#[from] VrfError),
}

impl Classify for OracleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotRegisteredOracle(_) => ErrorKind::Authorization,
            Self::OracleAlreadyRegistered(_)
            | Self::AlreadyResolved(_)
            | Self::DuplicateResponse { .. } => ErrorKind::State,
            Self::InsufficientFee { .. } | Self::IndexMismatch { .. } | Self::InvalidStatus(_) => {
                ErrorKind::Validation
            }
            Self::NoSuchRequest { .. } => ErrorKind::NotFound,
            Self::Vrf(_) => ErrorKind::Infrastructure,
        }
    }
}
