use surety_governance::GovernanceError;
use surety_insurance::InsuranceError;
use surety_oracle::OracleError;
use surety_store::StoreError;
use surety_types::{AccountId, Amount, Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("contract is not operational")]
    ContractNotOperational,

    #[error("{0} is not the contract owner")]
    NotOwner(AccountId),

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("insurance error: {0}")]
    Insurance(#[from] InsuranceError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ContractNotOperational => ErrorKind::State,
            Self::NotOwner(_) => ErrorKind::Authorization,
            Self::InsufficientBalance { .. } => ErrorKind::Validation,
            Self::Governance(e) => e.kind(),
            Self::Oracle(e) => e.kind(),
            Self::Insurance(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::Config(_) | Self::Snapshot(_) => ErrorKind::Infrastructure,
        }
    }
}
