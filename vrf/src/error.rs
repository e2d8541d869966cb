use thiserror::Error;

#[derive(Debug, Error)]
pub enum VrfError {
    #[error("provider not available: {0}")]
    Unavailable(String),

    #[error("cannot draw {count} distinct indexes from a space of {space}")]
    SpaceTooSmall { count: usize, space: u8 },

    #[error("index space must be non-empty")]
    EmptySpace,

    #[error("{0}")]
    Other(String),
}
