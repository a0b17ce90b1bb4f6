//! Error type for the projection engine.

use thiserror::Error;

/// The only failure the engine reports: a distance or time that must be
/// strictly positive was not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
