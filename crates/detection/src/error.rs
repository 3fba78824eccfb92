use pool_watch_domain::value_objects::AmountError;
use pool_watch_domain::{AlertError, MathError};
use pool_watch_protocols::ChainError;
use thiserror::Error;

/// Errors aborting a detector cycle.
#[derive(Error, Debug, Clone)]
pub enum DetectionError {
    #[error("chain read failed: {0}")]
    Chain(#[from] ChainError),

    #[error("invalid arithmetic input: {0}")]
    Math(#[from] MathError),

    #[error("inconsistent alert batch: {0}")]
    Merge(#[from] AlertError),
}

impl From<AmountError> for DetectionError {
    fn from(err: AmountError) -> Self {
        DetectionError::Chain(ChainError::Decode(err))
    }
}

impl DetectionError {
    /// Whether the same detector may succeed on a later block.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, DetectionError::Chain(err) if err.is_transient())
    }
}
