use pool_watch_domain::PoolId;
use pool_watch_domain::value_objects::AmountError;
use thiserror::Error;

/// Errors reading chain state.
#[derive(Error, Debug, Clone)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("call to {contract}.{method} failed: {message}")]
    Contract {
        contract: &'static str,
        method: &'static str,
        message: String,
    },

    #[error("could not decode chain value: {0}")]
    Decode(#[from] AmountError),

    #[error("invalid value passed to contract: {0}")]
    InvalidInput(String),

    #[error("invalid address or id: {0}")]
    InvalidAddress(String),

    #[error("block {0} not found")]
    MissingBlock(u64),

    #[error("{operation} is not supported for the {pool} pool")]
    Unsupported {
        pool: PoolId,
        operation: &'static str,
    },
}

impl ChainError {
    /// Whether a retry on a later block may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ChainError::Rpc(_) | ChainError::Contract { .. } | ChainError::MissingBlock(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ChainError::Rpc("timeout".to_string()).is_transient());
        assert!(ChainError::MissingBlock(1).is_transient());
        assert!(
            !ChainError::Unsupported {
                pool: PoolId::Curve,
                operation: "simulate_trade",
            }
            .is_transient()
        );
        assert!(!ChainError::Decode(AmountError::TooLarge("1".to_string())).is_transient());
    }
}
