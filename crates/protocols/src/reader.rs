//! Read-only contracts the detectors consume.
//!
//! Every read takes an optional block number; `None` reads the latest state.

use crate::error::ChainError;
use async_trait::async_trait;
use pool_watch_domain::{BlockHeader, PoolId, PoolReserves};
use rust_decimal::Decimal;

/// Raw answer of a price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OraclePrice {
    /// Price scaled by `10^decimals`.
    pub answer: Decimal,
    /// Decimal precision of `answer`.
    pub decimals: u32,
}

/// Pool state reads.
#[async_trait]
pub trait PoolStateReader: Send + Sync {
    /// Reserves of both pool sides in raw base units.
    async fn pool_reserves(
        &self,
        pool: PoolId,
        block: Option<u64>,
    ) -> Result<PoolReserves, ChainError>;

    /// Quotes the amount of side A a swap needs to buy `amount_out` units
    /// of side B.
    async fn simulate_trade(
        &self,
        pool: PoolId,
        amount_out: Decimal,
        block: Option<u64>,
    ) -> Result<Decimal, ChainError>;

    /// Converts an amount of the wrapped derivative (wstETH) into its
    /// rebasing underlying (stETH).
    async fn unwrap_to_underlying(
        &self,
        amount: Decimal,
        block: Option<u64>,
    ) -> Result<Decimal, ChainError>;
}

/// External reference price.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Latest answer of the feed as of `block`.
    async fn latest_price(&self, block: Option<u64>) -> Result<OraclePrice, ChainError>;
}

/// Staking protocol operations state.
#[async_trait]
pub trait DaoStateReader: Send + Sync {
    /// Ether buffered in the protocol, in wei.
    async fn buffered_ether(&self, block: Option<u64>) -> Result<Decimal, ChainError>;

    /// Number of active node operators.
    async fn active_node_operators(&self, block: Option<u64>) -> Result<u64, ChainError>;

    /// Unused signing keys of one node operator.
    async fn unused_signing_keys(
        &self,
        operator: u64,
        block: Option<u64>,
    ) -> Result<u64, ChainError>;
}

/// Block headers.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Current chain head.
    async fn latest_block(&self) -> Result<BlockHeader, ChainError>;

    /// Header of a specific block.
    async fn block(&self, number: u64) -> Result<BlockHeader, ChainError>;
}
