//! Pool reserve snapshots normalized for imbalance math.
//!
//! The imbalance of a pool compares the staked side against plain ETH in a
//! common unit:
//! - Curve holds ETH and stETH, compared as is
//! - Balancer holds wstETH and WETH; wstETH does not rebase, so it is
//!   recounted to stETH before the comparison
//! - Sushi pairs wstETH with DAI and has no meaningful imbalance

use crate::error::DetectionError;
use pool_watch_domain::math::percent_imbalance;
use pool_watch_domain::{PoolId, PoolReserves};
use pool_watch_protocols::{ChainError, PoolStateReader};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Reserves of a pool at one block, with its imbalance when it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Raw reserves as ordered by the pool contract.
    pub reserves: PoolReserves,
    /// Signed imbalance in percent, `None` for pools without one.
    pub imbalance: Option<Decimal>,
}

/// Reads pool reserves through a [`PoolStateReader`].
#[derive(Clone)]
pub struct PoolSnapshotFetcher {
    reader: Arc<dyn PoolStateReader>,
}

impl PoolSnapshotFetcher {
    /// Creates a fetcher over `reader`.
    pub fn new(reader: Arc<dyn PoolStateReader>) -> Self {
        Self { reader }
    }

    /// Raw reserves of `pool` at `block`.
    pub async fn reserves(
        &self,
        pool: PoolId,
        block: Option<u64>,
    ) -> Result<PoolReserves, ChainError> {
        self.reader.pool_reserves(pool, block).await
    }

    /// Reserves and imbalance of `pool` at `block`.
    ///
    /// # Errors
    ///
    /// Fails if a chain read fails. An empty side is reported as a fully
    /// one-sided imbalance, not as an error.
    pub async fn snapshot(
        &self,
        pool: PoolId,
        block: Option<u64>,
    ) -> Result<PoolSnapshot, DetectionError> {
        let reserves = self.reserves(pool, block).await?;
        let imbalance = self.imbalance(pool, reserves, block).await?;
        Ok(PoolSnapshot {
            reserves,
            imbalance,
        })
    }

    /// Imbalance of `pool` given reserves read at `block`.
    ///
    /// Positive when the staked side is in excess.
    pub async fn imbalance(
        &self,
        pool: PoolId,
        reserves: PoolReserves,
        block: Option<u64>,
    ) -> Result<Option<Decimal>, DetectionError> {
        let (eth, staked) = match pool {
            PoolId::Curve => (reserves.side_a, reserves.side_b),
            PoolId::Balancer => {
                let steth = self
                    .reader
                    .unwrap_to_underlying(reserves.side_a, block)
                    .await?;
                (reserves.side_b, steth)
            }
            PoolId::Sushi => return Ok(None),
        };
        Ok(Some(percent_imbalance(eth, staked)?))
    }
}
