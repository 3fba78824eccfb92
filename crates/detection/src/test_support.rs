//! Scripted chain used by detector tests.

use async_trait::async_trait;
use pool_watch_domain::{PoolId, PoolReserves};
use pool_watch_protocols::{ChainError, DaoStateReader, OraclePrice, PoolStateReader, PriceFeed};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Constant product quote with a 0.3% fee, rounded up by one base unit.
fn amount_in(
    amount_out: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
) -> Result<Decimal, ChainError> {
    if amount_out >= reserve_out {
        return Err(ChainError::InvalidInput(
            "insufficient liquidity".to_string(),
        ));
    }
    let numerator = reserve_in * amount_out * dec!(1000);
    let denominator = (reserve_out - amount_out) * dec!(997);
    Ok((numerator / denominator).trunc() + Decimal::ONE)
}

#[derive(Debug)]
struct Script {
    reserves: HashMap<(PoolId, u64), PoolReserves>,
    latest: HashMap<PoolId, PoolReserves>,
    unwrap_rate: Decimal,
    price: OraclePrice,
    buffered_wei: Decimal,
    operator_keys: Vec<u64>,
    failing: bool,
}

/// In-memory chain serving reserves per block.
///
/// A block without scripted reserves falls back to the most recently
/// scripted reserves of the pool.
#[derive(Debug)]
pub struct MockChain {
    script: Mutex<Script>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script {
                reserves: HashMap::new(),
                latest: HashMap::new(),
                unwrap_rate: Decimal::ONE,
                price: OraclePrice {
                    answer: Decimal::ZERO,
                    decimals: 8,
                },
                buffered_wei: Decimal::ZERO,
                operator_keys: Vec::new(),
                failing: false,
            }),
        })
    }

    pub fn set_reserves(&self, pool: PoolId, block: u64, reserves: PoolReserves) {
        let mut script = self.script.lock().unwrap();
        script.reserves.insert((pool, block), reserves);
        script.latest.insert(pool, reserves);
    }

    pub fn set_unwrap_rate(&self, rate: Decimal) {
        self.script.lock().unwrap().unwrap_rate = rate;
    }

    pub fn set_price(&self, price: OraclePrice) {
        self.script.lock().unwrap().price = price;
    }

    pub fn set_buffered_wei(&self, wei: Decimal) {
        self.script.lock().unwrap().buffered_wei = wei;
    }

    pub fn set_operator_keys(&self, keys: Vec<u64>) {
        self.script.lock().unwrap().operator_keys = keys;
    }

    /// Makes every read fail with a transient RPC error.
    pub fn fail_reads(&self, failing: bool) {
        self.script.lock().unwrap().failing = failing;
    }

    fn check(&self) -> Result<(), ChainError> {
        if self.script.lock().unwrap().failing {
            return Err(ChainError::Rpc("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PoolStateReader for MockChain {
    async fn pool_reserves(
        &self,
        pool: PoolId,
        block: Option<u64>,
    ) -> Result<PoolReserves, ChainError> {
        self.check()?;
        let script = self.script.lock().unwrap();
        block
            .and_then(|number| script.reserves.get(&(pool, number)))
            .or_else(|| script.latest.get(&pool))
            .copied()
            .ok_or(ChainError::MissingBlock(block.unwrap_or_default()))
    }

    async fn simulate_trade(
        &self,
        pool: PoolId,
        amount_out: Decimal,
        block: Option<u64>,
    ) -> Result<Decimal, ChainError> {
        let reserves = self.pool_reserves(pool, block).await?;
        amount_in(amount_out, reserves.side_a, reserves.side_b)
    }

    async fn unwrap_to_underlying(
        &self,
        amount: Decimal,
        _block: Option<u64>,
    ) -> Result<Decimal, ChainError> {
        self.check()?;
        Ok((amount * self.script.lock().unwrap().unwrap_rate).trunc())
    }
}

#[async_trait]
impl PriceFeed for MockChain {
    async fn latest_price(&self, _block: Option<u64>) -> Result<OraclePrice, ChainError> {
        self.check()?;
        Ok(self.script.lock().unwrap().price)
    }
}

#[async_trait]
impl DaoStateReader for MockChain {
    async fn buffered_ether(&self, _block: Option<u64>) -> Result<Decimal, ChainError> {
        self.check()?;
        Ok(self.script.lock().unwrap().buffered_wei)
    }

    async fn active_node_operators(&self, _block: Option<u64>) -> Result<u64, ChainError> {
        self.check()?;
        Ok(self.script.lock().unwrap().operator_keys.len() as u64)
    }

    async fn unused_signing_keys(
        &self,
        operator: u64,
        _block: Option<u64>,
    ) -> Result<u64, ChainError> {
        self.check()?;
        let script = self.script.lock().unwrap();
        usize::try_from(operator)
            .ok()
            .and_then(|index| script.operator_keys.get(index))
            .copied()
            .ok_or_else(|| ChainError::InvalidInput(format!("no operator {operator}")))
    }
}
