//! Reads pool, oracle and DAO state over JSON-RPC.

use super::abi;
use super::addresses::{ContractAddresses, parse_address, parse_pool_id};
use crate::error::ChainError;
use crate::reader::{BlockSource, DaoStateReader, OraclePrice, PoolStateReader, PriceFeed};
use async_trait::async_trait;
use ethers::abi::{Detokenize, Tokenize, parse_abi};
use ethers::contract::Contract;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, BlockId, BlockNumber, H256, I256, U256};
use pool_watch_domain::value_objects::{AmountError, raw_to_decimal};
use pool_watch_domain::{BlockHeader, PoolId, PoolReserves};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

type RpcContract = Contract<Provider<Http>>;

/// Ethereum reader backed by an HTTP JSON-RPC provider.
pub struct EthereumReader {
    /// RPC provider.
    provider: Arc<Provider<Http>>,
    curve_pool: RpcContract,
    balancer_vault: RpcContract,
    balancer_pool_id: H256,
    sushi_pair: RpcContract,
    sushi_router: RpcContract,
    wsteth: RpcContract,
    price_feed: RpcContract,
    lido: RpcContract,
    node_operators: RpcContract,
}

impl EthereumReader {
    /// Connects to `rpc_url` using the mainnet contract addresses.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid.
    pub fn connect(rpc_url: &str) -> Result<Self, ChainError> {
        Self::with_addresses(rpc_url, &ContractAddresses::default())
    }

    /// Connects to `rpc_url` using a custom address set.
    ///
    /// # Errors
    /// Returns an error if the URL or any address is invalid.
    pub fn with_addresses(
        rpc_url: &str,
        addresses: &ContractAddresses,
    ) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainError::Rpc(format!("invalid RPC url {rpc_url}: {e}")))?;
        let provider = Arc::new(provider);

        let contract = |address: &str, abi: &[&str]| -> Result<RpcContract, ChainError> {
            let abi = parse_abi(abi).map_err(|e| ChainError::InvalidInput(e.to_string()))?;
            Ok(Contract::new(
                parse_address(address)?,
                abi,
                Arc::clone(&provider),
            ))
        };

        Ok(Self {
            curve_pool: contract(&addresses.curve_pool, abi::CURVE_POOL_ABI)?,
            balancer_vault: contract(&addresses.balancer_vault, abi::BALANCER_VAULT_ABI)?,
            balancer_pool_id: parse_pool_id(&addresses.balancer_pool_id)?,
            sushi_pair: contract(&addresses.sushi_pair, abi::SUSHI_PAIR_ABI)?,
            sushi_router: contract(&addresses.sushi_router, abi::SUSHI_ROUTER_ABI)?,
            wsteth: contract(&addresses.wsteth, abi::WSTETH_ABI)?,
            price_feed: contract(&addresses.price_feed, abi::PRICE_FEED_ABI)?,
            lido: contract(&addresses.lido, abi::LIDO_ABI)?,
            node_operators: contract(
                &addresses.node_operators_registry,
                abi::NODE_OPERATORS_REGISTRY_ABI,
            )?,
            provider,
        })
    }

    async fn header(&self, id: BlockId, requested: Option<u64>) -> Result<BlockHeader, ChainError> {
        let block = self
            .provider
            .get_block(id)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .ok_or(ChainError::MissingBlock(requested.unwrap_or_default()))?;

        let number = block
            .number
            .map(|n| n.as_u64())
            .or(requested)
            .ok_or(ChainError::MissingBlock(0))?;

        Ok(BlockHeader::new(number, block.timestamp.low_u64()))
    }
}

/// Calls a view function, pinned to `block` when given.
async fn query<T, D>(
    contract: &RpcContract,
    name: &'static str,
    method: &'static str,
    args: T,
    block: Option<u64>,
) -> Result<D, ChainError>
where
    T: Tokenize + Send,
    D: Detokenize + Send + Sync,
{
    let mut call = contract
        .method::<T, D>(method, args)
        .map_err(|e| contract_error(name, method, e))?;
    if let Some(number) = block {
        call = call.block(number);
    }
    call.call().await.map_err(|e| contract_error(name, method, e))
}

fn contract_error(contract: &'static str, method: &'static str, err: impl Display) -> ChainError {
    ChainError::Contract {
        contract,
        method,
        message: err.to_string(),
    }
}

fn to_decimal(value: U256) -> Result<Decimal, ChainError> {
    Ok(raw_to_decimal(value)?)
}

fn signed_to_decimal(value: I256) -> Result<Decimal, ChainError> {
    let digits = value.to_string();
    Decimal::from_str_exact(&digits).map_err(|_| ChainError::Decode(AmountError::TooLarge(digits)))
}

fn to_u256(value: Decimal) -> Result<U256, ChainError> {
    if value.is_sign_negative() {
        return Err(ChainError::InvalidInput(format!("negative amount {value}")));
    }
    U256::from_dec_str(&value.trunc().to_string())
        .map_err(|e| ChainError::InvalidInput(format!("{value}: {e}")))
}

#[async_trait]
impl PoolStateReader for EthereumReader {
    async fn pool_reserves(
        &self,
        pool: PoolId,
        block: Option<u64>,
    ) -> Result<PoolReserves, ChainError> {
        let reserves = match pool {
            PoolId::Curve => {
                let eth: U256 =
                    query(&self.curve_pool, "CurvePool", "balances", U256::zero(), block).await?;
                let steth: U256 =
                    query(&self.curve_pool, "CurvePool", "balances", U256::one(), block).await?;
                PoolReserves::new(to_decimal(eth)?, to_decimal(steth)?)
            }
            PoolId::Balancer => {
                let (_tokens, balances, _last_change): (Vec<Address>, Vec<U256>, U256) = query(
                    &self.balancer_vault,
                    "BalancerVault",
                    "getPoolTokens",
                    self.balancer_pool_id,
                    block,
                )
                .await?;
                let [wsteth, weth] = balances.as_slice() else {
                    return Err(contract_error(
                        "BalancerVault",
                        "getPoolTokens",
                        format!("expected 2 balances, got {}", balances.len()),
                    ));
                };
                PoolReserves::new(to_decimal(*wsteth)?, to_decimal(*weth)?)
            }
            PoolId::Sushi => {
                let (dai, wsteth, _timestamp): (U256, U256, u32) =
                    query(&self.sushi_pair, "SushiPair", "getReserves", (), block).await?;
                PoolReserves::new(to_decimal(dai)?, to_decimal(wsteth)?)
            }
        };

        debug!(
            pool = %pool,
            block = ?block,
            side_a = %reserves.side_a,
            side_b = %reserves.side_b,
            "Read pool reserves"
        );

        Ok(reserves)
    }

    async fn simulate_trade(
        &self,
        pool: PoolId,
        amount_out: Decimal,
        block: Option<u64>,
    ) -> Result<Decimal, ChainError> {
        if pool != PoolId::Sushi {
            return Err(ChainError::Unsupported {
                pool,
                operation: "simulate_trade",
            });
        }

        let reserves = self.pool_reserves(pool, block).await?;
        // DAI paid in for wstETH taken out
        let amount_in: U256 = query(
            &self.sushi_router,
            "SushiRouter",
            "getAmountIn",
            (
                to_u256(amount_out)?,
                to_u256(reserves.side_a)?,
                to_u256(reserves.side_b)?,
            ),
            block,
        )
        .await?;

        to_decimal(amount_in)
    }

    async fn unwrap_to_underlying(
        &self,
        amount: Decimal,
        block: Option<u64>,
    ) -> Result<Decimal, ChainError> {
        let underlying: U256 = query(
            &self.wsteth,
            "WstETH",
            "getStETHByWstETH",
            to_u256(amount)?,
            block,
        )
        .await?;
        to_decimal(underlying)
    }
}

#[async_trait]
impl PriceFeed for EthereumReader {
    async fn latest_price(&self, block: Option<u64>) -> Result<OraclePrice, ChainError> {
        let (_round, answer, _started, _updated, _answered_in): (U256, I256, U256, U256, U256) =
            query(&self.price_feed, "PriceFeed", "latestRoundData", (), block).await?;
        let decimals: u8 = query(&self.price_feed, "PriceFeed", "decimals", (), block).await?;

        Ok(OraclePrice {
            answer: signed_to_decimal(answer)?,
            decimals: u32::from(decimals),
        })
    }
}

#[async_trait]
impl DaoStateReader for EthereumReader {
    async fn buffered_ether(&self, block: Option<u64>) -> Result<Decimal, ChainError> {
        let buffered: U256 = query(&self.lido, "Lido", "getBufferedEther", (), block).await?;
        to_decimal(buffered)
    }

    async fn active_node_operators(&self, block: Option<u64>) -> Result<u64, ChainError> {
        let count: U256 = query(
            &self.node_operators,
            "NodeOperatorsRegistry",
            "getActiveNodeOperatorsCount",
            (),
            block,
        )
        .await?;
        Ok(count.low_u64())
    }

    async fn unused_signing_keys(
        &self,
        operator: u64,
        block: Option<u64>,
    ) -> Result<u64, ChainError> {
        let count: U256 = query(
            &self.node_operators,
            "NodeOperatorsRegistry",
            "getUnusedSigningKeyCount",
            U256::from(operator),
            block,
        )
        .await?;
        Ok(count.low_u64())
    }
}

#[async_trait]
impl BlockSource for EthereumReader {
    async fn latest_block(&self) -> Result<BlockHeader, ChainError> {
        self.header(BlockId::Number(BlockNumber::Latest), None).await
    }

    async fn block(&self, number: u64) -> Result<BlockHeader, ChainError> {
        self.header(BlockId::from(number), Some(number)).await
    }
}
