use crate::constants;
use crate::error::ChainError;
use ethers::types::{Address, H256};
use std::str::FromStr;

/// Addresses of every contract the reader talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAddresses {
    pub curve_pool: String,
    pub balancer_vault: String,
    pub balancer_pool_id: String,
    pub sushi_pair: String,
    pub sushi_router: String,
    pub wsteth: String,
    pub price_feed: String,
    pub lido: String,
    pub node_operators_registry: String,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            curve_pool: constants::CURVE_POOL_ADDRESS.to_string(),
            balancer_vault: constants::BALANCER_VAULT_ADDRESS.to_string(),
            balancer_pool_id: constants::BALANCER_POOL_ID.to_string(),
            sushi_pair: constants::SUSHI_POOL_ADDRESS.to_string(),
            sushi_router: constants::SUSHI_ROUTER_ADDRESS.to_string(),
            wsteth: constants::WSTETH_TOKEN_ADDRESS.to_string(),
            price_feed: constants::CHAINLINK_STETH_USD_ADDRESS.to_string(),
            lido: constants::LIDO_ADDRESS.to_string(),
            node_operators_registry: constants::NODE_OPERATORS_REGISTRY_ADDRESS.to_string(),
        }
    }
}

pub(crate) fn parse_address(value: &str) -> Result<Address, ChainError> {
    Address::from_str(value).map_err(|_| ChainError::InvalidAddress(value.to_string()))
}

pub(crate) fn parse_pool_id(value: &str) -> Result<H256, ChainError> {
    H256::from_str(value).map_err(|_| ChainError::InvalidAddress(value.to_string()))
}
