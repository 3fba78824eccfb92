//! Minimal human readable ABIs of the contracts the monitor reads.

pub const CURVE_POOL_ABI: &[&str] = &["function balances(uint256 i) view returns (uint256)"];

pub const BALANCER_VAULT_ABI: &[&str] = &[
    "function getPoolTokens(bytes32 poolId) view returns (address[] tokens, uint256[] balances, uint256 lastChangeBlock)",
];

pub const SUSHI_PAIR_ABI: &[&str] = &[
    "function getReserves() view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)",
];

pub const SUSHI_ROUTER_ABI: &[&str] = &[
    "function getAmountIn(uint256 amountOut, uint256 reserveIn, uint256 reserveOut) pure returns (uint256 amountIn)",
];

pub const WSTETH_ABI: &[&str] =
    &["function getStETHByWstETH(uint256 wstETHAmount) view returns (uint256)"];

pub const PRICE_FEED_ABI: &[&str] = &[
    "function latestRoundData() view returns (uint80 roundId, int256 answer, uint256 startedAt, uint256 updatedAt, uint80 answeredInRound)",
    "function decimals() view returns (uint8)",
];

pub const LIDO_ABI: &[&str] = &["function getBufferedEther() view returns (uint256)"];

pub const NODE_OPERATORS_REGISTRY_ABI: &[&str] = &[
    "function getActiveNodeOperatorsCount() view returns (uint256)",
    "function getUnusedSigningKeyCount(uint256 operatorId) view returns (uint256)",
];
