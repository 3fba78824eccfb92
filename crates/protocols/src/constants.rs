//! Ethereum mainnet contracts of the reference deployment.

/// Curve stETH/ETH stable swap.
pub const CURVE_POOL_ADDRESS: &str = "0xDC24316b9AE028F1497c275EB9192a3Ea0f67022";

/// Balancer V2 vault.
pub const BALANCER_VAULT_ADDRESS: &str = "0xBA12222222228d8Ba445958a75a0704d566BF2C8";

/// Balancer wstETH/WETH stable pool id.
pub const BALANCER_POOL_ID: &str =
    "0x32296969ef14eb0c6d29669c550d4a0449130230000200000000000000000080";

/// SushiSwap DAI/wstETH pair.
pub const SUSHI_POOL_ADDRESS: &str = "0xc5578194D457dcce3f272538D1ad52c68d1CE849";

/// SushiSwap router.
pub const SUSHI_ROUTER_ADDRESS: &str = "0xd9e1cE17f2641f24aE83637ab66a2cca9C378B9F";

/// wstETH token.
pub const WSTETH_TOKEN_ADDRESS: &str = "0x7f39C581F595B53c5cb19bD0b3f8dA6c935E2Ca0";

/// Chainlink stETH/USD price feed.
pub const CHAINLINK_STETH_USD_ADDRESS: &str = "0xCfE54B5cD566aB89272946F602D76Ea879CAb4a8";

/// Lido stETH token and DAO accounting.
pub const LIDO_ADDRESS: &str = "0xae7ab96520DE3A18E5e111B5EaAb095312D7fE84";

/// Lido node operators registry.
pub const NODE_OPERATORS_REGISTRY_ADDRESS: &str = "0x55032650b14df07b85bF18A3a3eC8E0Af2e028d5";

/// Token decimals of ETH and its derivatives.
pub const ETH_DECIMALS: u32 = 18;
