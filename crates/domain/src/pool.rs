use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monitored liquidity pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolId {
    /// Curve stETH/ETH stable swap.
    Curve,
    /// Balancer wstETH/WETH stable pool.
    Balancer,
    /// SushiSwap DAI/wstETH pair.
    Sushi,
}

impl PoolId {
    /// All pools of the reference deployment.
    pub const ALL: [PoolId; 3] = [PoolId::Curve, PoolId::Balancer, PoolId::Sushi];

    /// Display name used in alert titles.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PoolId::Curve => "Curve",
            PoolId::Balancer => "Balancer",
            PoolId::Sushi => "Sushi",
        }
    }

    /// Prefix used to build alert ids.
    #[must_use]
    pub fn alert_prefix(&self) -> &'static str {
        match self {
            PoolId::Curve => "CURVE",
            PoolId::Balancer => "BALANCER",
            PoolId::Sushi => "SUSHI",
        }
    }

    /// Key prefix used in initialization summaries.
    #[must_use]
    pub fn summary_key(&self) -> &'static str {
        match self {
            PoolId::Curve => "curve",
            PoolId::Balancer => "balancer",
            PoolId::Sushi => "sushi",
        }
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reserve amounts of a pool's two sides, in raw token base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    /// First side as ordered by the pool contract.
    pub side_a: Decimal,
    /// Second side as ordered by the pool contract.
    pub side_b: Decimal,
}

impl PoolReserves {
    /// Creates a new reserve pair.
    #[must_use]
    pub fn new(side_a: Decimal, side_b: Decimal) -> Self {
        Self { side_a, side_b }
    }

    /// Sum of both sides.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.side_a + self.side_b
    }
}

/// Last observed composition of a pool.
///
/// `total` equals `side_a + side_b` whenever the size was taken from a
/// reserve snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolSize {
    /// Combined reserves.
    pub total: Decimal,
    /// First side.
    pub side_a: Decimal,
    /// Second side.
    pub side_b: Decimal,
}

impl From<PoolReserves> for PoolSize {
    fn from(reserves: PoolReserves) -> Self {
        Self {
            total: reserves.total(),
            side_a: reserves.side_a,
            side_b: reserves.side_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pool_size_from_reserves() {
        let size = PoolSize::from(PoolReserves::new(dec!(100), dec!(300)));
        assert_eq!(size.total, dec!(400));
        assert_eq!(size.total, size.side_a + size.side_b);
        assert_eq!(size.side_b, dec!(300));
    }

    #[test]
    fn test_default_size_is_empty() {
        let size = PoolSize::default();
        assert!(size.total.is_zero());
        assert!(size.side_a.is_zero() && size.side_b.is_zero());
    }

    #[test]
    fn test_pool_names() {
        assert_eq!(PoolId::Curve.to_string(), "Curve");
        assert_eq!(PoolId::Balancer.alert_prefix(), "BALANCER");
        assert_eq!(PoolId::Sushi.summary_key(), "sushi");
    }
}
