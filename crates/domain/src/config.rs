use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Thresholds and suppression windows shared by all detectors.
///
/// Percentages are plain numbers (10 means 10%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Imbalance magnitude above which a pool is reported as imbalanced.
    pub imbalance_tolerance: Decimal,
    /// Width of the hysteresis band beyond the last reported imbalance.
    pub imbalance_change_tolerance: Decimal,
    /// Pool size change that triggers an informational alert.
    pub size_change_info_threshold: Decimal,
    /// Pool size change that escalates the alert to high severity.
    pub size_change_high_threshold: Decimal,
    /// Pool vs oracle price difference that triggers an alert.
    pub price_difference_threshold: Decimal,
    /// Suppression window for steady-state pool alerts in seconds.
    pub report_window_secs: u64,
    /// Fraction of the pool reserve used for the simulated price trade.
    pub price_trade_fraction: Decimal,
    /// How many blocks back the initial imbalance is sampled.
    pub init_lookback_blocks: u64,
    /// Minimum unused signing keys across node operators.
    pub min_available_keys: u64,
    /// Maximum buffered ether in the protocol, in ETH.
    pub max_buffered_eth: Decimal,
    /// Suppression window for DAO operations alerts in seconds.
    pub dao_report_window_secs: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            imbalance_tolerance: Decimal::from(10),
            imbalance_change_tolerance: Decimal::from(10),
            size_change_info_threshold: Decimal::from(7),
            size_change_high_threshold: Decimal::from(10),
            price_difference_threshold: Decimal::from(5),
            report_window_secs: 60 * 60 * 24,       // 24 hours
            price_trade_fraction: Decimal::new(1, 3), // 0.1%
            init_lookback_blocks: 24,               // ~5 minutes of 13s blocks
            min_available_keys: 1000,
            max_buffered_eth: Decimal::from(5000),
            dao_report_window_secs: 60 * 60 * 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_thresholds_are_ordered() {
        let config = DetectionConfig::default();
        assert!(config.size_change_info_threshold < config.size_change_high_threshold);
        assert_eq!(config.price_trade_fraction, dec!(0.001));
        assert_eq!(config.report_window_secs, 86_400);
    }
}
