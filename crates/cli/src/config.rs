//! Runtime configuration read from the environment.
//!
//! `.env` is loaded first; command line flags override what is read here.

use anyhow::{Context, Result, anyhow};
use pool_watch_domain::DetectionConfig;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Default delay between two chain head polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 12;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: Option<String>,
    /// Delay between two chain head polls in seconds.
    pub poll_interval_secs: u64,
    /// Emit logs as JSON.
    pub json_logs: bool,
    /// Detector thresholds.
    pub detection: DetectionConfig,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `get`, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = DetectionConfig::default();
        let decimal = |key: &str, default: Decimal| -> Result<Decimal> {
            parse_or(&get, key, default)
        };
        let integer =
            |key: &str, default: u64| -> Result<u64> { parse_or(&get, key, default) };

        let detection = DetectionConfig {
            imbalance_tolerance: decimal("IMBALANCE_TOLERANCE", defaults.imbalance_tolerance)?,
            imbalance_change_tolerance: decimal(
                "IMBALANCE_CHANGE_TOLERANCE",
                defaults.imbalance_change_tolerance,
            )?,
            size_change_info_threshold: decimal(
                "POOL_SIZE_CHANGE_TOLERANCE_INFO",
                defaults.size_change_info_threshold,
            )?,
            size_change_high_threshold: decimal(
                "POOL_SIZE_CHANGE_TOLERANCE_HIGH",
                defaults.size_change_high_threshold,
            )?,
            price_difference_threshold: decimal(
                "PRICE_DIFFERENCE_THRESHOLD",
                defaults.price_difference_threshold,
            )?,
            report_window_secs: integer("POOLS_BALANCES_REPORT_WINDOW", defaults.report_window_secs)?,
            price_trade_fraction: decimal("PRICE_TRADE_FRACTION", defaults.price_trade_fraction)?,
            init_lookback_blocks: integer("INIT_LOOKBACK_BLOCKS", defaults.init_lookback_blocks)?,
            min_available_keys: integer("MIN_AVAILABLE_KEYS_COUNT", defaults.min_available_keys)?,
            max_buffered_eth: decimal("MAX_BUFFERED_ETH_AMOUNT", defaults.max_buffered_eth)?,
            dao_report_window_secs: integer(
                "DAO_REPORT_WINDOW",
                defaults.dao_report_window_secs,
            )?,
        };

        if detection.size_change_info_threshold > detection.size_change_high_threshold {
            return Err(anyhow!(
                "POOL_SIZE_CHANGE_TOLERANCE_INFO ({}) exceeds POOL_SIZE_CHANGE_TOLERANCE_HIGH ({})",
                detection.size_change_info_threshold,
                detection.size_change_high_threshold
            ));
        }

        Ok(Self {
            rpc_url: get("RPC_URL").filter(|url| !url.trim().is_empty()),
            poll_interval_secs: parse_or(&get, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            json_logs: parse_or(&get, "LOG_JSON", false)?,
            detection,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}
