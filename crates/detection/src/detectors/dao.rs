//! Staking protocol operations checks.

use super::{Detector, InitSummary};
use crate::error::DetectionError;
use crate::state::window_elapsed;
use async_trait::async_trait;
use futures::future::join_all;
use pool_watch_domain::value_objects::scale_down;
use pool_watch_domain::{Alert, AlertCategory, AlertSeverity, BlockHeader, DetectionConfig};
use pool_watch_protocols::DaoStateReader;
use pool_watch_protocols::constants::ETH_DECIMALS;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{debug, info};

/// Alerts when node operators run short of unused signing keys.
pub struct OperatorKeysDetector {
    reader: Arc<dyn DaoStateReader>,
    min_available_keys: u64,
    window_secs: u64,
    last_reported_at: Option<u64>,
}

impl OperatorKeysDetector {
    /// Creates a detector alerting below `config.min_available_keys`.
    pub fn new(reader: Arc<dyn DaoStateReader>, config: &DetectionConfig) -> Self {
        Self {
            reader,
            min_available_keys: config.min_available_keys,
            window_secs: config.dao_report_window_secs,
            last_reported_at: None,
        }
    }

    /// Sum of unused signing keys over all active operators at `block`.
    async fn available_keys(&self, block: Option<u64>) -> Result<u64, DetectionError> {
        let operators = self.reader.active_node_operators(block).await?;
        let counts = join_all(
            (0..operators).map(|operator| self.reader.unused_signing_keys(operator, block)),
        )
        .await;

        let mut total: u64 = 0;
        for count in counts {
            total = total.saturating_add(count?);
        }
        debug!(operators, keys = total, "Available signing keys");
        Ok(total)
    }
}

#[async_trait]
impl Detector for OperatorKeysDetector {
    fn name(&self) -> &str {
        "OperatorKeys"
    }

    async fn initialize(&mut self, _block: &BlockHeader) -> Result<InitSummary, DetectionError> {
        Ok(InitSummary::new())
    }

    async fn handle_block(&mut self, block: &BlockHeader) -> Result<Vec<Alert>, DetectionError> {
        if !window_elapsed(self.last_reported_at, block.timestamp, self.window_secs) {
            return Ok(Vec::new());
        }

        let keys = self.available_keys(Some(block.number)).await?;
        if keys >= self.min_available_keys {
            return Ok(Vec::new());
        }

        info!(keys, minimum = self.min_available_keys, "Few available signing keys");
        self.last_reported_at = Some(block.timestamp);
        Ok(vec![
            Alert::new(
                "Few available keys count",
                format!("There are only {keys} available keys left"),
                "LOW_OPERATORS_AVAILABLE_KEYS_NUM",
                AlertSeverity::Medium,
                AlertCategory::Info,
            )
            .with_metadata("availableKeys", keys.to_string()),
        ])
    }
}

/// Alerts when too much ether waits in the protocol buffer.
pub struct BufferedEthDetector {
    reader: Arc<dyn DaoStateReader>,
    max_buffered_eth: Decimal,
    window_secs: u64,
    last_reported_at: Option<u64>,
}

impl BufferedEthDetector {
    /// Creates a detector alerting above `config.max_buffered_eth` ether.
    pub fn new(reader: Arc<dyn DaoStateReader>, config: &DetectionConfig) -> Self {
        Self {
            reader,
            max_buffered_eth: config.max_buffered_eth,
            window_secs: config.dao_report_window_secs,
            last_reported_at: None,
        }
    }
}

#[async_trait]
impl Detector for BufferedEthDetector {
    fn name(&self) -> &str {
        "BufferedEth"
    }

    async fn initialize(&mut self, _block: &BlockHeader) -> Result<InitSummary, DetectionError> {
        Ok(InitSummary::new())
    }

    async fn handle_block(&mut self, block: &BlockHeader) -> Result<Vec<Alert>, DetectionError> {
        if !window_elapsed(self.last_reported_at, block.timestamp, self.window_secs) {
            return Ok(Vec::new());
        }

        let wei = self.reader.buffered_ether(Some(block.number)).await?;
        let buffered = scale_down(wei, ETH_DECIMALS)?;
        debug!(buffered = %buffered, "Buffered ether");
        if buffered <= self.max_buffered_eth {
            return Ok(Vec::new());
        }

        let shown = buffered.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
        info!(buffered = %shown, "High buffered ether");
        self.last_reported_at = Some(block.timestamp);
        Ok(vec![
            Alert::new(
                "High buffered ETH amount",
                format!("There are {shown:.4} buffered ETH in DAO"),
                "HIGH_BUFFERED_ETH",
                AlertSeverity::Medium,
                AlertCategory::Info,
            )
            .with_metadata("bufferedEth", buffered.to_string()),
        ])
    }
}
