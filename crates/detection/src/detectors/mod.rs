use crate::error::DetectionError;
use async_trait::async_trait;
use pool_watch_domain::{Alert, BlockHeader};
use std::collections::BTreeMap;

/// DAO operations detectors.
pub mod dao;
/// Per-pool imbalance and size detector.
pub mod pool;
/// Pool vs oracle price detector.
pub mod price;

pub use dao::{BufferedEthDetector, OperatorKeysDetector};
pub use pool::PoolDetector;
pub use price::PriceDivergenceDetector;

/// Key/value summary returned by [`Detector::initialize`].
pub type InitSummary = BTreeMap<String, String>;

/// A stateful detector driven once per block.
///
/// A failed call leaves the detector's state as it was before the call.
#[async_trait]
pub trait Detector: Send {
    /// Name used in logs and cycle failure reports.
    fn name(&self) -> &str;

    /// Seeds the detector state from the chain at `block` without alerting.
    async fn initialize(&mut self, block: &BlockHeader) -> Result<InitSummary, DetectionError>;

    /// Evaluates `block` and returns the alerts it triggers.
    async fn handle_block(&mut self, block: &BlockHeader) -> Result<Vec<Alert>, DetectionError>;
}
