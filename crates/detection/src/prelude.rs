//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use pool_watch_detection::prelude::*;
//! ```

pub use crate::cycle::{CycleOutcome, DetectionCycle};
pub use crate::detectors::{
    BufferedEthDetector, Detector, OperatorKeysDetector, PoolDetector, PriceDivergenceDetector,
};
pub use crate::error::DetectionError;
pub use crate::merge::merge_alerts;
pub use crate::oracle::PriceOracleFetcher;
pub use crate::snapshot::{PoolSnapshot, PoolSnapshotFetcher};
pub use crate::state::DetectorState;
