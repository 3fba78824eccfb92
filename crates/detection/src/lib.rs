//! Stateful detection engine for staked-ETH liquidity pools.
//!
//! This crate turns chain reads into alerts, block by block:
//! - Per-pool imbalance, rapid-change and size-change detection
//! - Pool price vs oracle price divergence
//! - DAO operations checks (signing keys, buffered ether)
//! - Alert merging
//! - A detection cycle that runs every detector concurrently

/// Prelude module for convenient imports.
pub mod prelude;

/// Detection cycle orchestration.
pub mod cycle;
/// Detector implementations.
pub mod detectors;
/// Detection errors.
pub mod error;
/// Alert merging.
pub mod merge;
/// Oracle price reads.
pub mod oracle;
/// Pool reserve snapshots.
pub mod snapshot;
/// Per-detector memory.
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
