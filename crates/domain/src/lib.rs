//! Domain types for the pool balance monitor.
//!
//! This crate holds everything the detectors reason about, free of I/O:
//! - The alert record emitted by every detector
//! - Block headers used as the detection clock
//! - Pool identifiers, reserve snapshots and tracked pool sizes
//! - Detection thresholds
//! - Decimal percentage math

/// Alert record and its classification.
pub mod alert;
/// Block header used as the detection clock.
pub mod block;
/// Detection thresholds and suppression windows.
pub mod config;
/// Error types.
pub mod error;
/// Percentage math on decimals.
pub mod math;
/// Pool identifiers, reserves and sizes.
pub mod pool;
/// Conversions between raw on-chain integers and decimals.
pub mod value_objects;

pub use alert::{Alert, AlertCategory, AlertSeverity, capitalize_first};
pub use block::BlockHeader;
pub use config::DetectionConfig;
pub use error::{AlertError, MathError};
pub use pool::{PoolId, PoolReserves, PoolSize};
pub use value_objects::Percentage;
