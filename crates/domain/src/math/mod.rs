//! Decimal math used by the detectors.

/// Imbalance and change percentages.
pub mod imbalance;

pub use imbalance::{describe_change, describe_imbalance, percent_change, percent_imbalance};
