//! Alert record emitted by detectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity of an alert, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// Informational.
    Info,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
    /// Critical.
    Critical,
}

/// Category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertCategory {
    /// Expected but noteworthy change.
    Info,
    /// Possibly malicious or dangerous state.
    Suspicious,
    /// Degraded operation of a monitored component.
    Degraded,
}

/// An alert produced by a detector.
///
/// Alerts are immutable once built; a batch of alerts is what a detection
/// cycle returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Short title.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Stable identifier shared by alerts of the same kind.
    pub alert_id: String,
    /// Severity.
    pub severity: AlertSeverity,
    /// Category.
    pub category: AlertCategory,
    /// Extra key/value data for downstream consumers.
    pub metadata: BTreeMap<String, String>,
}

impl Alert {
    /// Creates a new alert without metadata.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        alert_id: impl Into<String>,
        severity: AlertSeverity,
        category: AlertCategory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            alert_id: alert_id.into(),
            severity,
            category,
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Uppercases the first character of a sentence.
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_creation() {
        let alert = Alert::new(
            "Curve Pool is imbalanced",
            "There are 12.00% more of stETH than ETH in the pool",
            "CURVE-POOL-IMBALANCE",
            AlertSeverity::High,
            AlertCategory::Suspicious,
        )
        .with_metadata("imbalance", "12");

        assert_eq!(alert.alert_id, "CURVE-POOL-IMBALANCE");
        assert_eq!(alert.metadata.get("imbalance").map(String::as_str), Some("12"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(AlertSeverity::Info < AlertSeverity::Medium);
        assert!(AlertSeverity::Medium < AlertSeverity::High);
        assert!(AlertSeverity::High < AlertSeverity::Critical);
    }

    #[test]
    fn test_alert_serializes_camel_case() {
        let alert = Alert::new(
            "High buffered ETH amount",
            "There are 6000.0000 buffered ETH in DAO",
            "HIGH_BUFFERED_ETH",
            AlertSeverity::Medium,
            AlertCategory::Info,
        );
        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"alertId\":\"HIGH_BUFFERED_ETH\""));
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("there are"), "There are");
        assert_eq!(capitalize_first(""), "");
    }
}
