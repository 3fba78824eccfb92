//! Collapses alerts sharing an alert id.
//!
//! Groups keep the order in which their id first appears. A group with a
//! single alert passes through untouched, so merging an already merged
//! batch is a no-op. A larger group becomes one alert that keeps the name
//! and category of its first member, the highest severity of the group,
//! every distinct description, and the union of all metadata.

use pool_watch_domain::{Alert, AlertError};
use std::collections::HashMap;

/// Separator between distinct descriptions of a merged alert.
pub const DESCRIPTION_SEPARATOR: &str = "\n\n---\n\n";

/// Metadata key holding the number of merged alerts.
pub const OCCURRENCES_KEY: &str = "occurrences";

/// Merges `alerts` into one alert per distinct alert id.
///
/// # Errors
///
/// Returns `AlertError::MissingAlertId` if an alert has an empty id.
pub fn merge_alerts(alerts: Vec<Alert>) -> Result<Vec<Alert>, AlertError> {
    let mut groups: Vec<Vec<Alert>> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for alert in alerts {
        if alert.alert_id.trim().is_empty() {
            return Err(AlertError::MissingAlertId { name: alert.name });
        }
        match positions.get(&alert.alert_id) {
            Some(&index) => groups[index].push(alert),
            None => {
                positions.insert(alert.alert_id.clone(), groups.len());
                groups.push(vec![alert]);
            }
        }
    }

    Ok(groups.into_iter().filter_map(merge_group).collect())
}

fn merge_group(group: Vec<Alert>) -> Option<Alert> {
    let occurrences = group.len();
    let mut members = group.into_iter();
    let mut merged = members.next()?;
    if occurrences == 1 {
        return Some(merged);
    }

    let mut descriptions = vec![merged.description.clone()];
    for alert in members {
        merged.severity = merged.severity.max(alert.severity);
        if !descriptions.contains(&alert.description) {
            descriptions.push(alert.description);
        }
        for (key, value) in alert.metadata {
            merged.metadata.entry(key).or_insert(value);
        }
    }

    merged.description = format!(
        "{}\n\n({occurrences} occurrences)",
        descriptions.join(DESCRIPTION_SEPARATOR)
    );
    merged
        .metadata
        .insert(OCCURRENCES_KEY.to_string(), occurrences.to_string());
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_watch_domain::{AlertCategory, AlertSeverity};

    fn alert(id: &str, description: &str, severity: AlertSeverity) -> Alert {
        Alert::new(
            format!("{id} name"),
            description,
            id,
            severity,
            AlertCategory::Info,
        )
    }

    #[test]
    fn test_cyclic_batch_collapses_to_distinct_ids() {
        let ids = ["A", "B", "C"];
        let batch: Vec<Alert> = (0..51)
            .map(|i| alert(ids[i % 3], &format!("event {i}"), AlertSeverity::Info))
            .collect();

        let merged = merge_alerts(batch).unwrap();
        assert_eq!(merged.len(), 3);
        let merged_ids: Vec<_> = merged.iter().map(|a| a.alert_id.as_str()).collect();
        assert_eq!(merged_ids, ids);
        for alert in &merged {
            assert_eq!(alert.metadata[OCCURRENCES_KEY], "17");
            assert!(alert.description.ends_with("(17 occurrences)"));
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let batch = vec![
            alert("A", "one", AlertSeverity::Info),
            alert("A", "two", AlertSeverity::High),
            alert("B", "three", AlertSeverity::Medium),
        ];
        let once = merge_alerts(batch).unwrap();
        let twice = merge_alerts(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_group_keeps_highest_severity_and_distinct_descriptions() {
        let batch = vec![
            alert("A", "same", AlertSeverity::Info)
                .with_metadata("sizeBefore", "1")
                .with_metadata("shared", "first"),
            alert("A", "same", AlertSeverity::High).with_metadata("shared", "second"),
            alert("A", "other", AlertSeverity::Medium).with_metadata("sizeAfter", "2"),
        ];

        let merged = merge_alerts(batch).unwrap();
        assert_eq!(merged.len(), 1);
        let alert = &merged[0];
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.name, "A name");
        assert_eq!(
            alert.description,
            "same\n\n---\n\nother\n\n(3 occurrences)"
        );
        assert_eq!(alert.metadata["shared"], "first");
        assert_eq!(alert.metadata["sizeBefore"], "1");
        assert_eq!(alert.metadata["sizeAfter"], "2");
    }

    #[test]
    fn test_single_alert_unchanged() {
        let single = alert("A", "only", AlertSeverity::Medium);
        let merged = merge_alerts(vec![single.clone()]).unwrap();
        assert_eq!(merged, vec![single]);
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let batch = vec![alert("", "broken", AlertSeverity::Info)];
        assert!(matches!(
            merge_alerts(batch),
            Err(AlertError::MissingAlertId { .. })
        ));
    }

    #[test]
    fn test_empty_batch() {
        assert!(merge_alerts(Vec::new()).unwrap().is_empty());
    }
}
