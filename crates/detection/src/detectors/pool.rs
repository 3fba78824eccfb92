//! Per-pool state machine.
//!
//! Every cycle reads the pool once and runs three checks against the state
//! left by the previous cycle:
//! - Imbalance beyond tolerance, at most once per suppression window
//! - Rapid change, whenever the imbalance leaves the hysteresis band around
//!   the last reported imbalance
//! - Size change since the previous block
//!
//! The new state is committed only after every read of the cycle succeeded.

use super::{Detector, InitSummary};
use crate::error::DetectionError;
use crate::snapshot::PoolSnapshotFetcher;
use crate::state::DetectorState;
use async_trait::async_trait;
use pool_watch_domain::math::{describe_change, describe_imbalance, percent_change};
use pool_watch_domain::{
    Alert, AlertCategory, AlertSeverity, BlockHeader, DetectionConfig, MathError, PoolId,
    PoolSize, capitalize_first,
};
use pool_watch_protocols::PoolStateReader;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tolerance interval around the last reported imbalance.
///
/// Bounds are `-sign(last) * tolerance` and
/// `last + change_tolerance * sign(last)`, sorted. A zero `last` collapses
/// the band to `[0, 0]`.
#[must_use]
pub fn hysteresis_band(
    last_reported: Decimal,
    tolerance: Decimal,
    change_tolerance: Decimal,
) -> (Decimal, Decimal) {
    let sign = if last_reported > Decimal::ZERO {
        Decimal::ONE
    } else if last_reported < Decimal::ZERO {
        Decimal::NEGATIVE_ONE
    } else {
        Decimal::ZERO
    };
    let first = -sign * tolerance;
    let second = last_reported + change_tolerance * sign;
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

/// Labels of the side in excess for a positive and a negative imbalance.
fn imbalance_labels(pool: PoolId) -> Option<(&'static str, &'static str)> {
    match pool {
        PoolId::Curve => Some(("stETH", "ETH")),
        PoolId::Balancer => Some(("wstETH (recounted to stETH)", "ETH")),
        PoolId::Sushi => None,
    }
}

/// Token of one pool side and the infix of its size metadata keys.
#[derive(Debug, Clone, Copy)]
struct SideLabel {
    token: &'static str,
    key: &'static str,
}

impl SideLabel {
    const fn new(token: &'static str, key: &'static str) -> Self {
        Self { token, key }
    }
}

/// Sides of pools whose sizes are tracked separately.
fn side_labels(pool: PoolId) -> Option<(SideLabel, SideLabel)> {
    match pool {
        PoolId::Sushi => Some((
            SideLabel::new("DAI", "DAI"),
            SideLabel::new("wstETH", "WstETH"),
        )),
        PoolId::Curve | PoolId::Balancer => None,
    }
}

/// Imbalance, rapid change and size detector for one pool.
pub struct PoolDetector {
    pool: PoolId,
    name: String,
    fetcher: PoolSnapshotFetcher,
    config: DetectionConfig,
    state: DetectorState,
}

impl PoolDetector {
    /// Creates a detector for `pool` with an empty state.
    pub fn new(pool: PoolId, reader: Arc<dyn PoolStateReader>, config: DetectionConfig) -> Self {
        Self {
            pool,
            name: format!("{}Pool", pool.name()),
            fetcher: PoolSnapshotFetcher::new(reader),
            config,
            state: DetectorState::default(),
        }
    }

    /// Replaces the detector state.
    #[must_use]
    pub fn with_state(mut self, state: DetectorState) -> Self {
        self.state = state;
        self
    }

    /// Monitored pool.
    #[must_use]
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    fn check_imbalance(
        &self,
        imbalance: Decimal,
        now: u64,
        (label_a, label_b): (&str, &str),
        alerts: &mut Vec<Alert>,
    ) -> bool {
        let pool = self.pool.name();
        let prefix = self.pool.alert_prefix();
        let mut reported = false;

        if self.state.can_report(now, self.config.report_window_secs)
            && imbalance.abs() > self.config.imbalance_tolerance
        {
            info!(pool = %self.pool, imbalance = %imbalance, "Pool is imbalanced");
            alerts.push(
                Alert::new(
                    format!("{pool} Pool is imbalanced"),
                    capitalize_first(&describe_imbalance(imbalance, label_a, label_b)),
                    format!("{prefix}-POOL-IMBALANCE"),
                    AlertSeverity::High,
                    AlertCategory::Suspicious,
                )
                .with_metadata("imbalance", imbalance.to_string()),
            );
            reported = true;
        }

        let last = self.state.last_reported_imbalance;
        let (lower, upper) = hysteresis_band(
            last,
            self.config.imbalance_tolerance,
            self.config.imbalance_change_tolerance,
        );
        if imbalance < lower || imbalance > upper {
            info!(
                pool = %self.pool,
                from = %last,
                to = %imbalance,
                "Rapid imbalance change"
            );
            alerts.push(
                Alert::new(
                    format!("{pool} Pool rapid imbalance change"),
                    format!(
                        "{pool} Pool imbalance has changed from {} to {} since the last alert!",
                        describe_imbalance(last, label_a, label_b),
                        describe_imbalance(imbalance, label_a, label_b)
                    ),
                    format!("{prefix}-POOL-IMBALANCE-RAPID-CHANGE"),
                    AlertSeverity::High,
                    AlertCategory::Suspicious,
                )
                .with_metadata("imbalanceBefore", last.to_string())
                .with_metadata("imbalanceAfter", imbalance.to_string()),
            );
            reported = true;
        }

        reported
    }

    fn check_total_size(&self, current: &PoolSize, alerts: &mut Vec<Alert>) -> Result<(), MathError> {
        let before = self.state.pool_size.total;
        if before.is_zero() {
            warn!(pool = %self.pool, "No pool size baseline, skipping size check");
            return Ok(());
        }

        let change = percent_change(before, current.total)?;
        debug!(pool = %self.pool, change = %change, "Pool size change");
        if change.abs() <= self.config.size_change_info_threshold {
            return Ok(());
        }

        let severity = if change.abs() > self.config.size_change_high_threshold {
            AlertSeverity::High
        } else {
            AlertSeverity::Info
        };
        let pool = self.pool.name();
        info!(pool = %self.pool, change = %change, severity = ?severity, "Pool size changed");
        alerts.push(
            Alert::new(
                format!("Significant {pool} Pool size change"),
                format!(
                    "{pool} Pool size has {}% since the last block",
                    describe_change(change)
                ),
                format!("{}-POOL-SIZE-CHANGE", self.pool.alert_prefix()),
                severity,
                AlertCategory::Info,
            )
            .with_metadata("sizeBefore", before.to_string())
            .with_metadata("sizeAfter", current.total.to_string()),
        );
        Ok(())
    }

    fn check_side_sizes(
        &self,
        current: &PoolSize,
        (side_a, side_b): (SideLabel, SideLabel),
        alerts: &mut Vec<Alert>,
    ) -> Result<(), MathError> {
        let previous = &self.state.pool_size;
        let sides = [
            (side_a, previous.side_a, current.side_a),
            (side_b, previous.side_b, current.side_b),
        ];

        for (side, before, after) in sides {
            let label = side.token;
            if before.is_zero() {
                warn!(pool = %self.pool, side = label, "No side size baseline, skipping size check");
                continue;
            }
            let change = percent_change(before, after)?;
            debug!(pool = %self.pool, side = label, change = %change, "Pool side size change");
            if change.abs() <= self.config.size_change_high_threshold {
                continue;
            }

            let pool = self.pool.name();
            info!(pool = %self.pool, side = label, change = %change, "Pool side size changed");
            alerts.push(
                Alert::new(
                    format!("Significant {pool} Pool size change"),
                    format!(
                        "{pool} Pool size ({label} part) has {}% since the last block",
                        describe_change(change)
                    ),
                    format!("{}-POOL-SIZE-CHANGE", self.pool.alert_prefix()),
                    AlertSeverity::High,
                    AlertCategory::Info,
                )
                .with_metadata(format!("size{}Before", side.key), before.to_string())
                .with_metadata(format!("size{}After", side.key), after.to_string()),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl Detector for PoolDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&mut self, block: &BlockHeader) -> Result<InitSummary, DetectionError> {
        let reserves = self.fetcher.reserves(self.pool, Some(block.number)).await?;
        let size = PoolSize::from(reserves);

        let seed_imbalance = if imbalance_labels(self.pool).is_some() {
            let lookback = Some(block.number_before(self.config.init_lookback_blocks));
            self.fetcher.snapshot(self.pool, lookback).await?.imbalance
        } else {
            None
        };

        let key = self.pool.summary_key();
        let mut summary = InitSummary::new();
        let mut state = DetectorState {
            pool_size: size,
            ..self.state
        };
        summary.insert(format!("{key}PoolSize"), size.total.to_string());

        if let Some(imbalance) = seed_imbalance {
            state.last_reported_imbalance = imbalance;
            // An imbalance already present before start counts as reported.
            if imbalance.abs() > self.config.imbalance_tolerance {
                state.last_reported_at = Some(block.timestamp);
            }
            summary.insert(format!("{key}PoolImbalance"), imbalance.to_string());
        }

        self.state = state;
        info!(
            pool = %self.pool,
            block = block.number,
            size = %size.total,
            imbalance = ?seed_imbalance,
            "Pool detector initialized"
        );
        Ok(summary)
    }

    async fn handle_block(&mut self, block: &BlockHeader) -> Result<Vec<Alert>, DetectionError> {
        let snapshot = self.fetcher.snapshot(self.pool, Some(block.number)).await?;
        let current = PoolSize::from(snapshot.reserves);
        let mut alerts = Vec::new();
        let mut next = DetectorState {
            pool_size: current,
            ..self.state
        };

        if let (Some(imbalance), Some(labels)) = (snapshot.imbalance, imbalance_labels(self.pool)) {
            debug!(pool = %self.pool, block = block.number, imbalance = %imbalance, "Pool imbalance");
            if self.check_imbalance(imbalance, block.timestamp, labels, &mut alerts) {
                next = next.reported(block.timestamp, imbalance);
            }
        }

        match side_labels(self.pool) {
            Some(labels) => self.check_side_sizes(&current, labels, &mut alerts)?,
            None => self.check_total_size(&current, &mut alerts)?,
        }

        self.state = next;
        Ok(alerts)
    }
}
