//! One detection cycle per block.
//!
//! Every detector runs concurrently on the same block. The merge happens
//! only after all of them finished, and a failing detector never hides the
//! alerts of the others.

use crate::detectors::{
    BufferedEthDetector, Detector, InitSummary, OperatorKeysDetector, PoolDetector,
    PriceDivergenceDetector,
};
use crate::error::DetectionError;
use crate::merge::merge_alerts;
use futures::future::join_all;
use pool_watch_domain::{Alert, BlockHeader, DetectionConfig, PoolId};
use pool_watch_protocols::{DaoStateReader, PoolStateReader, PriceFeed};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of one detection cycle.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Merged alerts of every detector that completed.
    pub alerts: Vec<Alert>,
    /// Detectors whose cycle was aborted, with the reason.
    pub failures: Vec<(String, DetectionError)>,
}

/// Runs a set of detectors block by block.
pub struct DetectionCycle {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectionCycle {
    /// Creates a cycle over `detectors`.
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// Builds the full detector set of the reference deployment on one chain
    /// reader: a detector per pool, the Sushi price check and the DAO checks.
    pub fn with_reader<R>(reader: Arc<R>, config: DetectionConfig) -> Self
    where
        R: PoolStateReader + PriceFeed + DaoStateReader + 'static,
    {
        let pools: Arc<dyn PoolStateReader> = reader.clone();
        let feed: Arc<dyn PriceFeed> = reader.clone();
        let dao: Arc<dyn DaoStateReader> = reader;

        let mut detectors: Vec<Box<dyn Detector>> = PoolId::ALL
            .iter()
            .map(|&pool| {
                Box::new(PoolDetector::new(pool, pools.clone(), config.clone()))
                    as Box<dyn Detector>
            })
            .collect();
        detectors.push(Box::new(PriceDivergenceDetector::new(
            pools,
            feed,
            config.clone(),
        )));
        detectors.push(Box::new(OperatorKeysDetector::new(dao.clone(), &config)));
        detectors.push(Box::new(BufferedEthDetector::new(dao, &config)));

        Self::new(detectors)
    }

    /// Names of the registered detectors.
    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Seeds every detector from the chain at `block`.
    ///
    /// # Errors
    ///
    /// Returns the first detector error; seeding is all or nothing for the
    /// caller even though detectors that succeeded keep their new state.
    pub async fn initialize(&mut self, block: &BlockHeader) -> Result<InitSummary, DetectionError> {
        let results = join_all(
            self.detectors
                .iter_mut()
                .map(|detector| detector.initialize(block)),
        )
        .await;

        let mut summary = InitSummary::new();
        for result in results {
            summary.extend(result?);
        }
        info!(block = block.number, entries = summary.len(), "Detectors initialized");
        Ok(summary)
    }

    /// Evaluates `block` on every detector and merges their alerts.
    ///
    /// # Errors
    ///
    /// Returns `DetectionError::Merge` if a detector produced an alert
    /// without id.
    pub async fn handle_block(&mut self, block: &BlockHeader) -> Result<CycleOutcome, DetectionError> {
        let results = join_all(self.detectors.iter_mut().map(|detector| async move {
            let result = detector.handle_block(block).await;
            (detector.name().to_string(), result)
        }))
        .await;

        let mut alerts = Vec::new();
        let mut failures = Vec::new();
        for (name, result) in results {
            match result {
                Ok(found) => alerts.extend(found),
                Err(err) => {
                    warn!(detector = %name, block = block.number, error = %err, "Detector failed");
                    failures.push((name, err));
                }
            }
        }

        let raw = alerts.len();
        let alerts = merge_alerts(alerts).map_err(|err| {
            error!(block = block.number, error = %err, "Alert batch is inconsistent");
            err
        })?;
        debug!(
            block = block.number,
            raw,
            merged = alerts.len(),
            failures = failures.len(),
            "Cycle finished"
        );

        Ok(CycleOutcome { alerts, failures })
    }
}
