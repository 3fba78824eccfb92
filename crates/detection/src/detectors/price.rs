//! Pool price vs oracle price.
//!
//! The pool price is the DAI a swap needs to buy a small test amount of
//! wstETH, per wstETH. The oracle quotes stETH, so its price is recounted to
//! wstETH through the unwrap rate of the same test amount.

use super::{Detector, InitSummary};
use crate::error::DetectionError;
use crate::oracle::PriceOracleFetcher;
use crate::state::window_elapsed;
use async_trait::async_trait;
use pool_watch_domain::math::percent_change;
use pool_watch_domain::{
    Alert, AlertCategory, AlertSeverity, BlockHeader, DetectionConfig, MathError, Percentage,
    PoolId,
};
use pool_watch_protocols::{PoolStateReader, PriceFeed};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{debug, info, warn};

fn two_decimals(price: Decimal) -> String {
    format!(
        "{:.2}",
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Compares the Sushi wstETH price against the stETH/USD feed.
pub struct PriceDivergenceDetector {
    pool: PoolId,
    reader: Arc<dyn PoolStateReader>,
    oracle: PriceOracleFetcher,
    config: DetectionConfig,
    last_reported_at: Option<u64>,
}

impl PriceDivergenceDetector {
    /// Creates a detector for the Sushi pool.
    pub fn new(
        reader: Arc<dyn PoolStateReader>,
        feed: Arc<dyn PriceFeed>,
        config: DetectionConfig,
    ) -> Self {
        Self {
            pool: PoolId::Sushi,
            reader,
            oracle: PriceOracleFetcher::new(feed),
            config,
            last_reported_at: None,
        }
    }

    /// Block timestamp of the last alert.
    #[must_use]
    pub fn last_reported_at(&self) -> Option<u64> {
        self.last_reported_at
    }
}

#[async_trait]
impl Detector for PriceDivergenceDetector {
    fn name(&self) -> &str {
        "SushiPrice"
    }

    async fn initialize(&mut self, _block: &BlockHeader) -> Result<InitSummary, DetectionError> {
        Ok(InitSummary::new())
    }

    async fn handle_block(&mut self, block: &BlockHeader) -> Result<Vec<Alert>, DetectionError> {
        if !window_elapsed(
            self.last_reported_at,
            block.timestamp,
            self.config.report_window_secs,
        ) {
            return Ok(Vec::new());
        }

        let at = Some(block.number);
        let reserves = self.reader.pool_reserves(self.pool, at).await?;
        let test_amount = reserves
            .side_b
            .checked_mul(self.config.price_trade_fraction)
            .ok_or(MathError::Overflow)?
            .trunc();
        if test_amount.is_zero() {
            warn!(pool = %self.pool, reserve = %reserves.side_b, "Reserve too small for a test trade");
            return Ok(Vec::new());
        }

        let dai_in = self.reader.simulate_trade(self.pool, test_amount, at).await?;
        let underlying = self.reader.unwrap_to_underlying(test_amount, at).await?;
        let reference = self.oracle.reference_price(at).await?;

        let pool_price = dai_in
            .checked_div(test_amount)
            .ok_or(MathError::Overflow)?;
        let unwrap_rate = underlying
            .checked_div(test_amount)
            .ok_or(MathError::Overflow)?;
        let feed_price = reference
            .checked_mul(unwrap_rate)
            .ok_or(MathError::Overflow)?;
        let difference = percent_change(feed_price, pool_price)?;
        debug!(
            pool_price = %pool_price,
            feed_price = %feed_price,
            difference = %difference,
            "wstETH price comparison"
        );

        if difference.abs() <= self.config.price_difference_threshold {
            return Ok(Vec::new());
        }

        info!(difference = %difference, "wstETH price diverges from feed");
        let direction = if difference > Decimal::ZERO {
            "higher"
        } else {
            "lower"
        };
        let alert = Alert::new(
            "Significant wstETH price difference between Sushi pool and chainlink feed",
            format!(
                "wstETH price in pool ({}) is {}% {direction} than chainlink feed ({})",
                two_decimals(pool_price),
                Percentage(difference.abs()),
                two_decimals(feed_price)
            ),
            "BAD-SUSHI-PRICE",
            AlertSeverity::Medium,
            AlertCategory::Suspicious,
        )
        .with_metadata("poolPrice", pool_price.to_string())
        .with_metadata("feedPrice", feed_price.to_string())
        .with_metadata("difference", Percentage(difference).to_string());

        self.last_reported_at = Some(block.timestamp);
        Ok(vec![alert])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockChain;
    use pool_watch_domain::PoolReserves;
    use pool_watch_protocols::OraclePrice;
    use rust_decimal_macros::dec;

    /// Sushi pool pricing wstETH at about 2200 DAI with 1 wstETH = 1.1 stETH.
    fn chain(feed_usd: i64) -> Arc<MockChain> {
        let chain = MockChain::new();
        chain.set_reserves(
            PoolId::Sushi,
            1,
            PoolReserves::new(dec!(22000000000), dec!(10000000)),
        );
        chain.set_unwrap_rate(dec!(1.1));
        chain.set_price(OraclePrice {
            answer: Decimal::from(feed_usd) * dec!(100000000),
            decimals: 8,
        });
        chain
    }

    fn detector(chain: &Arc<MockChain>) -> PriceDivergenceDetector {
        PriceDivergenceDetector::new(chain.clone(), chain.clone(), DetectionConfig::default())
    }

    #[tokio::test]
    async fn test_consistent_price_is_quiet() {
        // 2000 USD per stETH * 1.1 = 2200 per wstETH
        let chain = chain(2000);
        let mut detector = detector(&chain);

        let alerts = detector.handle_block(&BlockHeader::new(1, 100)).await.unwrap();
        assert!(alerts.is_empty());
        assert_eq!(detector.last_reported_at(), None);
    }

    #[tokio::test]
    async fn test_pool_price_is_cost_of_buying_test_amount() {
        // Buying 10_000 wstETH costs 22_088_287 DAI against a 2200 feed
        let chain = chain(2000);
        let mut detector = PriceDivergenceDetector::new(
            chain.clone(),
            chain.clone(),
            DetectionConfig {
                price_difference_threshold: dec!(0.1),
                ..Default::default()
            },
        );

        let alerts = detector.handle_block(&BlockHeader::new(1, 100)).await.unwrap();
        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(
            alert.description,
            "wstETH price in pool (2208.83) is 0.40% higher than chainlink feed (2200.00)"
        );
        assert_eq!(alert.metadata["poolPrice"], "2208.8287");
        assert_eq!(alert.metadata["difference"], "0.40");
        assert_eq!(detector.last_reported_at(), Some(100));
    }

    #[tokio::test]
    async fn test_divergent_price_alerts_and_suppresses() {
        // Feed recounted to wstETH is 2750, the pool charges about 2209
        let chain = chain(2500);
        let mut detector = detector(&chain);

        let alerts = detector.handle_block(&BlockHeader::new(1, 100)).await.unwrap();
        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.alert_id, "BAD-SUSHI-PRICE");
        assert_eq!(alert.severity, AlertSeverity::Medium);
        assert_eq!(
            alert.description,
            "wstETH price in pool (2208.83) is 19.68% lower than chainlink feed (2750.00)"
        );
        assert_eq!(detector.last_reported_at(), Some(100));

        let alerts = detector.handle_block(&BlockHeader::new(1, 200)).await.unwrap();
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_failed_read_keeps_timer() {
        let chain = chain(2500);
        let mut detector = detector(&chain);
        chain.fail_reads(true);

        assert!(detector.handle_block(&BlockHeader::new(1, 100)).await.is_err());
        assert_eq!(detector.last_reported_at(), None);
    }
}
