use crate::error::DetectionError;
use pool_watch_domain::value_objects::scale_down;
use pool_watch_protocols::PriceFeed;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Reads the reference price from a [`PriceFeed`].
#[derive(Clone)]
pub struct PriceOracleFetcher {
    feed: Arc<dyn PriceFeed>,
}

impl PriceOracleFetcher {
    /// Creates a fetcher over `feed`.
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self { feed }
    }

    /// Feed answer at `block` divided by `10^decimals`.
    pub async fn reference_price(&self, block: Option<u64>) -> Result<Decimal, DetectionError> {
        let price = self.feed.latest_price(block).await?;
        Ok(scale_down(price.answer, price.decimals)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockChain;
    use pool_watch_protocols::OraclePrice;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_reference_price_applies_decimals() {
        let chain = MockChain::new();
        chain.set_price(OraclePrice {
            answer: dec!(200012345678),
            decimals: 8,
        });
        let oracle = PriceOracleFetcher::new(chain);

        assert_eq!(
            oracle.reference_price(Some(1)).await.unwrap(),
            dec!(2000.12345678)
        );
    }
}
