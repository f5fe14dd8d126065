//! Price source trait and the primary/fallback feed.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::prelude::*;
use crate::types::PriceSnapshot;

/// A provider of USD prices keyed by collateral symbol.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Fetch prices for `symbols`. Symbols the provider does not know are omitted.
    async fn fetch(&self, symbols: &[String]) -> Result<PriceSnapshot>;
}

#[async_trait]
impl PriceSource for Box<dyn PriceSource> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch(&self, symbols: &[String]) -> Result<PriceSnapshot> {
        (**self).fetch(symbols).await
    }
}

/// Where the latest refresh got its prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Primary,
    Fallback,
    /// Both sources failed; previous prices kept
    Stale,
}

/// One-shot price refresh: primary source first, fallback on failure.
pub struct FallbackPriceFeed {
    primary: Box<dyn PriceSource>,
    fallback: Option<Box<dyn PriceSource>>,
}

impl FallbackPriceFeed {
    pub fn new(primary: Box<dyn PriceSource>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Builder-style method to add the fallback source.
    pub fn with_fallback(mut self, fallback: Box<dyn PriceSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Fetch fresh prices for every symbol in `previous` and overlay them.
    ///
    /// Never fails: when both sources error the previous snapshot is returned
    /// unchanged, with [`RefreshOutcome::Stale`].
    pub async fn refresh(&self, previous: &PriceSnapshot) -> (PriceSnapshot, RefreshOutcome) {
        let symbols: Vec<String> = previous.symbols().map(str::to_string).collect();
        let mut snapshot = previous.clone();

        match self.primary.fetch(&symbols).await {
            Ok(update) => {
                info!(source = self.primary.name(), prices = update.len(), "Prices refreshed");
                snapshot.merge(&update);
                return (snapshot, RefreshOutcome::Primary);
            }
            Err(e) => {
                warn!(
                    source = self.primary.name(),
                    network = e.is_network(),
                    error = %e,
                    "Price fetch failed, trying fallback"
                );
            }
        }

        let Some(fallback) = &self.fallback else {
            return (snapshot, RefreshOutcome::Stale);
        };

        match fallback.fetch(&symbols).await {
            Ok(update) => {
                info!(source = fallback.name(), prices = update.len(), "Prices refreshed from fallback");
                snapshot.merge(&update);
                (snapshot, RefreshOutcome::Fallback)
            }
            Err(e) => {
                warn!(
                    source = fallback.name(),
                    network = e.is_network(),
                    error = %e,
                    "Fallback price fetch also failed"
                );
                (snapshot, RefreshOutcome::Stale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Fixed(PriceSnapshot);
    struct Failing;

    #[async_trait]
    impl PriceSource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self, _symbols: &[String]) -> Result<PriceSnapshot> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl PriceSource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _symbols: &[String]) -> Result<PriceSnapshot> {
            Err(Error::ServerRequest {
                status_code: 503,
                error_message: "unavailable".into(),
            })
        }
    }

    fn previous() -> PriceSnapshot {
        PriceSnapshot::new()
            .with_price("WBTC", 67_340.0)
            .with_price("WETH", 3_420.5)
    }

    #[tokio::test]
    async fn test_primary_success() {
        let feed = FallbackPriceFeed::new(Box::new(Fixed(PriceSnapshot::new().with_price("WBTC", 70_000.0))))
            .with_fallback(Box::new(Failing));
        let (prices, outcome) = feed.refresh(&previous()).await;
        assert_eq!(outcome, RefreshOutcome::Primary);
        assert_eq!(prices.price("WBTC"), Some(70_000.0));
        assert_eq!(prices.price("WETH"), Some(3_420.5));
    }

    #[tokio::test]
    async fn test_fallback_used_on_primary_failure() {
        let feed = FallbackPriceFeed::new(Box::new(Failing))
            .with_fallback(Box::new(Fixed(PriceSnapshot::new().with_price("WETH", 3_600.0))));
        let (prices, outcome) = feed.refresh(&previous()).await;
        assert_eq!(outcome, RefreshOutcome::Fallback);
        assert_eq!(prices.price("WETH"), Some(3_600.0));
    }

    #[tokio::test]
    async fn test_both_fail_keeps_previous() {
        let feed = FallbackPriceFeed::new(Box::new(Failing)).with_fallback(Box::new(Failing));
        let (prices, outcome) = feed.refresh(&previous()).await;
        assert_eq!(outcome, RefreshOutcome::Stale);
        assert_eq!(prices, previous());

        let no_fallback = FallbackPriceFeed::new(Box::new(Failing));
        assert_eq!(no_fallback.refresh(&previous()).await.1, RefreshOutcome::Stale);
    }

    #[tokio::test]
    async fn test_invalid_update_does_not_clobber() {
        let feed = FallbackPriceFeed::new(Box::new(Fixed(PriceSnapshot::new().with_price("WBTC", 0.0))));
        let (prices, _) = feed.refresh(&previous()).await;
        assert_eq!(prices.price("WBTC"), Some(67_340.0));
    }
}
