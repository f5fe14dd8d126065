//! Point-in-time price lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::CollateralToken;
use crate::{prelude::*, Error};

/// Symbol → USD price for one refresh of the price feed.
///
/// Invalid entries (NaN, infinite, negative) are kept as received but read
/// back as unknown, so callers exclude them from ratio-bearing figures.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct PriceSnapshot {
    prices: BTreeMap<String, f64>,
}

fn is_usable(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of each token's current price.
    pub fn from_tokens(tokens: &[CollateralToken]) -> Self {
        tokens
            .iter()
            .map(|t| (t.symbol.clone(), t.price))
            .collect()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, price: f64) {
        self.prices.insert(symbol.into(), price);
    }

    /// Builder-style insert.
    pub fn with_price(mut self, symbol: impl Into<String>, price: f64) -> Self {
        self.insert(symbol, price);
        self
    }

    /// Price for `symbol`, or `None` when absent or unusable.
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied().filter(|p| is_usable(*p))
    }

    /// Strictly positive price for `symbol`.
    pub fn require(&self, symbol: &str) -> Result<f64> {
        match self.prices.get(symbol) {
            None => Err(Error::UnknownToken(symbol.to_string())),
            Some(&p) if p.is_finite() && p > 0.0 => Ok(p),
            Some(&p) => Err(Error::invalid_price(symbol, p)),
        }
    }

    /// Overlay usable prices from `update`; everything else keeps its previous value.
    pub fn merge(&mut self, update: &PriceSnapshot) {
        for (symbol, price) in &update.prices {
            if is_usable(*price) && *price > 0.0 {
                self.prices.insert(symbol.clone(), *price);
            }
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.prices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Reprice `tokens` from this snapshot; tokens without a usable price keep theirs.
    pub fn apply_to(&self, tokens: &[CollateralToken]) -> Vec<CollateralToken> {
        tokens
            .iter()
            .map(|t| match self.price(&t.symbol) {
                Some(p) if p > 0.0 => t.with_price(p),
                _ => t.clone(),
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().map(|(s, p)| (s.into(), p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_tokens;

    #[test]
    fn test_unknown_and_nan_prices() {
        let prices = PriceSnapshot::new()
            .with_price("WBTC", 67_340.0)
            .with_price("WETH", f64::NAN)
            .with_price("WBNB", -1.0);

        assert_eq!(prices.price("WBTC"), Some(67_340.0));
        assert_eq!(prices.price("WETH"), None);
        assert_eq!(prices.price("WBNB"), None);
        assert_eq!(prices.price("WSOL"), None);
    }

    #[test]
    fn test_require() {
        let prices = PriceSnapshot::new()
            .with_price("WBTC", 67_340.0)
            .with_price("ZERO", 0.0);

        assert_eq!(prices.require("WBTC").unwrap(), 67_340.0);
        assert!(matches!(prices.require("ZERO"), Err(Error::InvalidPrice { .. })));
        assert!(matches!(prices.require("WSOL"), Err(Error::UnknownToken(_))));
    }

    #[test]
    fn test_merge_keeps_previous_on_missing() {
        let mut prices = PriceSnapshot::from_tokens(&default_tokens());
        let update = PriceSnapshot::new()
            .with_price("WBTC", 70_000.0)
            .with_price("WETH", f64::NAN)
            .with_price("WBNB", 0.0);
        prices.merge(&update);

        assert_eq!(prices.price("WBTC"), Some(70_000.0));
        assert_eq!(prices.price("WETH"), Some(3_420.5));
        assert_eq!(prices.price("WBNB"), Some(645.2));
    }

    #[test]
    fn test_apply_to_tokens() {
        let prices = PriceSnapshot::new().with_price("WETH", 3_500.0);
        let tokens = prices.apply_to(&default_tokens());
        let weth = tokens.iter().find(|t| t.symbol == "WETH").unwrap();
        let wbtc = tokens.iter().find(|t| t.symbol == "WBTC").unwrap();
        assert_eq!(weth.price, 3_500.0);
        assert_eq!(wbtc.price, 67_340.0);
    }

    #[test]
    fn test_snapshot_serde_is_a_plain_map() {
        let prices = PriceSnapshot::new().with_price("WBTC", 1.5);
        let json = serde_json::to_string(&prices).unwrap();
        assert_eq!(json, r#"{"WBTC":1.5}"#);
    }
}
