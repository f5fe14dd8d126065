//! Public price APIs.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::http::HttpClient;
use super::PriceSource;
use crate::prelude::*;
use crate::types::PriceSnapshot;

/// Collateral symbol → (CoinGecko id, exchange ticker).
const ASSET_IDS: &[(&str, &str, &str)] = &[
    ("WBTC", "bitcoin", "BTC"),
    ("WETH", "ethereum", "ETH"),
    ("WBNB", "binancecoin", "BNB"),
    ("TAO", "bittensor", "TAO"),
];

fn lookup(symbol: &str) -> Option<(&'static str, &'static str)> {
    ASSET_IDS
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(_, id, ticker)| (*id, *ticker))
}

#[derive(Deserialize, Debug)]
struct UsdQuote {
    usd: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
struct TickerQuote {
    usd: Option<f64>,
}

/// CoinGecko `simple/price`.
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
    http: HttpClient,
}

impl CoinGeckoSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, timeout)?,
        })
    }

    /// Map a `{id: {usd: price}}` body back onto collateral symbols.
    pub fn parse(body: &str, symbols: &[String]) -> Result<PriceSnapshot> {
        let quotes: HashMap<String, UsdQuote> = serde_json::from_str(body)?;
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                let (id, _) = lookup(symbol)?;
                let price = quotes.get(id)?.usd?;
                Some((symbol.clone(), price))
            })
            .collect())
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn fetch(&self, symbols: &[String]) -> Result<PriceSnapshot> {
        let ids: Vec<&str> = symbols.iter().filter_map(|s| lookup(s)).map(|(id, _)| id).collect();
        let path = format!("/simple/price?ids={}&vs_currencies=usd", ids.join(","));
        let body = self.http.get(&path).await?;
        Self::parse(&body, symbols)
    }
}

/// CryptoCompare `pricemulti`.
#[derive(Debug, Clone)]
pub struct CryptoCompareSource {
    http: HttpClient,
}

impl CryptoCompareSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, timeout)?,
        })
    }

    /// Map a `{TICKER: {USD: price}}` body back onto collateral symbols.
    pub fn parse(body: &str, symbols: &[String]) -> Result<PriceSnapshot> {
        let quotes: HashMap<String, TickerQuote> = serde_json::from_str(body)?;
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                let (_, ticker) = lookup(symbol)?;
                let price = quotes.get(ticker)?.usd?;
                Some((symbol.clone(), price))
            })
            .collect())
    }
}

#[async_trait]
impl PriceSource for CryptoCompareSource {
    fn name(&self) -> &'static str {
        "cryptocompare"
    }

    async fn fetch(&self, symbols: &[String]) -> Result<PriceSnapshot> {
        let tickers: Vec<&str> = symbols.iter().filter_map(|s| lookup(s)).map(|(_, t)| t).collect();
        let path = format!("/pricemulti?fsyms={}&tsyms=USD", tickers.join(","));
        let body = self.http.get(&path).await?;
        Self::parse(&body, symbols)
    }
}
