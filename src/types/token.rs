//! Collateral token metadata.

use serde::{Deserialize, Serialize};

/// A collateral asset accepted by the protocol.
///
/// Immutable for a given price snapshot; a refreshed price produces a new
/// value via [`CollateralToken::with_price`].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollateralToken {
    pub symbol: String,
    pub name: String,
    /// On-chain address, opaque and not validated
    pub address: String,
    pub decimals: u32,
    pub logo: String,
    /// Current unit price in USD
    pub price: f64,
    /// Wallet balance, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

impl CollateralToken {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        decimals: u32,
        logo: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            address: address.into(),
            decimals,
            logo: logo.into(),
            price,
            balance: None,
        }
    }

    /// Builder-style method to attach a wallet balance.
    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Copy of this token repriced at `price`.
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    /// Does the price support value computations (finite and > 0)?
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// USD value of the held balance, if both balance and price are usable.
    pub fn balance_value(&self) -> Option<f64> {
        match self.balance {
            Some(balance) if self.has_valid_price() => Some(balance * self.price),
            _ => None,
        }
    }
}

/// Collateral tokens listed by the dashboard, at their reference prices.
pub fn default_tokens() -> Vec<CollateralToken> {
    vec![
        CollateralToken::new(
            "WBTC",
            "Wrapped Bitcoin",
            "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
            8,
            "https://tokens.1inch.io/0x2260fac5e5542a773aa44fbcfedf7c193bc2c599.png",
            67_340.00,
        )
        .with_balance(0.15234),
        CollateralToken::new(
            "WBNB",
            "Wrapped BNB",
            "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
            18,
            "https://tokens.1inch.io/0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c.png",
            645.20,
        )
        .with_balance(5.432),
        CollateralToken::new(
            "WETH",
            "Wrapped Ethereum",
            "0x2170Ed0880ac9A755fd29B2688956BD959F933F8",
            18,
            "https://tokens.1inch.io/0x2170ed0880ac9a755fd29b2688956bd959f933f8.png",
            3_420.50,
        )
        .with_balance(2.847),
    ]
}

/// Case-insensitive substring search over symbol and name.
///
/// An empty (or whitespace) query matches every token.
pub fn search_tokens<'a>(tokens: &'a [CollateralToken], query: &str) -> Vec<&'a CollateralToken> {
    let needle = query.trim().to_lowercase();
    tokens
        .iter()
        .filter(|t| {
            needle.is_empty()
                || t.symbol.to_lowercase().contains(&needle)
                || t.name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Find a token by exact symbol.
pub fn find_token<'a>(tokens: &'a [CollateralToken], symbol: &str) -> Option<&'a CollateralToken> {
    tokens.iter().find(|t| t.symbol == symbol)
}
