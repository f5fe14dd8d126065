//! Collateral price feed.
//!
//! A single refresh queries a primary provider and falls back to a second one
//! on failure. Scheduling refreshes is left to the caller.

mod http;
mod providers;
mod source;

pub use providers::{CoinGeckoSource, CryptoCompareSource};
pub use source::{FallbackPriceFeed, PriceSource, RefreshOutcome};
