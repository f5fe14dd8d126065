#![deny(unreachable_pub)]

// Core modules
mod consts;
mod errors;
mod helpers;
mod prelude;

// Shared data model
pub mod types;

// Feature modules
pub mod config;
pub mod feed;
mod redemption;
pub mod risk;
pub mod source;
pub mod view_state;

// Re-exports
pub use consts::{
    AT_RISK_MIN_RATIO, COINGECKO_API_URL, CRYPTOCOMPARE_API_URL, DEMO_WALLET, EPSILON,
    HEALTHY_MIN_RATIO, LIQUIDATION_THRESHOLD_PCT, MODERATE_MIN_RATIO, STABLE_SYMBOL,
    VERY_SAFE_MIN_RATIO,
};
pub use errors::Error;
pub use helpers::{
    format_compact_usd, format_optional_ratio, format_price, format_ratio, format_thousands,
};
pub use prelude::Result;
pub use redemption::{redemption_quote, redemption_rate, RedemptionPreview};
pub use risk::{
    classify, Availability, Classifier, PositionFilter, PositionView, RiskCategory, Summary,
    ZeroDebtPolicy,
};
pub use types::*;
