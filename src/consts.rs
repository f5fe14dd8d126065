/// Lower bound of the at-risk bucket; anything below is critical (percent).
pub const AT_RISK_MIN_RATIO: f64 = 120.0;
/// Lower bound of the moderate bucket (percent).
pub const MODERATE_MIN_RATIO: f64 = 150.0;
/// Lower bound of the healthy bucket (percent).
pub const HEALTHY_MIN_RATIO: f64 = 200.0;
/// Lower bound of the very-safe bucket (percent).
pub const VERY_SAFE_MIN_RATIO: f64 = 300.0;

/// Positions below this collateral ratio are eligible for liquidation (percent).
pub const LIQUIDATION_THRESHOLD_PCT: f64 = 110.0;

/// Ticker of the protocol's stable unit.
pub const STABLE_SYMBOL: &str = "ALUD";

/// Owner id of the wallet that holds the demo ledger's "my positions" entry.
pub const DEMO_WALLET: &str = "0xBa26...e9DF";

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const CRYPTOCOMPARE_API_URL: &str = "https://min-api.cryptocompare.com/data";

/// Relative tolerance used when comparing derived floating-point values.
pub const EPSILON: f64 = 1e-9;
