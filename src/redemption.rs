//! Stable-unit → collateral redemption quotes.

use serde::Serialize;

use crate::types::CollateralToken;
use crate::{prelude::*, Error};

fn checked_price(token: &CollateralToken) -> Result<f64> {
    if token.has_valid_price() {
        Ok(token.price)
    } else {
        Err(Error::invalid_price(&token.symbol, token.price))
    }
}

/// Collateral received for redeeming `stable_amount` at the token's price.
///
/// Zero redeems to zero. Negative or non-finite amounts fail with
/// [`Error::InvalidAmount`]; unusable prices with [`Error::InvalidPrice`].
pub fn redemption_quote(stable_amount: f64, token: &CollateralToken) -> Result<f64> {
    let price = checked_price(token)?;
    if !stable_amount.is_finite() || stable_amount < 0.0 {
        return Err(Error::InvalidAmount(stable_amount));
    }
    Ok(stable_amount / price)
}

/// Collateral received per one stable unit.
pub fn redemption_rate(token: &CollateralToken) -> Result<f64> {
    Ok(1.0 / checked_price(token)?)
}

/// Everything the redemption form shows for one input amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedemptionPreview {
    pub symbol: String,
    pub stable_amount: f64,
    pub asset_amount: f64,
    /// Asset per stable unit
    pub rate: f64,
    /// USD value of `asset_amount`
    pub usd_value: f64,
}

impl RedemptionPreview {
    pub fn new(stable_amount: f64, token: &CollateralToken) -> Result<Self> {
        let asset_amount = redemption_quote(stable_amount, token)?;
        Ok(Self {
            symbol: token.symbol.clone(),
            stable_amount,
            asset_amount,
            rate: redemption_rate(token)?,
            usd_value: asset_amount * token.price,
        })
    }
}
