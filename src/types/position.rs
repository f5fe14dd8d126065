//! Collateralized debt positions.

use serde::{Deserialize, Serialize};

use super::{LastActivity, PriceSnapshot};
use crate::{prelude::*, Error};

/// One collateralized debt position (a "trove").
///
/// Only the inputs are stored. Collateral value and ratio depend on the
/// price snapshot and are derived on demand.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Owner identifier, e.g. a masked address
    pub owner: String,
    /// Symbol of the collateral token
    pub collateral: String,
    pub collateral_amount: f64,
    /// Outstanding debt in the stable unit
    pub debt: f64,
    #[serde(default)]
    pub last_activity: LastActivity,
}

impl Position {
    pub fn new(
        owner: impl Into<String>,
        collateral: impl Into<String>,
        collateral_amount: f64,
        debt: f64,
    ) -> Self {
        Self {
            owner: owner.into(),
            collateral: collateral.into(),
            collateral_amount,
            debt,
            last_activity: LastActivity::default(),
        }
    }

    /// Builder-style method to set the last activity.
    pub fn with_activity(mut self, activity: impl Into<LastActivity>) -> Self {
        self.last_activity = activity.into();
        self
    }

    pub fn has_debt(&self) -> bool {
        self.debt > 0.0
    }

    /// Check the non-negativity invariants on amount and debt.
    pub fn validate(&self) -> Result<()> {
        if !self.collateral_amount.is_finite() || self.collateral_amount < 0.0 {
            return Err(Error::InvalidAmount(self.collateral_amount));
        }
        if !self.debt.is_finite() || self.debt < 0.0 {
            return Err(Error::InvalidAmount(self.debt));
        }
        Ok(())
    }

    /// `collateral_amount × price`.
    pub fn collateral_value(&self, prices: &PriceSnapshot) -> Result<f64> {
        let price = prices.require(&self.collateral)?;
        Ok(self.collateral_amount * price)
    }

    /// Collateralization ratio in percent; `None` when there is no debt.
    pub fn ratio(&self, prices: &PriceSnapshot) -> Result<Option<f64>> {
        let value = self.collateral_value(prices)?;
        if !self.has_debt() {
            return Ok(None);
        }
        Ok(Some(value / self.debt * 100.0))
    }

    /// Ratio expressed as a multiple (1.5 = 150%).
    pub fn health_factor(&self, prices: &PriceSnapshot) -> Result<Option<f64>> {
        Ok(self.ratio(prices)?.map(|r| r / 100.0))
    }

    /// Collateral price at which the ratio falls to `threshold_pct`.
    ///
    /// `None` when the position has no debt or no collateral.
    pub fn liquidation_price(&self, threshold_pct: f64) -> Option<f64> {
        if !self.has_debt() || self.collateral_amount <= 0.0 {
            return None;
        }
        Some(self.debt * threshold_pct / 100.0 / self.collateral_amount)
    }

    /// Stable amount needed to repay `percentage` of the debt.
    pub fn repay_amount(&self, percentage: f64) -> Result<f64> {
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(Error::InvalidAmount(percentage));
        }
        Ok(self.debt * percentage / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> PriceSnapshot {
        PriceSnapshot::new()
            .with_price("WBTC", 67_340.0)
            .with_price("WETH", 3_420.5)
    }

    #[test]
    fn test_wbtc_scenario() {
        let position = Position::new("0x7a3b...f91e", "WBTC", 0.05, 2_450.0);
        let value = position.collateral_value(&prices()).unwrap();
        assert!((value - 3_367.0).abs() < 1e-9);

        let ratio = position.ratio(&prices()).unwrap().unwrap();
        assert!((ratio - 137.469_387_755_102).abs() < 1e-9);

        let hf = position.health_factor(&prices()).unwrap().unwrap();
        assert!((hf - ratio / 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_debt_has_no_ratio() {
        let position = Position::new("owner", "WETH", 1.0, 0.0);
        assert_eq!(position.ratio(&prices()).unwrap(), None);
        assert_eq!(position.liquidation_price(110.0), None);
    }

    #[test]
    fn test_unknown_price_propagates() {
        let position = Position::new("owner", "WBNB", 1.0, 100.0);
        assert!(matches!(
            position.ratio(&prices()),
            Err(Error::UnknownToken(_))
        ));
    }

    #[test]
    fn test_liquidation_price() {
        let position = Position::new("owner", "WETH", 2.0, 4_000.0);
        // 4000 × 1.10 / 2 = 2200
        let liq = position.liquidation_price(110.0).unwrap();
        assert!((liq - 2_200.0).abs() < 1e-9);

        let empty = Position::new("owner", "WETH", 0.0, 4_000.0);
        assert_eq!(empty.liquidation_price(110.0), None);
    }

    #[test]
    fn test_repay_amount() {
        let position = Position::new("owner", "WBTC", 0.05, 2_450.0);
        assert_eq!(position.repay_amount(25.0).unwrap(), 612.5);
        assert_eq!(position.repay_amount(100.0).unwrap(), 2_450.0);
        assert_eq!(position.repay_amount(0.0).unwrap(), 0.0);
        assert!(position.repay_amount(150.0).is_err());
        assert!(position.repay_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Position::new("o", "WETH", 1.0, 0.0).validate().is_ok());
        assert!(Position::new("o", "WETH", -1.0, 0.0).validate().is_err());
        assert!(Position::new("o", "WETH", 1.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_position_serde() {
        let json = r#"{"owner":"0x91c2...8d4a","collateral":"WETH","collateralAmount":0.85,"debt":2600,"lastActivity":"45m ago"}"#;
        let position: Position = serde_json::from_str(json).unwrap();
        assert_eq!(position.collateral_amount, 0.85);
        assert_eq!(position.debt, 2_600.0);
        assert_eq!(position.last_activity, LastActivity::from("45m ago"));
    }
}
