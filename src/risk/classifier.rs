//! Per-position classification.
//!
//! The classifier never mutates the ledger. It derives [`PositionView`] rows
//! that borrow the source positions and carry the computed figures.

use serde::{Deserialize, Serialize};

use super::RiskCategory;
use crate::types::{Position, PriceSnapshot};
use crate::{prelude::*, Error};

/// How positions without debt are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroDebtPolicy {
    /// Fail with [`Error::UndefinedRatio`]
    Reject,
    /// Infinite ratio, counted as very safe
    #[serde(rename = "very-safe", alias = "treat-as-very-safe")]
    TreatAsVerySafe,
    /// Outside all five buckets (the "no debt" state)
    #[default]
    Exclude,
}

/// Whether a row's ratio could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// Price known and debt outstanding
    Priced,
    /// Price known, no debt (ratio infinite)
    NoDebt,
    /// Price unknown or invalid
    Unpriced,
    /// Negative or non-finite amount or debt
    Invalid,
}

/// Read-only derived row for one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionView<'a> {
    pub position: &'a Position,
    /// `None` when unpriced
    pub collateral_value: Option<f64>,
    /// `None` when unpriced or without debt
    pub ratio: Option<f64>,
    /// `None` when unpriced, or without debt under [`ZeroDebtPolicy::Exclude`]
    pub category: Option<RiskCategory>,
    pub availability: Availability,
}

impl PositionView<'_> {
    /// Sort key for ranking: finite ratios, then no-debt, then unpriced,
    /// then invalid rows.
    pub(crate) fn rank_key(&self) -> (u8, f64) {
        match (self.availability, self.ratio) {
            (Availability::Priced, Some(r)) => (0, r),
            (Availability::NoDebt, _) => (1, f64::INFINITY),
            (Availability::Invalid, _) => (3, f64::INFINITY),
            _ => (2, f64::INFINITY),
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self.availability, Availability::Priced | Availability::NoDebt)
    }
}

fn unavailable(position: &Position, availability: Availability) -> PositionView<'_> {
    PositionView {
        position,
        collateral_value: None,
        ratio: None,
        category: None,
        availability,
    }
}

/// Classify one position.
///
/// Fails with [`Error::UndefinedRatio`] when the position has no debt. The
/// caller must resolve that case first, or use a [`Classifier`] with a policy.
/// Negative amounts or debt fail with [`Error::InvalidAmount`].
pub fn classify(position: &Position, prices: &PriceSnapshot) -> Result<RiskCategory> {
    position.validate()?;
    let ratio = position
        .ratio(prices)?
        .ok_or_else(|| Error::undefined_ratio(&position.owner))?;
    RiskCategory::from_ratio(ratio).ok_or_else(|| Error::undefined_ratio(&position.owner))
}

/// Classify a raw ratio (percent).
pub fn classify_ratio(ratio: f64) -> Result<RiskCategory> {
    RiskCategory::from_ratio(ratio).ok_or_else(|| Error::undefined_ratio(format!("ratio {ratio}")))
}

/// Position risk classifier configured with a zero-debt policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Classifier {
    policy: ZeroDebtPolicy,
}

impl Classifier {
    pub fn new(policy: ZeroDebtPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ZeroDebtPolicy {
        self.policy
    }

    /// Classify one position under this classifier's zero-debt policy.
    ///
    /// `Ok(None)` means the position sits outside the five buckets.
    pub fn classify(
        &self,
        position: &Position,
        prices: &PriceSnapshot,
    ) -> Result<Option<RiskCategory>> {
        position.validate()?;
        match position.ratio(prices)? {
            Some(ratio) => classify_ratio(ratio)
                .map(Some)
                .map_err(|_| Error::undefined_ratio(&position.owner)),
            None => self.resolve_zero_debt(position),
        }
    }

    fn resolve_zero_debt(&self, position: &Position) -> Result<Option<RiskCategory>> {
        match self.policy {
            ZeroDebtPolicy::Reject => Err(Error::undefined_ratio(&position.owner)),
            ZeroDebtPolicy::TreatAsVerySafe => Ok(Some(RiskCategory::VerySafe)),
            ZeroDebtPolicy::Exclude => Ok(None),
        }
    }

    /// Derive a view row for one position.
    ///
    /// Never fails: rows with a negative amount or debt become
    /// [`Availability::Invalid`], unknown prices become
    /// [`Availability::Unpriced`], and zero debt under `Reject` becomes an
    /// uncategorized no-debt row.
    pub fn view<'a>(&self, position: &'a Position, prices: &PriceSnapshot) -> PositionView<'a> {
        if position.validate().is_err() {
            return unavailable(position, Availability::Invalid);
        }
        let Ok(value) = position.collateral_value(prices) else {
            return unavailable(position, Availability::Unpriced);
        };

        if !position.has_debt() {
            return PositionView {
                position,
                collateral_value: Some(value),
                ratio: None,
                category: self.resolve_zero_debt(position).ok().flatten(),
                availability: Availability::NoDebt,
            };
        }

        let ratio = value / position.debt * 100.0;
        PositionView {
            position,
            collateral_value: Some(value),
            ratio: Some(ratio),
            category: RiskCategory::from_ratio(ratio),
            availability: Availability::Priced,
        }
    }

    /// One view row per position, in input order.
    pub fn assess<'a>(&self, positions: &'a [Position], prices: &PriceSnapshot) -> Vec<PositionView<'a>> {
        positions.iter().map(|p| self.view(p, prices)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> PriceSnapshot {
        PriceSnapshot::new()
            .with_price("WBTC", 67_340.0)
            .with_price("WETH", 3_420.5)
            .with_price("WBNB", 645.2)
    }

    #[test]
    fn test_classify_wbtc_scenario() {
        let position = Position::new("0x7a3b...f91e", "WBTC", 0.05, 2_450.0);
        assert_eq!(classify(&position, &prices()).unwrap(), RiskCategory::AtRisk);
    }

    #[test]
    fn test_classify_zero_debt_fails() {
        let position = Position::new("0xabc", "WETH", 1.0, 0.0);
        assert_eq!(
            classify(&position, &prices()),
            Err(Error::undefined_ratio("0xabc"))
        );
    }

    #[test]
    fn test_classify_unknown_price() {
        let position = Position::new("0xabc", "WSOL", 1.0, 10.0);
        assert!(classify(&position, &prices()).unwrap_err().is_price_unavailable());
    }

    #[test]
    fn test_classify_ratio() {
        assert_eq!(classify_ratio(120.0).unwrap(), RiskCategory::AtRisk);
        assert!(matches!(classify_ratio(f64::NAN), Err(Error::UndefinedRatio { .. })));
    }

    #[test]
    fn test_zero_debt_policies() {
        let position = Position::new("0xabc", "WETH", 1.0, 0.0);

        let reject = Classifier::new(ZeroDebtPolicy::Reject);
        assert!(reject.classify(&position, &prices()).is_err());

        let very_safe = Classifier::new(ZeroDebtPolicy::TreatAsVerySafe);
        assert_eq!(
            very_safe.classify(&position, &prices()).unwrap(),
            Some(RiskCategory::VerySafe)
        );

        let exclude = Classifier::default();
        assert_eq!(exclude.policy(), ZeroDebtPolicy::Exclude);
        assert_eq!(exclude.classify(&position, &prices()).unwrap(), None);
    }

    #[test]
    fn test_view_rows() {
        let positions = vec![
            Position::new("a", "WETH", 1.0, 2_000.0),
            Position::new("b", "WETH", 1.0, 0.0),
            Position::new("c", "WSOL", 1.0, 100.0),
        ];
        let views = Classifier::default().assess(&positions, &prices());
        assert_eq!(views.len(), 3);

        assert_eq!(views[0].availability, Availability::Priced);
        assert_eq!(views[0].category, Some(RiskCategory::Moderate));
        assert!((views[0].ratio.unwrap() - 171.025).abs() < 1e-9);

        assert_eq!(views[1].availability, Availability::NoDebt);
        assert_eq!(views[1].ratio, None);
        assert_eq!(views[1].category, None);
        assert_eq!(views[1].collateral_value, Some(3_420.5));

        assert_eq!(views[2].availability, Availability::Unpriced);
        assert!(!views[2].is_priced());
        assert!(std::ptr::eq(views[2].position, &positions[2]));
    }

    #[test]
    fn test_negative_inputs_are_invalid_rows() {
        let positions = vec![
            Position::new("neg_debt", "WETH", 1.0, -90.0),
            Position::new("neg_coll", "WETH", -0.5, 100.0),
            Position::new("nan_debt", "WETH", 1.0, f64::NAN),
        ];
        for view in Classifier::default().assess(&positions, &prices()) {
            assert_eq!(view.availability, Availability::Invalid, "{}", view.position.owner);
            assert_eq!(view.collateral_value, None);
            assert_eq!(view.ratio, None);
            assert_eq!(view.category, None);
            assert!(!view.is_priced());
        }

        assert_eq!(
            classify(&positions[0], &prices()),
            Err(Error::InvalidAmount(-90.0))
        );
        assert_eq!(
            Classifier::default().classify(&positions[1], &prices()),
            Err(Error::InvalidAmount(-0.5))
        );
    }

    #[test]
    fn test_policy_serde() {
        let policy: ZeroDebtPolicy = serde_json::from_str(r#""very-safe""#).unwrap();
        assert_eq!(policy, ZeroDebtPolicy::TreatAsVerySafe);
        let policy: ZeroDebtPolicy = serde_json::from_str(r#""treat-as-very-safe""#).unwrap();
        assert_eq!(policy, ZeroDebtPolicy::TreatAsVerySafe);
        assert_eq!(
            serde_json::to_string(&ZeroDebtPolicy::TreatAsVerySafe).unwrap(),
            r#""very-safe""#
        );
    }

    #[test]
    fn test_deterministic() {
        let positions = vec![Position::new("a", "WBTC", 0.042, 2_450.0)];
        let first = Classifier::default().assess(&positions, &prices());
        let second = Classifier::default().assess(&positions, &prices());
        assert_eq!(first[0].ratio.unwrap().to_bits(), second[0].ratio.unwrap().to_bits());
    }
}
