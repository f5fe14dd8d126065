//! Ledger-level aggregate statistics.

use serde::Serialize;
use tracing::debug;

use super::{Availability, Classifier, PositionView, RiskCategory};
use crate::types::{Position, PriceSnapshot};

/// Position counts per risk category, indexed in [`RiskCategory::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts([usize; 5]);

impl CategoryCounts {
    pub fn get(&self, category: RiskCategory) -> usize {
        self.0[category.index()]
    }

    pub fn increment(&mut self, category: RiskCategory) {
        self.0[category.index()] += 1;
    }

    /// Sum across all five categories.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, usize)> + '_ {
        RiskCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// One row of the risk distribution bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionRow {
    pub category: RiskCategory,
    pub count: usize,
    /// Percent of all positions
    pub share: f64,
}

/// Aggregate statistics over a ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub counts: CategoryCounts,
    /// All input positions, categorized or not
    pub position_count: usize,
    /// Priced positions without debt that fell outside the buckets
    pub no_debt_count: usize,
    /// Positions excluded from totals for lack of a usable price
    pub unpriced_count: usize,
    /// Positions excluded from totals for a negative or non-finite amount or debt
    pub invalid_count: usize,
    /// Sum of collateral value over priced positions
    pub total_collateral_value: f64,
    /// Sum of debt over priced positions
    pub total_debt: f64,
    /// `total_collateral_value / total_debt × 100`; `None` without debt
    pub weighted_ratio: Option<f64>,
}

impl Summary {
    /// Build a summary from already-derived view rows.
    pub fn from_views(views: &[PositionView<'_>]) -> Self {
        let mut summary = Summary {
            position_count: views.len(),
            ..Default::default()
        };

        for view in views {
            match view.availability {
                Availability::Unpriced => {
                    summary.unpriced_count += 1;
                    continue;
                }
                Availability::Invalid => {
                    summary.invalid_count += 1;
                    continue;
                }
                Availability::NoDebt if view.category.is_none() => summary.no_debt_count += 1,
                _ => {}
            }
            if let Some(category) = view.category {
                summary.counts.increment(category);
            }
            summary.total_collateral_value += view.collateral_value.unwrap_or(0.0);
            summary.total_debt += view.position.debt;
        }

        if summary.total_debt > 0.0 {
            summary.weighted_ratio =
                Some(summary.total_collateral_value / summary.total_debt * 100.0);
        }
        summary
    }

    /// Percent of all positions in `category` (0 for an empty ledger).
    pub fn share(&self, category: RiskCategory) -> f64 {
        if self.position_count == 0 {
            return 0.0;
        }
        self.counts.get(category) as f64 / self.position_count as f64 * 100.0
    }

    /// Distribution rows, riskiest first.
    pub fn distribution(&self) -> Vec<DistributionRow> {
        self.counts
            .iter()
            .map(|(category, count)| DistributionRow {
                category,
                count,
                share: self.share(category),
            })
            .collect()
    }

    /// Weighted ratio expressed as a category, if defined.
    pub fn weighted_category(&self) -> Option<RiskCategory> {
        self.weighted_ratio.and_then(RiskCategory::from_ratio)
    }

    pub fn is_empty(&self) -> bool {
        self.position_count == 0
    }
}

impl Classifier {
    /// Aggregate counts, totals and the debt-weighted ratio over `positions`.
    ///
    /// Empty input yields an all-zero summary with no weighted ratio.
    pub fn aggregate(&self, positions: &[Position], prices: &PriceSnapshot) -> Summary {
        let summary = Summary::from_views(&self.assess(positions, prices));
        debug!(
            positions = summary.position_count,
            critical = summary.counts.get(RiskCategory::Critical),
            at_risk = summary.counts.get(RiskCategory::AtRisk),
            no_debt = summary.no_debt_count,
            unpriced = summary.unpriced_count,
            invalid = summary.invalid_count,
            weighted_ratio = ?summary.weighted_ratio,
            "Aggregated position ledger"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::ZeroDebtPolicy;

    fn prices() -> PriceSnapshot {
        PriceSnapshot::new().with_price("USD", 1.0).with_price("WETH", 3_420.5)
    }

    #[test]
    fn test_weighted_ratio_not_mean() {
        // Values {3000, 1000}, debts {2000, 500}: individual ratios 150 and 200
        let positions = vec![
            Position::new("a", "USD", 3_000.0, 2_000.0),
            Position::new("b", "USD", 1_000.0, 500.0),
        ];
        let summary = Classifier::default().aggregate(&positions, &prices());

        let weighted = summary.weighted_ratio.unwrap();
        assert!((weighted - 160.0).abs() < 1e-9);
        assert!((weighted - 175.0).abs() > 1.0);
        assert_eq!(summary.total_collateral_value, 4_000.0);
        assert_eq!(summary.total_debt, 2_500.0);
        assert_eq!(summary.counts.get(RiskCategory::Moderate), 1);
        assert_eq!(summary.counts.get(RiskCategory::Healthy), 1);
        assert_eq!(summary.weighted_category(), Some(RiskCategory::Moderate));
    }

    #[test]
    fn test_empty_input() {
        let summary = Classifier::default().aggregate(&[], &prices());
        assert!(summary.is_empty());
        assert_eq!(summary.counts.total(), 0);
        assert_eq!(summary.total_collateral_value, 0.0);
        assert_eq!(summary.total_debt, 0.0);
        assert_eq!(summary.weighted_ratio, None);
        assert_eq!(summary.share(RiskCategory::Critical), 0.0);
        assert_eq!(summary.distribution().len(), 5);
    }

    #[test]
    fn test_counts_sum_to_len() {
        let positions: Vec<_> = [100.0, 130.0, 170.0, 250.0, 400.0, 119.0, 300.0]
            .iter()
            .map(|r| Position::new("o", "USD", *r, 100.0))
            .collect();
        let summary = Classifier::default().aggregate(&positions, &prices());
        assert_eq!(summary.counts.total(), positions.len());
        assert_eq!(summary.counts.get(RiskCategory::Critical), 2);
        assert_eq!(summary.counts.get(RiskCategory::VerySafe), 2);

        let shares: f64 = summary.distribution().iter().map(|r| r.share).sum();
        assert!((shares - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_debt_and_unpriced_accounting() {
        let positions = vec![
            Position::new("a", "USD", 150.0, 100.0),
            Position::new("b", "WETH", 1.0, 0.0),
            Position::new("c", "WSOL", 10.0, 500.0),
        ];

        let summary = Classifier::default().aggregate(&positions, &prices());
        assert_eq!(summary.position_count, 3);
        assert_eq!(summary.counts.total(), 1);
        assert_eq!(summary.no_debt_count, 1);
        assert_eq!(summary.unpriced_count, 1);
        // Unpriced position excluded from both totals
        assert!((summary.total_collateral_value - 3_570.5).abs() < 1e-9);
        assert_eq!(summary.total_debt, 100.0);

        let very_safe = Classifier::new(ZeroDebtPolicy::TreatAsVerySafe).aggregate(&positions, &prices());
        assert_eq!(very_safe.no_debt_count, 0);
        assert_eq!(very_safe.counts.get(RiskCategory::VerySafe), 1);
        assert_eq!(
            very_safe.counts.total() + very_safe.no_debt_count + very_safe.unpriced_count,
            positions.len()
        );
    }

    #[test]
    fn test_invalid_rows_stay_out_of_totals() {
        let positions = vec![
            Position::new("ok", "USD", 150.0, 100.0),
            Position::new("neg_debt", "USD", 10.0, -90.0),
            Position::new("neg_coll", "USD", -50.0, 100.0),
        ];
        let summary = Classifier::default().aggregate(&positions, &prices());

        assert_eq!(summary.position_count, 3);
        assert_eq!(summary.counts.total(), 1);
        assert_eq!(summary.no_debt_count, 0);
        assert_eq!(summary.unpriced_count, 0);
        assert_eq!(summary.invalid_count, 2);
        assert_eq!(
            summary.counts.total()
                + summary.no_debt_count
                + summary.unpriced_count
                + summary.invalid_count,
            summary.position_count
        );
        assert_eq!(summary.total_collateral_value, 150.0);
        assert_eq!(summary.total_debt, 100.0);
        assert!((summary.weighted_ratio.unwrap() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_zero_debt_has_no_weighted_ratio() {
        let positions = vec![Position::new("a", "WETH", 2.0, 0.0)];
        let summary = Classifier::default().aggregate(&positions, &prices());
        assert_eq!(summary.weighted_ratio, None);
        assert_eq!(summary.total_collateral_value, 6_841.0);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let positions = vec![
            Position::new("a", "WETH", 0.85, 2_600.0),
            Position::new("b", "WETH", 1.25, 3_200.0),
        ];
        let classifier = Classifier::default();
        assert_eq!(
            classifier.aggregate(&positions, &prices()),
            classifier.aggregate(&positions, &prices())
        );
    }
}
