//! Ordering and filtering views over a ledger.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Classifier, PositionView, RiskCategory};
use crate::types::{Position, PriceSnapshot};
use crate::{prelude::*, Error};

/// Which positions a table shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PositionFilter {
    #[default]
    All,
    Category(RiskCategory),
    /// Positions whose owner equals the id ("my positions")
    OwnedBy(String),
}

impl PositionFilter {
    pub fn matches(&self, view: &PositionView<'_>) -> bool {
        match self {
            PositionFilter::All => true,
            PositionFilter::Category(category) => view.category == Some(*category),
            PositionFilter::OwnedBy(owner) => view.position.owner == *owner,
        }
    }
}

impl fmt::Display for PositionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionFilter::All => f.write_str("all"),
            PositionFilter::Category(category) => write!(f, "{category}"),
            PositionFilter::OwnedBy(owner) => write!(f, "owner:{owner}"),
        }
    }
}

impl FromStr for PositionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PositionFilter::All);
        }
        if let Some((prefix, owner)) = trimmed.split_once(':') {
            let known = prefix.eq_ignore_ascii_case("owner") || prefix.eq_ignore_ascii_case("mine");
            if known && !owner.is_empty() {
                return Ok(PositionFilter::OwnedBy(owner.to_string()));
            }
            return Err(Error::InvalidFilter(s.to_string()));
        }
        trimmed
            .parse::<RiskCategory>()
            .map(PositionFilter::Category)
            .map_err(|_| Error::InvalidFilter(s.to_string()))
    }
}

impl Serialize for PositionFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PositionFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Stable sort by ratio ascending (riskiest first).
///
/// Rows without debt follow every finite ratio, then unpriced rows, then
/// rows with invalid amounts.
/// Equal keys keep their input order.
pub fn rank_views(mut views: Vec<PositionView<'_>>) -> Vec<PositionView<'_>> {
    views.sort_by(|a, b| {
        let (ga, ra) = a.rank_key();
        let (gb, rb) = b.rank_key();
        ga.cmp(&gb).then(ra.total_cmp(&rb))
    });
    views
}

/// Keep rows matching `filter`, preserving order.
pub fn filter_views<'a>(views: &[PositionView<'a>], filter: &PositionFilter) -> Vec<PositionView<'a>> {
    views.iter().filter(|v| filter.matches(v)).copied().collect()
}

impl Classifier {
    /// Positions ordered most-at-risk first.
    pub fn rank<'a>(&self, positions: &'a [Position], prices: &PriceSnapshot) -> Vec<PositionView<'a>> {
        rank_views(self.assess(positions, prices))
    }

    /// Positions matching `filter`, in input order.
    pub fn filter<'a>(
        &self,
        positions: &'a [Position],
        prices: &PriceSnapshot,
        filter: &PositionFilter,
    ) -> Vec<PositionView<'a>> {
        filter_views(&self.assess(positions, prices), filter)
    }

    /// Lowest-ratio position with outstanding debt, if any.
    pub fn most_at_risk<'a>(
        &self,
        positions: &'a [Position],
        prices: &PriceSnapshot,
    ) -> Option<PositionView<'a>> {
        self.rank(positions, prices)
            .into_iter()
            .find(|v| v.ratio.is_some())
    }
}
