//! Risk categories over the collateral-ratio axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{AT_RISK_MIN_RATIO, HEALTHY_MIN_RATIO, MODERATE_MIN_RATIO, VERY_SAFE_MIN_RATIO};
use crate::{prelude::*, Error};

/// Discrete risk bucket for a collateral ratio (percent).
///
/// Buckets are half-open `[lower, upper)`, so they partition `[0, ∞)`:
///
/// | Category  | Range            |
/// |-----------|------------------|
/// | Critical  | `< 120`          |
/// | AtRisk    | `120 ≤ r < 150`  |
/// | Moderate  | `150 ≤ r < 200`  |
/// | Healthy   | `200 ≤ r < 300`  |
/// | VerySafe  | `≥ 300`          |
///
/// Variants are declared from most to least risky, so `Ord` sorts riskiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskCategory {
    Critical,
    AtRisk,
    Moderate,
    Healthy,
    VerySafe,
}

/// Presentation tokens for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub label: &'static str,
    /// Text color class
    pub text_color: &'static str,
    /// Badge background + border classes
    pub badge_class: &'static str,
    /// Status dot class
    pub dot_class: &'static str,
    /// Distribution bar segment class
    pub bar_class: &'static str,
    /// Human-readable ratio range
    pub threshold_label: &'static str,
}

const STYLES: [CategoryStyle; 5] = [
    CategoryStyle {
        label: "Critical",
        text_color: "text-red-400",
        badge_class: "bg-red-500/10 border-red-500/30",
        dot_class: "bg-red-400",
        bar_class: "bg-red-500",
        threshold_label: "< 120%",
    },
    CategoryStyle {
        label: "At Risk",
        text_color: "text-orange-400",
        badge_class: "bg-orange-500/10 border-orange-500/30",
        dot_class: "bg-orange-400",
        bar_class: "bg-orange-500",
        threshold_label: "120% - 150%",
    },
    CategoryStyle {
        label: "Moderate",
        text_color: "text-yellow-400",
        badge_class: "bg-yellow-500/10 border-yellow-500/30",
        dot_class: "bg-yellow-400",
        bar_class: "bg-yellow-500",
        threshold_label: "150% - 200%",
    },
    CategoryStyle {
        label: "Healthy",
        text_color: "text-green-400",
        badge_class: "bg-green-500/10 border-green-500/30",
        dot_class: "bg-green-400",
        bar_class: "bg-green-500",
        threshold_label: "200% - 300%",
    },
    CategoryStyle {
        label: "Very Safe",
        text_color: "text-emerald-400",
        badge_class: "bg-emerald-500/10 border-emerald-500/30",
        dot_class: "bg-emerald-400",
        bar_class: "bg-emerald-500",
        threshold_label: "> 300%",
    },
];

impl RiskCategory {
    /// All categories, riskiest first.
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Critical,
        RiskCategory::AtRisk,
        RiskCategory::Moderate,
        RiskCategory::Healthy,
        RiskCategory::VerySafe,
    ];

    /// Map a finite, non-negative ratio (percent) to its bucket.
    ///
    /// NaN and negative ratios have no bucket. `+∞` is very safe.
    pub fn from_ratio(ratio: f64) -> Option<Self> {
        if ratio.is_nan() || ratio < 0.0 {
            return None;
        }
        let category = if ratio < AT_RISK_MIN_RATIO {
            RiskCategory::Critical
        } else if ratio < MODERATE_MIN_RATIO {
            RiskCategory::AtRisk
        } else if ratio < HEALTHY_MIN_RATIO {
            RiskCategory::Moderate
        } else if ratio < VERY_SAFE_MIN_RATIO {
            RiskCategory::Healthy
        } else {
            RiskCategory::VerySafe
        };
        Some(category)
    }

    /// Position in [`RiskCategory::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Ratio bounds `[lower, upper)`; the last bucket is unbounded above.
    pub fn bounds(self) -> (f64, Option<f64>) {
        match self {
            RiskCategory::Critical => (0.0, Some(AT_RISK_MIN_RATIO)),
            RiskCategory::AtRisk => (AT_RISK_MIN_RATIO, Some(MODERATE_MIN_RATIO)),
            RiskCategory::Moderate => (MODERATE_MIN_RATIO, Some(HEALTHY_MIN_RATIO)),
            RiskCategory::Healthy => (HEALTHY_MIN_RATIO, Some(VERY_SAFE_MIN_RATIO)),
            RiskCategory::VerySafe => (VERY_SAFE_MIN_RATIO, None),
        }
    }

    pub fn style(self) -> &'static CategoryStyle {
        &STYLES[self.index()]
    }

    pub fn label(self) -> &'static str {
        self.style().label
    }

    /// Kebab-case identifier, matching the serde representation.
    pub fn slug(self) -> &'static str {
        match self {
            RiskCategory::Critical => "critical",
            RiskCategory::AtRisk => "at-risk",
            RiskCategory::Moderate => "moderate",
            RiskCategory::Healthy => "healthy",
            RiskCategory::VerySafe => "very-safe",
        }
    }

    /// Liquidation-eligible or close to it.
    pub fn is_actionable(self) -> bool {
        matches!(self, RiskCategory::Critical | RiskCategory::AtRisk)
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RiskCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        RiskCategory::ALL
            .into_iter()
            .find(|c| c.slug() == normalized)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}
