use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::CategoryThresholds;

/// Ordinal risk category, index 1 (VERY_LOW) to 5 (VERY_HIGH).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::VeryLow,
        RiskCategory::Low,
        RiskCategory::Medium,
        RiskCategory::High,
        RiskCategory::VeryHigh,
    ];

    pub fn index(self) -> u8 {
        match self {
            Self::VeryLow => 1,
            Self::Low => 2,
            Self::Medium => 3,
            Self::High => 4,
            Self::VeryHigh => 5,
        }
    }

    /// Out-of-range indices saturate at the nearest end.
    pub fn from_index(index: u8) -> Self {
        match index {
            0 | 1 => Self::VeryLow,
            2 => Self::Low,
            3 => Self::Medium,
            4 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::VeryLow => "VERY_LOW",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY_HIGH",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "VERY LOW RISK",
            Self::Low => "LOW RISK",
            Self::Medium => "MEDIUM RISK",
            Self::High => "HIGH RISK",
            Self::VeryHigh => "VERY HIGH RISK",
        }
    }

    pub fn downgrade(self, steps: u8) -> Self {
        Self::from_index(self.index().saturating_sub(steps).max(1))
    }

    pub fn cap_at(self, ceiling: RiskCategory) -> Self {
        self.min(ceiling)
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold lookup of a risk score onto its category.
pub fn classify(score: f64, thresholds: &CategoryThresholds) -> RiskCategory {
    thresholds
        .upper_bounds
        .iter()
        .position(|bound| score <= *bound)
        .map(|slot| RiskCategory::from_index(slot as u8 + 1))
        .unwrap_or(RiskCategory::VeryHigh)
}

/// Inclusive upper score bound of a category band, the scale maximum for VERY_HIGH.
pub fn upper_bound(category: RiskCategory, thresholds: &CategoryThresholds) -> f64 {
    thresholds
        .upper_bounds
        .get(usize::from(category.index() - 1))
        .copied()
        .unwrap_or(thresholds.scale_max)
}
