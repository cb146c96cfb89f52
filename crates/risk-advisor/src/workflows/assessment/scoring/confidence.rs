use serde::{Deserialize, Serialize};

use super::config::ConfidenceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub score: u8,
    pub level: ConfidenceLevel,
    pub penalties: Vec<String>,
}

pub(crate) fn score_confidence(
    health_score: f64,
    override_count: usize,
    contradictions: u8,
    monthly_investment: f64,
    config: &ConfidenceConfig,
) -> ConfidenceScore {
    let checks = [
        (health_score < config.low_health, "Low financial health"),
        (
            override_count >= config.override_limit,
            "Multiple overrides",
        ),
        (
            contradictions >= config.contradiction_limit,
            "Contradictory answers",
        ),
        (
            monthly_investment < config.low_investment,
            "Low investment capacity",
        ),
    ];
    let penalties: Vec<String> = checks
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, reason)| reason.to_string())
        .collect();

    let deduction = (penalties.len() as u8).saturating_mul(config.penalty);
    let score = config.base.saturating_sub(deduction).max(config.floor);
    let level = if score >= config.high_level {
        ConfidenceLevel::High
    } else if score >= config.medium_level {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    };

    ConfidenceScore {
        score,
        level,
        penalties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_profile_keeps_full_confidence() {
        let confidence = score_confidence(86.0, 1, 0, 6_000.0, &ConfidenceConfig::default());
        assert_eq!(confidence.score, 90);
        assert_eq!(confidence.level, ConfidenceLevel::High);
        assert!(confidence.penalties.is_empty());
    }

    #[test]
    fn each_penalty_costs_ten_points() {
        let confidence = score_confidence(30.0, 4, 3, 0.0, &ConfidenceConfig::default());
        assert_eq!(confidence.score, 50);
        assert_eq!(confidence.level, ConfidenceLevel::Low);
        assert_eq!(
            confidence.penalties,
            vec![
                "Low financial health",
                "Multiple overrides",
                "Contradictory answers",
                "Low investment capacity",
            ]
        );
    }

    #[test]
    fn two_penalties_land_on_medium() {
        let confidence = score_confidence(45.0, 0, 0, 800.0, &ConfidenceConfig::default());
        assert_eq!(confidence.score, 70);
        assert_eq!(confidence.level, ConfidenceLevel::Medium);
    }
}
