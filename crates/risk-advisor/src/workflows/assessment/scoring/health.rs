use serde::{Deserialize, Serialize};

use super::super::domain::AnswerSet;
use super::config::{
    HealthModel, IncomeStabilitySource, SavingsBreakpoints, ScoringConfig, TierRange,
};
use super::debt::{score_debt_quality, DebtQualityResult};
use super::scale::{round2, tier_percent};

/// Factors the composite health score is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthFactor {
    EmergencyFund,
    Debt,
    DebtQuality,
    SavingsRate,
    IncomeStability,
    Dependents,
}

/// One weighted factor of the health score, kept for audits and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthComponent {
    pub factor: HealthFactor,
    /// Factor value on a 0-100 scale before weighting.
    pub value: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealthResult {
    pub disposable_income: f64,
    pub annual_income: f64,
    pub savings_rate: f64,
    pub savings_rate_tier: u8,
    pub debt_ratio: f64,
    /// `1 - debt_ratio`, between 0 and 1.
    pub debt_score: f64,
    pub debt_quality: Option<DebtQualityResult>,
    pub components: Vec<HealthComponent>,
    pub score: f64,
}

pub(crate) fn savings_rate_tier(rate: f64, breakpoints: &SavingsBreakpoints) -> u8 {
    let below = breakpoints.0.iter().position(|bound| rate < *bound);
    match below {
        Some(index) => index as u8 + 1,
        None => breakpoints.0.len() as u8 + 1,
    }
}

pub(crate) fn score_health(answers: &AnswerSet, config: &ScoringConfig) -> FinancialHealthResult {
    let disposable_income = answers.disposable_income();
    let annual_income = answers.monthly_income * 12.0;
    let savings_rate = if answers.monthly_income > 0.0 {
        disposable_income / answers.monthly_income
    } else {
        0.0
    };
    let savings_rate_tier = savings_rate_tier(savings_rate, &config.savings_breakpoints);

    let debt_ratio = if annual_income > 0.0 {
        (answers.high_interest_debt / annual_income).min(1.0)
    } else {
        1.0
    };
    let debt_score = 1.0 - debt_ratio;

    let (components, debt_quality) = match &config.health {
        HealthModel::Classic {
            weights,
            income_stability,
        } => {
            let stability = match income_stability {
                IncomeStabilitySource::Assumed(value) => *value,
                IncomeStabilitySource::Answered => {
                    f64::from(answers.income_stability) / 5.0 * 100.0
                }
            };
            let components = vec![
                HealthComponent {
                    factor: HealthFactor::EmergencyFund,
                    value: f64::from(answers.emergency_fund) / 5.0 * 100.0,
                    weight: weights.emergency,
                },
                HealthComponent {
                    factor: HealthFactor::Debt,
                    value: debt_score * 100.0,
                    weight: weights.debt,
                },
                HealthComponent {
                    factor: HealthFactor::SavingsRate,
                    value: f64::from(savings_rate_tier) / 5.0 * 100.0,
                    weight: weights.savings,
                },
                HealthComponent {
                    factor: HealthFactor::IncomeStability,
                    value: stability,
                    weight: weights.income_stability,
                },
            ];
            (components, None)
        }
        HealthModel::Ranged { weights } => {
            let tiers = &config.tiers;
            let quality = score_debt_quality(answers, &config.debt, tiers.emi_burden);
            let components = vec![
                HealthComponent {
                    factor: HealthFactor::EmergencyFund,
                    value: tier_percent(answers.emergency_fund, tiers.emergency_fund, false),
                    weight: weights.emergency,
                },
                HealthComponent {
                    factor: HealthFactor::SavingsRate,
                    value: tier_percent(savings_rate_tier, TierRange::new(1, 5), false),
                    weight: weights.savings,
                },
                HealthComponent {
                    factor: HealthFactor::DebtQuality,
                    value: quality.score,
                    weight: weights.debt_quality,
                },
                HealthComponent {
                    factor: HealthFactor::IncomeStability,
                    value: tier_percent(answers.income_stability, tiers.income_stability, false),
                    weight: weights.income_stability,
                },
                HealthComponent {
                    factor: HealthFactor::Dependents,
                    value: tier_percent(answers.dependents, tiers.dependents, true),
                    weight: weights.dependents,
                },
            ];
            (components, Some(quality))
        }
    };

    let score: f64 = components
        .iter()
        .map(|component| component.value * component.weight)
        .sum();

    FinancialHealthResult {
        disposable_income: round2(disposable_income),
        annual_income: round2(annual_income),
        savings_rate,
        savings_rate_tier,
        debt_ratio: round2(debt_ratio),
        debt_score: round2(debt_score),
        debt_quality,
        components,
        score: round2(score.clamp(0.0, 100.0)),
    }
}
