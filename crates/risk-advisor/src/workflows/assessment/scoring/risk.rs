use serde::{Deserialize, Serialize};

use super::super::domain::{AnswerSet, TierCoded};
use super::config::{
    FiveComponentConfig, RiskModel, ScoringConfig, ThreeComponentWeights, TierRange,
};
use super::debt::score_debt_quality;
use super::health::FinancialHealthResult;
use super::scale::{fifths, round2, tier_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskComponentKind {
    Capacity,
    Tolerance,
    Requirement,
    Financial,
    Debt,
    Horizon,
    Knowledge,
}

/// Named sub-score with its fixed maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub kind: RiskComponentKind,
    pub score: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub components: Vec<RiskComponent>,
    pub total: f64,
    pub scale_max: f64,
}

impl RiskScoreResult {
    pub fn component(&self, kind: RiskComponentKind) -> Option<f64> {
        self.components
            .iter()
            .find(|component| component.kind == kind)
            .map(|component| component.score)
    }
}

pub(crate) fn score_risk(
    answers: &AnswerSet,
    health: &FinancialHealthResult,
    config: &ScoringConfig,
) -> RiskScoreResult {
    match &config.risk {
        RiskModel::ThreeComponent(weights) => three_component(answers, health, weights),
        RiskModel::FiveComponent(five) => five_component(answers, health, five, config),
    }
}

fn three_component(
    answers: &AnswerSet,
    health: &FinancialHealthResult,
    weights: &ThreeComponentWeights,
) -> RiskScoreResult {
    let capacity_weights = &weights.capacity;
    let capacity = capacity_weights.age * fifths(f64::from(answers.age_group))
        + capacity_weights.savings * fifths(f64::from(health.savings_rate_tier))
        + capacity_weights.debt * health.debt_score
        + capacity_weights.emergency * fifths(f64::from(answers.emergency_fund))
        + capacity_weights.horizon * fifths(f64::from(answers.time_horizon));

    // Loss capacity (1-4) and goal priority (1-3) are stretched onto the 1-5 scale.
    let loss_stretched = (f64::from(answers.loss_capacity) - 1.0) * 4.0 / 3.0 + 1.0;
    let goal_stretched = (f64::from(answers.goal_priority.tier()) - 1.0) * 2.0 + 1.0;

    let tolerance_weights = &weights.tolerance;
    let tolerance = tolerance_weights.risk_behavior * fifths(f64::from(answers.risk_behavior))
        + tolerance_weights.experience * fifths(f64::from(answers.experience))
        + tolerance_weights.loss_capacity * fifths(loss_stretched);

    let requirement = weights.requirement.purpose * fifths(f64::from(answers.purpose.tier()))
        + weights.requirement.goal_priority * fifths(goal_stretched);

    let total = capacity + tolerance + requirement;

    RiskScoreResult {
        components: vec![
            RiskComponent {
                kind: RiskComponentKind::Capacity,
                score: round2(capacity),
                max: weights.capacity_max(),
            },
            RiskComponent {
                kind: RiskComponentKind::Tolerance,
                score: round2(tolerance),
                max: weights.tolerance_max(),
            },
            RiskComponent {
                kind: RiskComponentKind::Requirement,
                score: round2(requirement),
                max: weights.requirement_max(),
            },
        ],
        total: round2(total),
        scale_max: weights.capacity_max() + weights.tolerance_max() + weights.requirement_max(),
    }
}

fn five_component(
    answers: &AnswerSet,
    health: &FinancialHealthResult,
    five: &FiveComponentConfig,
    config: &ScoringConfig,
) -> RiskScoreResult {
    let tiers = &config.tiers;

    let financial = health.score;
    let debt = health
        .debt_quality
        .as_ref()
        .map(|quality| quality.score)
        .unwrap_or_else(|| score_debt_quality(answers, &config.debt, tiers.emi_burden).score);

    let mix = &five.tolerance_mix;
    let esg_adjustment = answers
        .esg_importance
        .and_then(|tier| {
            five.esg_adjustments
                .get(tiers.esg_importance.offset(tier))
                .copied()
        })
        .unwrap_or(0.0);
    let tolerance = (mix.risk_behavior
        * tier_percent(answers.risk_behavior, tiers.risk_behavior, false)
        + mix.loss_capacity * tier_percent(answers.loss_capacity, tiers.loss_capacity, false)
        + mix.experience * tier_percent(answers.experience, tiers.experience, false)
        + esg_adjustment)
        .clamp(0.0, 100.0);

    let horizon = (five.horizon_mix.horizon
        * tier_percent(answers.time_horizon, tiers.time_horizon, false)
        + five.horizon_mix.liquidity
            * tier_percent(answers.liquidity_need.tier(), TierRange::new(1, 3), false)
        + five.goal_bonus.bonus(answers.purpose, answers.goal_timing))
    .clamp(0.0, 100.0);

    let knowledge = tier_percent(answers.knowledge, tiers.knowledge, false);

    let weights = &five.weights;
    let total = weights.financial * financial
        + weights.debt * debt
        + weights.tolerance * tolerance
        + weights.horizon * horizon
        + weights.knowledge * knowledge;

    let component = |kind, score: f64| RiskComponent {
        kind,
        score: round2(score),
        max: 100.0,
    };

    RiskScoreResult {
        components: vec![
            component(RiskComponentKind::Financial, financial),
            component(RiskComponentKind::Debt, debt),
            component(RiskComponentKind::Tolerance, tolerance),
            component(RiskComponentKind::Horizon, horizon),
            component(RiskComponentKind::Knowledge, knowledge),
        ],
        total: round2(total),
        scale_max: 100.0,
    }
}
