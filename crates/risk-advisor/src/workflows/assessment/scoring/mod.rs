pub(crate) mod allocation;
mod category;
pub(crate) mod confidence;
mod config;
pub(crate) mod debt;
pub(crate) mod health;
pub(crate) mod overrides;
pub(crate) mod risk;
mod scale;
pub(crate) mod sizing;

pub use allocation::Allocation;
pub use category::{classify, upper_bound, RiskCategory};
pub use confidence::{ConfidenceLevel, ConfidenceScore};
pub use config::{
    AgeAdjustedAllocation, AllocationConfig, AllocationModel, CapacityWeights,
    CategoryThresholds, ClassicHealthWeights, ConfidenceConfig, DebtQualityConfig,
    FiveComponentConfig, FiveComponentWeights, GoalBonusTable, HealthModel, HorizonMix,
    IncomeStabilitySource, InflationDial, OverrideConfig, RangedHealthWeights,
    RequirementWeights, RiskModel, SavingsBreakpoints, ScoringConfig, ScoringConfigError,
    ScoringProfile, SizingConfig, SuitabilityConfig, ThreeComponentWeights, TierRange,
    TierRanges, ToleranceMix, ToleranceWeights,
};
pub use debt::DebtQualityResult;
pub use health::{FinancialHealthResult, HealthComponent, HealthFactor};
pub use overrides::{OverrideEntry, OverrideKind, OverrideOutcome};
pub use risk::{RiskComponent, RiskComponentKind, RiskScoreResult};
pub use sizing::{InvestmentPlan, RateConfidence, SuitabilityVerdict};

use serde::Serialize;

use super::domain::AnswerSet;

/// Stateless evaluator that runs an answer set through the configured rule set.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    config: ScoringConfig,
}

impl AssessmentEngine {
    /// Build an engine, rejecting configurations with broken weights or lookup tables.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn for_profile(profile: ScoringProfile) -> Result<Self, ScoringConfigError> {
        Self::new(ScoringConfig::for_profile(profile))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> AssessmentResult {
        let config = &self.config;

        let health = health::score_health(answers, config);
        let risk = risk::score_risk(answers, &health, config);
        let initial_category = classify(risk.total, &config.categories);
        let overrides = overrides::apply_overrides(initial_category, answers, &config.overrides);
        let allocation = allocation::allocate(answers, risk.total, &overrides, config);
        let investment = sizing::size_investment(answers, &health, config);
        let confidence = confidence::score_confidence(
            health.score,
            overrides.log.len(),
            overrides.contradictions,
            investment.safe_monthly_investment,
            &config.confidence,
        );

        AssessmentResult {
            profile: config.profile,
            answers: answers.clone(),
            health,
            risk,
            overrides,
            allocation,
            investment,
            confidence,
        }
    }
}

/// Everything one evaluation produces. Carries no clock-dependent data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    pub profile: ScoringProfile,
    pub answers: AnswerSet,
    pub health: FinancialHealthResult,
    pub risk: RiskScoreResult,
    pub overrides: OverrideOutcome,
    pub allocation: Allocation,
    pub investment: InvestmentPlan,
    pub confidence: ConfidenceScore,
}

impl AssessmentResult {
    pub fn initial_category(&self) -> RiskCategory {
        self.overrides.initial
    }

    pub fn final_category(&self) -> RiskCategory {
        self.overrides.final_category
    }
}

/// One-shot evaluation against an explicit configuration.
pub fn evaluate(
    answers: &AnswerSet,
    config: ScoringConfig,
) -> Result<AssessmentResult, ScoringConfigError> {
    Ok(AssessmentEngine::new(config)?.evaluate(answers))
}
