use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::super::domain::{InflationStrategy, InvestmentPurpose};

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Highest tier any questionnaire item may offer.
pub const MAX_TIER: u8 = 20;

/// Named rule set. v3 is the canonical profile; v1 and v2 replay the earlier tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringProfile {
    V1,
    V2,
    #[default]
    V3,
}

impl ScoringProfile {
    pub fn label(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoringProfile {
    type Err = ScoringConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            other => Err(ScoringConfigError::UnknownProfile(other.to_string())),
        }
    }
}

/// Inclusive 1-indexed range accepted for an ordinal answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRange {
    pub min: u8,
    pub max: u8,
}

impl TierRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, tier: u8) -> bool {
        (self.min..=self.max).contains(&tier)
    }

    /// Neutral default used when an answer is missing.
    pub fn midpoint(&self) -> u8 {
        let mid = (u16::from(self.min) + u16::from(self.max)) / 2;
        u8::try_from(mid).unwrap_or(self.max)
    }

    pub fn len(&self) -> usize {
        usize::from(self.max - self.min) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// Zero-based position of `tier` inside the range, for lookup tables.
    pub fn offset(&self, tier: u8) -> usize {
        usize::from(tier.clamp(self.min, self.max) - self.min)
    }
}

/// Accepted ranges for every ordinal answer of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRanges {
    pub emergency_fund: TierRange,
    pub age_group: TierRange,
    pub time_horizon: TierRange,
    pub risk_behavior: TierRange,
    pub experience: TierRange,
    pub knowledge: TierRange,
    pub loss_capacity: TierRange,
    pub income_stability: TierRange,
    pub dependents: TierRange,
    pub emi_burden: TierRange,
    pub goal_timing: TierRange,
    pub esg_importance: TierRange,
}

impl TierRanges {
    fn classic() -> Self {
        Self {
            emergency_fund: TierRange::new(1, 5),
            age_group: TierRange::new(1, 5),
            time_horizon: TierRange::new(1, 5),
            risk_behavior: TierRange::new(1, 5),
            experience: TierRange::new(1, 5),
            knowledge: TierRange::new(1, 5),
            loss_capacity: TierRange::new(1, 4),
            income_stability: TierRange::new(1, 5),
            dependents: TierRange::new(1, 5),
            emi_burden: TierRange::new(1, 4),
            goal_timing: TierRange::new(1, 3),
            esg_importance: TierRange::new(1, 4),
        }
    }

    fn ranged() -> Self {
        Self {
            emergency_fund: TierRange::new(1, 6),
            ..Self::classic()
        }
    }

    fn all(&self) -> [(&'static str, TierRange); 12] {
        [
            ("emergency_fund", self.emergency_fund),
            ("age_group", self.age_group),
            ("time_horizon", self.time_horizon),
            ("risk_behavior", self.risk_behavior),
            ("experience", self.experience),
            ("knowledge", self.knowledge),
            ("loss_capacity", self.loss_capacity),
            ("income_stability", self.income_stability),
            ("dependents", self.dependents),
            ("emi_burden", self.emi_burden),
            ("goal_timing", self.goal_timing),
            ("esg_importance", self.esg_importance),
        ]
    }
}

/// Savings-rate breakpoints mapping the rate onto tiers 1-5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsBreakpoints(pub [f64; 4]);

impl Default for SavingsBreakpoints {
    fn default() -> Self {
        Self([0.10, 0.20, 0.30, 0.40])
    }
}

/// Where the income-stability factor of the classic health score comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStabilitySource {
    /// Fixed component value (0-100).
    Assumed(f64),
    /// Derived from the income-stability answer as tier/5.
    Answered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicHealthWeights {
    pub emergency: f64,
    pub debt: f64,
    pub savings: f64,
    pub income_stability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedHealthWeights {
    pub emergency: f64,
    pub savings: f64,
    pub debt_quality: f64,
    pub income_stability: f64,
    pub dependents: f64,
}

/// Financial health formula family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthModel {
    Classic {
        weights: ClassicHealthWeights,
        income_stability: IncomeStabilitySource,
    },
    Ranged {
        weights: RangedHealthWeights,
    },
}

/// Loan classification and EMI lookup for the debt quality scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtQualityConfig {
    pub base_score: f64,
    pub good_loan_bonus: f64,
    pub bad_loan_penalty: f64,
    pub neutral_loan_bonus: f64,
    /// EMI burden tier 1-4 to score.
    pub emi_scores: Vec<f64>,
    pub loan_type_share: f64,
    pub emi_share: f64,
}

impl Default for DebtQualityConfig {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            good_loan_bonus: 20.0,
            bad_loan_penalty: 30.0,
            neutral_loan_bonus: 5.0,
            emi_scores: vec![100.0, 75.0, 50.0, 25.0],
            loan_type_share: 0.6,
            emi_share: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityWeights {
    pub age: f64,
    pub savings: f64,
    pub debt: f64,
    pub emergency: f64,
    pub horizon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceWeights {
    pub risk_behavior: f64,
    pub experience: f64,
    pub loss_capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementWeights {
    pub purpose: f64,
    pub goal_priority: f64,
}

/// Point weights of the 90-point, three component model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeComponentWeights {
    pub capacity: CapacityWeights,
    pub tolerance: ToleranceWeights,
    pub requirement: RequirementWeights,
}

impl ThreeComponentWeights {
    pub fn capacity_max(&self) -> f64 {
        let w = &self.capacity;
        w.age + w.savings + w.debt + w.emergency + w.horizon
    }

    pub fn tolerance_max(&self) -> f64 {
        let w = &self.tolerance;
        w.risk_behavior + w.experience + w.loss_capacity
    }

    pub fn requirement_max(&self) -> f64 {
        self.requirement.purpose + self.requirement.goal_priority
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveComponentWeights {
    pub financial: f64,
    pub debt: f64,
    pub tolerance: f64,
    pub horizon: f64,
    pub knowledge: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceMix {
    pub risk_behavior: f64,
    pub loss_capacity: f64,
    pub experience: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonMix {
    pub horizon: f64,
    pub liquidity: f64,
}

/// Goal-specific adjustment keyed by the goal-timing follow-up (tiers 1-3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalBonusTable {
    pub retirement: [f64; 3],
    pub education: [f64; 3],
    pub wealth_creation: [f64; 3],
}

impl GoalBonusTable {
    pub fn bonus(&self, purpose: InvestmentPurpose, goal_timing: u8) -> f64 {
        let slot = usize::from(goal_timing.clamp(1, 3) - 1);
        match purpose {
            InvestmentPurpose::Retirement => self.retirement[slot],
            InvestmentPurpose::EducationTaxSaving => self.education[slot],
            InvestmentPurpose::WealthCreation => self.wealth_creation[slot],
            InvestmentPurpose::CapitalPreservation | InvestmentPurpose::RegularIncome => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveComponentConfig {
    pub weights: FiveComponentWeights,
    pub tolerance_mix: ToleranceMix,
    pub horizon_mix: HorizonMix,
    /// ESG-importance tier 1-4 to (non-positive) tolerance adjustment.
    pub esg_adjustments: Vec<f64>,
    pub goal_bonus: GoalBonusTable,
}

/// Risk score formula family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskModel {
    ThreeComponent(ThreeComponentWeights),
    FiveComponent(FiveComponentConfig),
}

/// Inclusive upper bounds for VERY_LOW, LOW, MEDIUM and HIGH; anything above is VERY_HIGH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub upper_bounds: [f64; 4],
    pub scale_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideConfig {
    pub min_emergency_tier: u8,
    pub contradiction_risk_floor: u8,
    pub contradiction_tier_ceiling: u8,
    pub growth_income_floor: f64,
    pub contradiction_limit: u8,
    /// Age-group tier 1-5 to the reference age.
    pub reference_ages: Vec<u8>,
    /// Category index 1-5 to the implied equity percentage.
    pub index_equity: Vec<f64>,
    pub age_equity_slack: f64,
    /// Category index 1-5 to Large/Mid/Small/Growth preview percentages.
    pub preview_allocation: Vec<[f64; 4]>,
    pub concentration_limit: f64,
    pub income_floor: f64,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            min_emergency_tier: 3,
            contradiction_risk_floor: 4,
            contradiction_tier_ceiling: 2,
            growth_income_floor: 50_000.0,
            contradiction_limit: 2,
            reference_ages: vec![60, 50, 40, 30, 22],
            index_equity: vec![20.0, 40.0, 60.0, 80.0, 90.0],
            age_equity_slack: 15.0,
            preview_allocation: classic_allocation_table(),
            concentration_limit: 45.0,
            income_floor: 25_000.0,
        }
    }
}

/// Per-inflation-strategy dial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationDial {
    pub growth: f64,
    pub balanced: f64,
    pub protection: f64,
}

impl InflationDial {
    pub fn get(&self, strategy: InflationStrategy) -> f64 {
        match strategy {
            InflationStrategy::Growth => self.growth,
            InflationStrategy::Balanced => self.balanced,
            InflationStrategy::Protection => self.protection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeAdjustedAllocation {
    /// Age-group tier 1-5 to base equity percentage.
    pub age_equity: Vec<f64>,
    pub base_factor: f64,
    pub score_factor: f64,
    pub inflation_multiplier: InflationDial,
    pub inflation_reserve: InflationDial,
    /// Score bracket (mirroring the category thresholds) to Large/Mid/Small/Growth ratios.
    pub bracket_splits: Vec<[f64; 4]>,
}

/// Allocation formula family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationModel {
    /// Category index 1-5 to Large/Mid/Small/Growth percentages.
    Table(Vec<[f64; 4]>),
    AgeAdjusted(AgeAdjustedAllocation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub model: AllocationModel,
    /// Rounding drift absorbed by the largest bucket; larger gaps are rescaled first.
    pub drift_tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityConfig {
    pub blocking_emi_tier: u8,
    pub blocked_emergency_share: f64,
    pub blocked_debt_share: f64,
    /// Dependents tier 1-5 to investment-rate multiplier.
    pub dependents_multipliers: Vec<f64>,
    /// Income-stability tier 1-5 to investment-rate multiplier.
    pub stability_multipliers: Vec<f64>,
    /// EMI tier 1-4 to share of disposable income steered to debt.
    pub emi_stress_share: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Emergency tier (profile range) to months of expenses already saved.
    pub emergency_months: Vec<f64>,
    pub target_months: f64,
    pub initial_timeline_months: u32,
    pub min_timeline_months: u32,
    pub max_timeline_months: u32,
    pub max_emergency_share: f64,
    pub debt_payment_rate: f64,
    /// Health-score breakpoints for the investment-rate step function.
    pub rate_breakpoints: [f64; 3],
    pub rates: [f64; 4],
    pub minimum_investment: f64,
    pub suitability: Option<SuitabilityConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    pub base: u8,
    pub penalty: u8,
    pub floor: u8,
    pub low_health: f64,
    pub override_limit: usize,
    pub contradiction_limit: u8,
    pub low_investment: f64,
    pub high_level: u8,
    pub medium_level: u8,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base: 90,
            penalty: 10,
            floor: 40,
            low_health: 50.0,
            override_limit: 3,
            contradiction_limit: 2,
            low_investment: 1_000.0,
            high_level: 80,
            medium_level: 60,
        }
    }
}

/// Every weight, threshold and lookup table the pipeline reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub profile: ScoringProfile,
    pub tiers: TierRanges,
    pub savings_breakpoints: SavingsBreakpoints,
    pub health: HealthModel,
    pub debt: DebtQualityConfig,
    pub risk: RiskModel,
    pub categories: CategoryThresholds,
    pub overrides: OverrideConfig,
    pub allocation: AllocationConfig,
    pub sizing: SizingConfig,
    pub confidence: ConfidenceConfig,
}

fn classic_allocation_table() -> Vec<[f64; 4]> {
    vec![
        [85.0, 15.0, 0.0, 0.0],
        [70.0, 25.0, 0.0, 5.0],
        [50.0, 30.0, 10.0, 10.0],
        [35.0, 30.0, 15.0, 20.0],
        [20.0, 25.0, 25.0, 30.0],
    ]
}

fn classic_sizing() -> SizingConfig {
    SizingConfig {
        emergency_months: vec![0.0, 1.0, 2.0, 4.5, 8.0],
        target_months: 6.0,
        initial_timeline_months: 12,
        min_timeline_months: 3,
        max_timeline_months: 24,
        max_emergency_share: 0.4,
        debt_payment_rate: 0.03,
        rate_breakpoints: [50.0, 70.0, 85.0],
        rates: [0.10, 0.20, 0.30, 0.40],
        minimum_investment: 500.0,
        suitability: None,
    }
}

fn classic_health(income_stability: IncomeStabilitySource) -> HealthModel {
    HealthModel::Classic {
        weights: ClassicHealthWeights {
            emergency: 0.35,
            debt: 0.25,
            savings: 0.20,
            income_stability: 0.20,
        },
        income_stability,
    }
}

fn three_component_weights() -> ThreeComponentWeights {
    ThreeComponentWeights {
        capacity: CapacityWeights {
            age: 8.0,
            savings: 6.0,
            debt: 6.0,
            emergency: 10.0,
            horizon: 10.0,
        },
        tolerance: ToleranceWeights {
            risk_behavior: 15.0,
            experience: 10.0,
            loss_capacity: 5.0,
        },
        requirement: RequirementWeights {
            purpose: 15.0,
            goal_priority: 5.0,
        },
    }
}

impl ScoringConfig {
    pub fn for_profile(profile: ScoringProfile) -> Self {
        match profile {
            ScoringProfile::V1 => Self::v1(),
            ScoringProfile::V2 => Self::v2(),
            ScoringProfile::V3 => Self::v3(),
        }
    }

    /// Original 90-point rule set with an assumed stable income.
    pub fn v1() -> Self {
        Self {
            profile: ScoringProfile::V1,
            tiers: TierRanges::classic(),
            savings_breakpoints: SavingsBreakpoints::default(),
            health: classic_health(IncomeStabilitySource::Assumed(100.0)),
            debt: DebtQualityConfig::default(),
            risk: RiskModel::ThreeComponent(three_component_weights()),
            categories: CategoryThresholds {
                upper_bounds: [30.0, 45.0, 60.0, 75.0],
                scale_max: 90.0,
            },
            overrides: OverrideConfig::default(),
            allocation: AllocationConfig {
                model: AllocationModel::Table(classic_allocation_table()),
                drift_tolerance: 0.5,
            },
            sizing: classic_sizing(),
            confidence: ConfidenceConfig::default(),
        }
    }

    /// v1 tables with the income-stability answer feeding the health score.
    pub fn v2() -> Self {
        Self {
            profile: ScoringProfile::V2,
            health: classic_health(IncomeStabilitySource::Answered),
            ..Self::v1()
        }
    }

    /// 100-point rule set with debt quality, ESG, inflation and dependents.
    pub fn v3() -> Self {
        Self {
            profile: ScoringProfile::V3,
            tiers: TierRanges::ranged(),
            savings_breakpoints: SavingsBreakpoints::default(),
            health: HealthModel::Ranged {
                weights: RangedHealthWeights {
                    emergency: 0.30,
                    savings: 0.20,
                    debt_quality: 0.20,
                    income_stability: 0.15,
                    dependents: 0.15,
                },
            },
            debt: DebtQualityConfig::default(),
            risk: RiskModel::FiveComponent(FiveComponentConfig {
                weights: FiveComponentWeights {
                    financial: 0.25,
                    debt: 0.15,
                    tolerance: 0.25,
                    horizon: 0.20,
                    knowledge: 0.15,
                },
                tolerance_mix: ToleranceMix {
                    risk_behavior: 0.4,
                    loss_capacity: 0.3,
                    experience: 0.3,
                },
                horizon_mix: HorizonMix {
                    horizon: 0.7,
                    liquidity: 0.3,
                },
                esg_adjustments: vec![0.0, -5.0, -10.0, -20.0],
                goal_bonus: GoalBonusTable {
                    retirement: [-15.0, 0.0, 10.0],
                    education: [-20.0, -5.0, 5.0],
                    wealth_creation: [-5.0, 0.0, 10.0],
                },
            }),
            categories: CategoryThresholds {
                upper_bounds: [20.0, 40.0, 60.0, 80.0],
                scale_max: 100.0,
            },
            overrides: OverrideConfig::default(),
            allocation: AllocationConfig {
                model: AllocationModel::AgeAdjusted(AgeAdjustedAllocation {
                    age_equity: vec![35.0, 50.0, 65.0, 80.0, 90.0],
                    base_factor: 0.6,
                    score_factor: 0.4,
                    inflation_multiplier: InflationDial {
                        growth: 1.0,
                        balanced: 0.8,
                        protection: 0.6,
                    },
                    inflation_reserve: InflationDial {
                        growth: 0.0,
                        balanced: 10.0,
                        protection: 20.0,
                    },
                    bracket_splits: vec![
                        [80.0, 20.0, 0.0, 0.0],
                        [65.0, 25.0, 5.0, 5.0],
                        [50.0, 30.0, 10.0, 10.0],
                        [40.0, 30.0, 15.0, 15.0],
                        [30.0, 25.0, 20.0, 25.0],
                    ],
                }),
                drift_tolerance: 0.5,
            },
            sizing: SizingConfig {
                emergency_months: vec![0.0, 0.5, 2.0, 4.5, 9.0, 12.0],
                suitability: Some(SuitabilityConfig {
                    blocking_emi_tier: 4,
                    blocked_emergency_share: 0.5,
                    blocked_debt_share: 0.3,
                    dependents_multipliers: vec![1.0, 0.9, 0.8, 0.7, 0.6],
                    stability_multipliers: vec![0.6, 0.7, 0.8, 0.9, 1.0],
                    emi_stress_share: vec![0.0, 0.10, 0.20, 0.30],
                }),
                ..classic_sizing()
            },
            confidence: ConfidenceConfig::default(),
        }
    }

    /// Reject tables that would make the pipeline substitute defaults mid-computation.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        for (field, range) in self.tiers.all() {
            if range.min == 0 || range.is_empty() || range.max > MAX_TIER {
                return Err(ScoringConfigError::InvalidTierRange { field });
            }
        }

        match &self.health {
            HealthModel::Classic { weights, .. } => check_weights(
                "health",
                &[
                    weights.emergency,
                    weights.debt,
                    weights.savings,
                    weights.income_stability,
                ],
            )?,
            HealthModel::Ranged { weights } => check_weights(
                "health",
                &[
                    weights.emergency,
                    weights.savings,
                    weights.debt_quality,
                    weights.income_stability,
                    weights.dependents,
                ],
            )?,
        }

        check_weights(
            "debt_quality",
            &[self.debt.loan_type_share, self.debt.emi_share],
        )?;
        check_len(
            "debt_quality.emi_scores",
            &self.debt.emi_scores,
            self.tiers.emi_burden.len(),
        )?;

        if let RiskModel::FiveComponent(five) = &self.risk {
            let w = &five.weights;
            check_weights(
                "risk",
                &[w.financial, w.debt, w.tolerance, w.horizon, w.knowledge],
            )?;
            let mix = &five.tolerance_mix;
            check_weights(
                "risk.tolerance_mix",
                &[mix.risk_behavior, mix.loss_capacity, mix.experience],
            )?;
            check_weights(
                "risk.horizon_mix",
                &[five.horizon_mix.horizon, five.horizon_mix.liquidity],
            )?;
            check_len(
                "risk.esg_adjustments",
                &five.esg_adjustments,
                self.tiers.esg_importance.len(),
            )?;
        }

        check_ascending("categories", &self.categories.upper_bounds)?;
        check_ascending("sizing.rate_breakpoints", &self.sizing.rate_breakpoints)?;
        check_ascending("savings_breakpoints", &self.savings_breakpoints.0)?;

        let overrides = &self.overrides;
        check_len(
            "overrides.reference_ages",
            &overrides.reference_ages,
            self.tiers.age_group.len(),
        )?;
        check_len("overrides.index_equity", &overrides.index_equity, 5)?;
        check_len(
            "overrides.preview_allocation",
            &overrides.preview_allocation,
            5,
        )?;

        match &self.allocation.model {
            AllocationModel::Table(rows) => {
                check_len("allocation.table", rows, 5)?;
                for row in rows {
                    check_percentages("allocation.table", row)?;
                }
            }
            AllocationModel::AgeAdjusted(adjusted) => {
                check_len(
                    "allocation.age_equity",
                    &adjusted.age_equity,
                    self.tiers.age_group.len(),
                )?;
                check_len("allocation.bracket_splits", &adjusted.bracket_splits, 5)?;
                for row in &adjusted.bracket_splits {
                    check_percentages("allocation.bracket_splits", row)?;
                }
            }
        }

        let sizing = &self.sizing;
        if sizing.min_timeline_months == 0
            || sizing.min_timeline_months > sizing.initial_timeline_months
            || sizing.initial_timeline_months > sizing.max_timeline_months
        {
            return Err(ScoringConfigError::ThresholdsNotAscending {
                table: "sizing.timeline_months",
            });
        }
        check_len(
            "sizing.emergency_months",
            &self.sizing.emergency_months,
            self.tiers.emergency_fund.len(),
        )?;
        if let Some(suitability) = &self.sizing.suitability {
            check_len(
                "sizing.dependents_multipliers",
                &suitability.dependents_multipliers,
                self.tiers.dependents.len(),
            )?;
            check_len(
                "sizing.stability_multipliers",
                &suitability.stability_multipliers,
                self.tiers.income_stability.len(),
            )?;
            check_len(
                "sizing.emi_stress_share",
                &suitability.emi_stress_share,
                self.tiers.emi_burden.len(),
            )?;
        }

        Ok(())
    }
}

fn check_weights(table: &'static str, weights: &[f64]) -> Result<(), ScoringConfigError> {
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE || weights.iter().any(|w| *w < 0.0) {
        return Err(ScoringConfigError::WeightsDoNotSumToOne { table, sum });
    }
    Ok(())
}

fn check_len<T>(
    table: &'static str,
    rows: &[T],
    expected: usize,
) -> Result<(), ScoringConfigError> {
    if rows.len() != expected {
        return Err(ScoringConfigError::MissingLookupEntry {
            table,
            expected,
            found: rows.len(),
        });
    }
    Ok(())
}

fn check_ascending(table: &'static str, bounds: &[f64]) -> Result<(), ScoringConfigError> {
    if bounds.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ScoringConfigError::ThresholdsNotAscending { table });
    }
    Ok(())
}

fn check_percentages(table: &'static str, row: &[f64; 4]) -> Result<(), ScoringConfigError> {
    let sum: f64 = row.iter().sum();
    if (sum - 100.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScoringConfigError::RowDoesNotSumToHundred { table, sum });
    }
    Ok(())
}

/// Configuration defects detected when the engine is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("unknown scoring profile '{0}' (expected v1, v2 or v3)")]
    UnknownProfile(String),
    #[error("{table} weights must sum to 1.0 (found {sum:.4})")]
    WeightsDoNotSumToOne { table: &'static str, sum: f64 },
    #[error("{table} row must sum to 100 (found {sum:.2})")]
    RowDoesNotSumToHundred { table: &'static str, sum: f64 },
    #[error("{table} thresholds must be strictly ascending")]
    ThresholdsNotAscending { table: &'static str },
    #[error("{table} lookup needs {expected} entries, found {found}")]
    MissingLookupEntry {
        table: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("tier range for {field} must be non-empty and lie within 1..={MAX_TIER}")]
    InvalidTierRange { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_validate() {
        for profile in [ScoringProfile::V1, ScoringProfile::V2, ScoringProfile::V3] {
            ScoringConfig::for_profile(profile)
                .validate()
                .unwrap_or_else(|err| panic!("{profile} should validate: {err}"));
        }
    }

    #[test]
    fn rejects_health_weights_that_do_not_sum_to_one() {
        let mut config = ScoringConfig::v1();
        if let HealthModel::Classic { weights, .. } = &mut config.health {
            weights.emergency = 0.5;
        }

        match config.validate() {
            Err(ScoringConfigError::WeightsDoNotSumToOne { table, .. }) => {
                assert_eq!(table, "health")
            }
            other => panic!("expected weight error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_emergency_month_rows() {
        let mut config = ScoringConfig::v3();
        config.sizing.emergency_months.pop();

        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::MissingLookupEntry {
                table: "sizing.emergency_months",
                expected: 6,
                found: 5,
            })
        ));
    }

    #[test]
    fn rejects_unsorted_category_thresholds() {
        let mut config = ScoringConfig::v3();
        config.categories.upper_bounds = [20.0, 60.0, 40.0, 80.0];
        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::ThresholdsNotAscending { .. })
        ));
    }

    #[test]
    fn parses_profile_names() {
        assert_eq!("V1".parse::<ScoringProfile>(), Ok(ScoringProfile::V1));
        assert_eq!(" v3 ".parse::<ScoringProfile>(), Ok(ScoringProfile::V3));
        assert!("v9".parse::<ScoringProfile>().is_err());
    }

    #[test]
    fn midpoint_matches_documented_defaults() {
        let tiers = ScoringConfig::v3().tiers;
        assert_eq!(tiers.emergency_fund.midpoint(), 3);
        assert_eq!(tiers.loss_capacity.midpoint(), 2);
        assert_eq!(tiers.goal_timing.midpoint(), 2);
        assert_eq!(TierRange::new(200, 250).midpoint(), 225);
    }

    #[test]
    fn rejects_tier_ranges_beyond_the_questionnaire_limit() {
        let mut config = ScoringConfig::v3();
        config.tiers.dependents = TierRange::new(1, 200);

        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::InvalidTierRange {
                field: "dependents",
            })
        ));
    }
}
