use serde::{Deserialize, Serialize};

/// Questionnaire answers that are also numbered choices on the form (1 = first option).
pub trait TierCoded: Sized + Copy {
    /// Number of options; valid tiers are `1..=TIERS`.
    const TIERS: u8;

    fn from_tier(tier: u8) -> Option<Self>;

    fn tier(self) -> u8;
}

/// A choice answer as submitted: its label, its tier number, or something unrecognised.
///
/// Only the intake guard decides whether a tier or label is acceptable, so a bad choice is
/// reported next to every other violation instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice<T> {
    Known(T),
    Tier(i64),
    Unrecognised(String),
}

impl<T> From<T> for Choice<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

/// Identifier wrapper for completed assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Primary purpose the user is investing for, ordered from most defensive to most aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentPurpose {
    CapitalPreservation,
    RegularIncome,
    EducationTaxSaving,
    Retirement,
    WealthCreation,
}

impl TierCoded for InvestmentPurpose {
    const TIERS: u8 = 5;

    fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::CapitalPreservation),
            2 => Some(Self::RegularIncome),
            3 => Some(Self::EducationTaxSaving),
            4 => Some(Self::Retirement),
            5 => Some(Self::WealthCreation),
            _ => None,
        }
    }

    fn tier(self) -> u8 {
        match self {
            Self::CapitalPreservation => 1,
            Self::RegularIncome => 2,
            Self::EducationTaxSaving => 3,
            Self::Retirement => 4,
            Self::WealthCreation => 5,
        }
    }
}

impl InvestmentPurpose {
    pub fn label(self) -> &'static str {
        match self {
            Self::CapitalPreservation => "Capital preservation",
            Self::RegularIncome => "Regular income generation",
            Self::EducationTaxSaving => "Education/Tax saving",
            Self::Retirement => "Retirement planning",
            Self::WealthCreation => "Wealth creation/Growth",
        }
    }
}

/// How much the goal can tolerate a shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPriority {
    /// Health or education money that cannot fail.
    Critical,
    /// Wedding or house money that should not fail.
    Important,
    /// Wealth building that can adjust.
    Flexible,
}

impl TierCoded for GoalPriority {
    const TIERS: u8 = 3;

    fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::Critical),
            2 => Some(Self::Important),
            3 => Some(Self::Flexible),
            _ => None,
        }
    }

    fn tier(self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::Important => 2,
            Self::Flexible => 3,
        }
    }
}

/// Likelihood of needing the invested money suddenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityNeed {
    /// May need the money within a year.
    High,
    /// Two to three years out.
    Medium,
    /// More than three years out.
    Low,
}

impl TierCoded for LiquidityNeed {
    const TIERS: u8 = 3;

    fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::High),
            2 => Some(Self::Medium),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    fn tier(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

/// How the user wants the portfolio to respond to inflation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InflationStrategy {
    Growth,
    #[default]
    Balanced,
    Protection,
}

impl TierCoded for InflationStrategy {
    const TIERS: u8 = 3;

    fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Self::Growth),
            2 => Some(Self::Balanced),
            3 => Some(Self::Protection),
            _ => None,
        }
    }

    fn tier(self) -> u8 {
        match self {
            Self::Growth => 1,
            Self::Balanced => 2,
            Self::Protection => 3,
        }
    }
}

impl InflationStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Balanced => "balanced",
            Self::Protection => "protection",
        }
    }
}

/// Declared loan types used by the debt quality scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Home,
    Education,
    Business,
    Personal,
    CreditCard,
    Consumer,
    Payday,
    Gold,
    Property,
}

/// Quality bucket a loan type falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtQuality {
    Good,
    Neutral,
    Bad,
}

impl LoanType {
    pub fn quality(self) -> DebtQuality {
        match self {
            Self::Home | Self::Education | Self::Business => DebtQuality::Good,
            Self::Personal | Self::CreditCard | Self::Consumer | Self::Payday => DebtQuality::Bad,
            Self::Gold | Self::Property => DebtQuality::Neutral,
        }
    }
}

/// Raw questionnaire payload. Every tier is optional so the intake guard owns the default
/// policy; currency amounts for income and expenses are mandatory.
///
/// Tiers are kept as wide integers and choices accept either their label or their tier
/// number, so range problems surface as intake violations rather than parse errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSubmission {
    pub monthly_income: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub emergency_fund: Option<i64>,
    pub high_interest_debt: Option<f64>,
    pub loans: Vec<LoanType>,
    pub age_group: Option<i64>,
    pub purpose: Option<Choice<InvestmentPurpose>>,
    pub time_horizon: Option<i64>,
    pub risk_behavior: Option<i64>,
    pub experience: Option<i64>,
    pub knowledge: Option<i64>,
    pub goal_priority: Option<Choice<GoalPriority>>,
    pub loss_capacity: Option<i64>,
    pub liquidity_need: Option<Choice<LiquidityNeed>>,
    pub income_stability: Option<i64>,
    pub dependents: Option<i64>,
    pub emi_burden: Option<i64>,
    pub goal_timing: Option<i64>,
    pub esg_importance: Option<i64>,
    pub inflation_strategy: Option<Choice<InflationStrategy>>,
}

/// Validated, immutable answers for a single assessment.
///
/// Only the intake guard builds these, which keeps every tier inside the range configured
/// for the active scoring profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct AnswerSet {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub emergency_fund: u8,
    pub high_interest_debt: f64,
    pub loans: Vec<LoanType>,
    pub age_group: u8,
    pub purpose: InvestmentPurpose,
    pub time_horizon: u8,
    pub risk_behavior: u8,
    pub experience: u8,
    pub knowledge: u8,
    pub goal_priority: GoalPriority,
    pub loss_capacity: u8,
    pub liquidity_need: LiquidityNeed,
    pub income_stability: u8,
    pub dependents: u8,
    pub emi_burden: u8,
    pub goal_timing: u8,
    pub esg_importance: Option<u8>,
    pub inflation_strategy: InflationStrategy,
}

impl AnswerSet {
    /// True when the user carries expensive debt, either as a declared amount or as a
    /// loan type classified as bad debt.
    pub fn carries_high_interest_debt(&self) -> bool {
        self.high_interest_debt > 0.0
            || self
                .loans
                .iter()
                .any(|loan| loan.quality() == DebtQuality::Bad)
    }

    pub fn disposable_income(&self) -> f64 {
        (self.monthly_income - self.monthly_expenses).max(0.0)
    }
}

/// Portfolio slice used by the allocation engine and the securities catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetBucket {
    #[serde(rename = "Large_Cap")]
    LargeCap,
    #[serde(rename = "Mid_Cap")]
    MidCap,
    #[serde(rename = "Small_Cap")]
    SmallCap,
    #[serde(rename = "Growth")]
    Growth,
    #[serde(rename = "Inflation_Protection")]
    InflationProtection,
    #[serde(rename = "Fixed_Income")]
    FixedIncome,
}

impl AssetBucket {
    pub const EQUITY: [AssetBucket; 4] = [
        AssetBucket::LargeCap,
        AssetBucket::MidCap,
        AssetBucket::SmallCap,
        AssetBucket::Growth,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::LargeCap => "Large_Cap",
            Self::MidCap => "Mid_Cap",
            Self::SmallCap => "Small_Cap",
            Self::Growth => "Growth",
            Self::InflationProtection => "Inflation_Protection",
            Self::FixedIncome => "Fixed_Income",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LargeCap => "Large Cap Blue Chip",
            Self::MidCap => "Mid Cap",
            Self::SmallCap => "Small Cap",
            Self::Growth => "Growth Stocks",
            Self::InflationProtection => "Inflation Protection",
            Self::FixedIncome => "Fixed Income",
        }
    }
}
