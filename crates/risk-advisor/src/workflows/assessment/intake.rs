use std::fmt;

use super::domain::{
    AnswerSet, AnswerSubmission, Choice, GoalPriority, InflationStrategy, InvestmentPurpose,
    LiquidityNeed, TierCoded,
};
use super::scoring::{ScoringConfig, TierRange, TierRanges};

/// A single reason a submission could not become an answer set.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldViolation {
    Missing { field: &'static str },
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u8,
        max: u8,
    },
    UnknownChoice {
        field: &'static str,
        value: String,
    },
    NegativeAmount {
        field: &'static str,
        value: f64,
    },
    NonFinite {
        field: &'static str,
    },
}

impl FieldViolation {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::OutOfRange { field, .. }
            | Self::UnknownChoice { field, .. }
            | Self::NegativeAmount { field, .. }
            | Self::NonFinite { field } => field,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field} is required"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be between {min} and {max} (found {value})"),
            Self::UnknownChoice { field, value } => {
                write!(f, "{field} does not accept \"{value}\"")
            }
            Self::NegativeAmount { field, value } => {
                write!(f, "{field} must not be negative (found {value})")
            }
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
        }
    }
}

/// Every violation found in a submission; no partial answer set is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("submission rejected: {}", render(.violations))]
pub struct IntakeError {
    pub violations: Vec<FieldViolation>,
}

fn render(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Guard responsible for producing `AnswerSet` instances for one profile's tier ranges.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    ranges: TierRanges,
}

impl IntakeGuard {
    pub fn with_ranges(ranges: TierRanges) -> Self {
        Self { ranges }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::with_ranges(config.tiers.clone())
    }

    /// Validate a raw submission, filling unanswered tiers with their neutral midpoint
    /// (the choice answers default to their middle option as well).
    pub fn answer_set_from_submission(
        &self,
        submission: AnswerSubmission,
    ) -> Result<AnswerSet, IntakeError> {
        let mut violations = Vec::new();
        let ranges = &self.ranges;

        let monthly_income = required_amount(
            "monthly_income",
            submission.monthly_income,
            &mut violations,
        );
        let monthly_expenses = required_amount(
            "monthly_expenses",
            submission.monthly_expenses,
            &mut violations,
        );
        let high_interest_debt = optional_amount(
            "high_interest_debt",
            submission.high_interest_debt,
            &mut violations,
        );

        let mut tier = |field: &'static str, value: Option<i64>, range: TierRange| {
            tier_or_default(field, value, range, &mut violations)
        };
        let emergency_fund = tier(
            "emergency_fund",
            submission.emergency_fund,
            ranges.emergency_fund,
        );
        let age_group = tier("age_group", submission.age_group, ranges.age_group);
        let time_horizon = tier("time_horizon", submission.time_horizon, ranges.time_horizon);
        let risk_behavior = tier(
            "risk_behavior",
            submission.risk_behavior,
            ranges.risk_behavior,
        );
        let experience = tier("experience", submission.experience, ranges.experience);
        let knowledge = tier("knowledge", submission.knowledge, ranges.knowledge);
        let loss_capacity = tier(
            "loss_capacity",
            submission.loss_capacity,
            ranges.loss_capacity,
        );
        let income_stability = tier(
            "income_stability",
            submission.income_stability,
            ranges.income_stability,
        );
        let dependents = tier("dependents", submission.dependents, ranges.dependents);
        let emi_burden = tier("emi_burden", submission.emi_burden, ranges.emi_burden);
        let goal_timing = tier("goal_timing", submission.goal_timing, ranges.goal_timing);

        let esg_range = ranges.esg_importance;
        let esg_importance = submission.esg_importance.and_then(|value| {
            let tier = in_range(value, esg_range);
            if tier.is_none() {
                violations.push(out_of_range("esg_importance", value, esg_range));
            }
            tier
        });

        let purpose = choice_or_default(
            "purpose",
            submission.purpose,
            InvestmentPurpose::EducationTaxSaving,
            &mut violations,
        );
        let goal_priority = choice_or_default(
            "goal_priority",
            submission.goal_priority,
            GoalPriority::Important,
            &mut violations,
        );
        let liquidity_need = choice_or_default(
            "liquidity_need",
            submission.liquidity_need,
            LiquidityNeed::Medium,
            &mut violations,
        );
        let inflation_strategy = choice_or_default(
            "inflation_strategy",
            submission.inflation_strategy,
            InflationStrategy::default(),
            &mut violations,
        );

        if !violations.is_empty() {
            return Err(IntakeError { violations });
        }

        Ok(AnswerSet {
            monthly_income,
            monthly_expenses,
            emergency_fund,
            high_interest_debt,
            loans: submission.loans,
            age_group,
            purpose,
            time_horizon,
            risk_behavior,
            experience,
            knowledge,
            goal_priority,
            loss_capacity,
            liquidity_need,
            income_stability,
            dependents,
            emi_burden,
            goal_timing,
            esg_importance,
            inflation_strategy,
        })
    }
}

fn out_of_range(field: &'static str, value: i64, range: TierRange) -> FieldViolation {
    FieldViolation::OutOfRange {
        field,
        value,
        min: range.min,
        max: range.max,
    }
}

fn in_range(value: i64, range: TierRange) -> Option<u8> {
    u8::try_from(value).ok().filter(|tier| range.contains(*tier))
}

fn tier_or_default(
    field: &'static str,
    value: Option<i64>,
    range: TierRange,
    violations: &mut Vec<FieldViolation>,
) -> u8 {
    let Some(value) = value else {
        return range.midpoint();
    };
    in_range(value, range).unwrap_or_else(|| {
        violations.push(out_of_range(field, value, range));
        range.midpoint()
    })
}

fn choice_or_default<T: TierCoded>(
    field: &'static str,
    value: Option<Choice<T>>,
    default: T,
    violations: &mut Vec<FieldViolation>,
) -> T {
    match value {
        None => default,
        Some(Choice::Known(choice)) => choice,
        Some(Choice::Tier(value)) => u8::try_from(value)
            .ok()
            .and_then(T::from_tier)
            .unwrap_or_else(|| {
                violations.push(out_of_range(field, value, TierRange::new(1, T::TIERS)));
                default
            }),
        Some(Choice::Unrecognised(label)) => {
            violations.push(FieldViolation::UnknownChoice {
                field,
                value: label,
            });
            default
        }
    }
}

fn required_amount(
    field: &'static str,
    value: Option<f64>,
    violations: &mut Vec<FieldViolation>,
) -> f64 {
    match value {
        Some(amount) => checked_amount(field, amount, violations),
        None => {
            violations.push(FieldViolation::Missing { field });
            0.0
        }
    }
}

fn optional_amount(
    field: &'static str,
    value: Option<f64>,
    violations: &mut Vec<FieldViolation>,
) -> f64 {
    value
        .map(|amount| checked_amount(field, amount, violations))
        .unwrap_or(0.0)
}

fn checked_amount(field: &'static str, amount: f64, violations: &mut Vec<FieldViolation>) -> f64 {
    if !amount.is_finite() {
        violations.push(FieldViolation::NonFinite { field });
        0.0
    } else if amount < 0.0 {
        violations.push(FieldViolation::NegativeAmount {
            field,
            value: amount,
        });
        0.0
    } else {
        amount
    }
}
