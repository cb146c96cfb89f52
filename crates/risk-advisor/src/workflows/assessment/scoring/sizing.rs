use serde::{Deserialize, Serialize};

use super::super::domain::{AnswerSet, LiquidityNeed};
use super::config::{ScoringConfig, SizingConfig, SuitabilityConfig};
use super::health::FinancialHealthResult;
use super::scale::round2;

/// How much trust the health score puts behind the chosen investment rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateConfidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RateConfidence {
    fn from_slot(slot: usize) -> Self {
        match slot {
            0 => Self::Low,
            1 => Self::Medium,
            2 => Self::High,
            _ => Self::VeryHigh,
        }
    }
}

/// Why investing was blocked, when it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityVerdict {
    pub suitable: bool,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    pub safe_monthly_investment: f64,
    pub annual_investment: f64,
    pub current_emergency_months: f64,
    pub emergency_gap_months: f64,
    pub emergency_gap_amount: f64,
    pub monthly_emergency_saving: f64,
    pub emergency_timeline_months: u32,
    pub monthly_debt_payment: f64,
    /// Ceiling on investment as a percent of disposable income.
    pub investment_rate: f64,
    pub rate_confidence: RateConfidence,
    pub suitability: Option<SuitabilityVerdict>,
}

struct EmergencyPlan {
    monthly_saving: f64,
    timeline_months: u32,
}

pub(crate) fn size_investment(
    answers: &AnswerSet,
    health: &FinancialHealthResult,
    config: &ScoringConfig,
) -> InvestmentPlan {
    let sizing = &config.sizing;
    let disposable = health.disposable_income;

    let current_months = sizing
        .emergency_months
        .get(config.tiers.emergency_fund.offset(answers.emergency_fund))
        .copied()
        .unwrap_or(0.0);
    let gap_months = (sizing.target_months - current_months).max(0.0);
    let gap_amount = gap_months * answers.monthly_expenses;

    let slot = sizing
        .rate_breakpoints
        .iter()
        .position(|bound| health.score < *bound)
        .unwrap_or(sizing.rate_breakpoints.len());
    let base_rate = sizing.rates.get(slot).copied().unwrap_or(0.0);
    let rate_confidence = RateConfidence::from_slot(slot);

    let classic_debt_payment = answers.high_interest_debt * sizing.debt_payment_rate;

    let (rate, debt_payment, emergency, suitability, blocked) = match &sizing.suitability {
        None => (
            base_rate,
            classic_debt_payment,
            plan_emergency(gap_amount, disposable, sizing),
            None,
            false,
        ),
        Some(gate) => {
            let reasons = blocking_reasons(answers, gate, config);
            if reasons.is_empty() {
                let dependents = lookup_offset(
                    &gate.dependents_multipliers,
                    config.tiers.dependents.offset(answers.dependents),
                    1.0,
                );
                let stability = lookup_offset(
                    &gate.stability_multipliers,
                    config.tiers.income_stability.offset(answers.income_stability),
                    1.0,
                );
                let emi_share = lookup_offset(
                    &gate.emi_stress_share,
                    config.tiers.emi_burden.offset(answers.emi_burden),
                    0.0,
                );
                (
                    base_rate * dependents * stability,
                    classic_debt_payment.max(disposable * emi_share),
                    plan_emergency(gap_amount, disposable, sizing),
                    Some(SuitabilityVerdict {
                        suitable: true,
                        reasons,
                    }),
                    false,
                )
            } else {
                let monthly_saving = if gap_amount > 0.0 {
                    disposable * gate.blocked_emergency_share
                } else {
                    0.0
                };
                let timeline_months = if monthly_saving > 0.0 {
                    ((gap_amount / monthly_saving).ceil() as u32)
                        .max(sizing.min_timeline_months)
                        .min(sizing.max_timeline_months)
                } else {
                    0
                };
                let debt_payment = if has_debt(answers, config) {
                    disposable * gate.blocked_debt_share
                } else {
                    0.0
                };
                (
                    0.0,
                    debt_payment,
                    EmergencyPlan {
                        monthly_saving,
                        timeline_months,
                    },
                    Some(SuitabilityVerdict {
                        suitable: false,
                        reasons,
                    }),
                    true,
                )
            }
        }
    };

    let safe = if blocked {
        0.0
    } else {
        let available = (disposable - emergency.monthly_saving - debt_payment).max(0.0);
        let safe = available.min(disposable * rate);
        if safe < sizing.minimum_investment {
            0.0
        } else {
            safe
        }
    };

    InvestmentPlan {
        safe_monthly_investment: round2(safe),
        annual_investment: round2(safe * 12.0),
        current_emergency_months: current_months,
        emergency_gap_months: gap_months,
        emergency_gap_amount: round2(gap_amount),
        monthly_emergency_saving: round2(emergency.monthly_saving),
        emergency_timeline_months: emergency.timeline_months,
        monthly_debt_payment: round2(debt_payment),
        investment_rate: round2(rate * 100.0),
        rate_confidence,
        suitability,
    }
}

/// Spread the emergency gap over 12 months, stretching the timeline when that would take
/// more than the allowed share of disposable income.
fn plan_emergency(gap_amount: f64, disposable: f64, sizing: &SizingConfig) -> EmergencyPlan {
    if gap_amount <= 0.0 || disposable <= 0.0 {
        return EmergencyPlan {
            monthly_saving: 0.0,
            timeline_months: 0,
        };
    }

    let affordable = disposable * sizing.max_emergency_share;
    let mut timeline = sizing.initial_timeline_months;
    if gap_amount / f64::from(timeline) > affordable {
        timeline = ((gap_amount / affordable).ceil() as u32).max(sizing.min_timeline_months);
    }
    let timeline = timeline.min(sizing.max_timeline_months);

    EmergencyPlan {
        monthly_saving: gap_amount / f64::from(timeline),
        timeline_months: timeline,
    }
}

fn blocking_reasons(
    answers: &AnswerSet,
    gate: &SuitabilityConfig,
    config: &ScoringConfig,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if answers.emergency_fund == config.tiers.emergency_fund.min {
        reasons.push("No emergency fund in place".to_string());
    }
    if answers.monthly_income <= 0.0 {
        reasons.push("No regular monthly income".to_string());
    }
    if answers.emi_burden >= gate.blocking_emi_tier {
        reasons.push("EMI payments exceed 60% of income".to_string());
    }
    if answers.liquidity_need == LiquidityNeed::High {
        reasons.push("Money may be needed within a year".to_string());
    }
    reasons
}

fn has_debt(answers: &AnswerSet, config: &ScoringConfig) -> bool {
    answers.high_interest_debt > 0.0
        || !answers.loans.is_empty()
        || answers.emi_burden > config.tiers.emi_burden.min
}

fn lookup_offset(table: &[f64], offset: usize, fallback: f64) -> f64 {
    table.get(offset).copied().unwrap_or(fallback)
}
