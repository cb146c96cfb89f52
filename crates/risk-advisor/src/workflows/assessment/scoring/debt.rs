use serde::{Deserialize, Serialize};

use super::super::domain::{AnswerSet, DebtQuality};
use super::config::{DebtQualityConfig, TierRange};
use super::scale::round2;

/// Debt quality breakdown: loan classes and the EMI burden blended into one 0-100 score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtQualityResult {
    pub good_loans: u32,
    pub bad_loans: u32,
    pub neutral_loans: u32,
    pub loan_type_score: f64,
    pub emi_score: f64,
    pub score: f64,
}

pub(crate) fn score_debt_quality(
    answers: &AnswerSet,
    config: &DebtQualityConfig,
    emi_range: TierRange,
) -> DebtQualityResult {
    let count = |quality: DebtQuality| {
        answers
            .loans
            .iter()
            .filter(|loan| loan.quality() == quality)
            .count() as u32
    };
    let good_loans = count(DebtQuality::Good);
    let bad_loans = count(DebtQuality::Bad);
    let neutral_loans = count(DebtQuality::Neutral);

    let emi_score = config
        .emi_scores
        .get(emi_range.offset(answers.emi_burden))
        .copied()
        .unwrap_or(0.0);

    if answers.loans.is_empty() {
        return DebtQualityResult {
            good_loans,
            bad_loans,
            neutral_loans,
            loan_type_score: 100.0,
            emi_score,
            score: 100.0,
        };
    }

    let loan_type_score = (config.base_score + config.good_loan_bonus * f64::from(good_loans)
        - config.bad_loan_penalty * f64::from(bad_loans)
        + config.neutral_loan_bonus * f64::from(neutral_loans))
    .clamp(0.0, 100.0);

    let score = config.loan_type_share * loan_type_score + config.emi_share * emi_score;

    DebtQualityResult {
        good_loans,
        bad_loans,
        neutral_loans,
        loan_type_score: round2(loan_type_score),
        emi_score,
        score: round2(score),
    }
}
