use std::ops::RangeInclusive;

use proptest::prelude::*;

use super::common::*;
use crate::workflows::assessment::domain::{
    AnswerSet, AnswerSubmission, Choice, InflationStrategy, LoanType,
};
use crate::workflows::assessment::scoring::{ScoringConfig, ScoringProfile};

fn profile() -> impl Strategy<Value = ScoringProfile> {
    prop_oneof![
        Just(ScoringProfile::V1),
        Just(ScoringProfile::V2),
        Just(ScoringProfile::V3),
    ]
}

fn loans() -> impl Strategy<Value = Vec<LoanType>> {
    proptest::collection::vec(
        prop_oneof![
            Just(LoanType::Home),
            Just(LoanType::Education),
            Just(LoanType::CreditCard),
            Just(LoanType::Payday),
            Just(LoanType::Gold),
        ],
        0..4,
    )
}

fn inflation_strategy() -> impl Strategy<Value = InflationStrategy> {
    prop_oneof![
        Just(InflationStrategy::Growth),
        Just(InflationStrategy::Balanced),
        Just(InflationStrategy::Protection),
    ]
}

/// Submissions valid under every builtin profile, with the emergency fund
/// tier drawn from `emergency`.
fn submissions(emergency: RangeInclusive<i64>) -> impl Strategy<Value = AnswerSubmission> {
    let money = (0.0f64..400_000.0, 0.0f64..300_000.0, 0.0f64..2_000_000.0);
    let tiers = (
        emergency,
        1i64..=5,
        1i64..=5,
        1i64..=5,
        1i64..=5,
        1i64..=5,
        1i64..=4,
    );
    let follow_up = (
        1i64..=3,
        1i64..=3,
        1i64..=5,
        1i64..=5,
        1i64..=5,
        1i64..=4,
        1i64..=3,
        proptest::option::of(1i64..=4),
    );

    (money, tiers, follow_up, loans(), inflation_strategy()).prop_map(
        |(
            (income, expenses, debt),
            (emergency, age, purpose, horizon, risk, experience, loss),
            (goal, liquidity, knowledge, stability, dependents, emi, timing, esg),
            loans,
            strategy,
        )| AnswerSubmission {
            monthly_income: Some(income),
            monthly_expenses: Some(expenses),
            emergency_fund: Some(emergency),
            high_interest_debt: Some(debt),
            loans,
            age_group: Some(age),
            purpose: Some(Choice::Tier(purpose)),
            time_horizon: Some(horizon),
            risk_behavior: Some(risk),
            experience: Some(experience),
            knowledge: Some(knowledge),
            goal_priority: Some(Choice::Tier(goal)),
            loss_capacity: Some(loss),
            liquidity_need: Some(Choice::Tier(liquidity)),
            income_stability: Some(stability),
            dependents: Some(dependents),
            emi_burden: Some(emi),
            goal_timing: Some(timing),
            esg_importance: esg,
            inflation_strategy: Some(strategy.into()),
        },
    )
}

/// A profile paired with a submission spanning that profile's emergency fund table.
fn scored_submissions() -> impl Strategy<Value = (ScoringProfile, AnswerSubmission)> {
    profile().prop_flat_map(|profile| {
        let range = ScoringConfig::for_profile(profile).tiers.emergency_fund;
        let emergency = i64::from(range.min)..=i64::from(range.max);
        (Just(profile), submissions(emergency))
    })
}

fn answers(profile: ScoringProfile, submission: AnswerSubmission) -> AnswerSet {
    guard(profile)
        .answer_set_from_submission(submission)
        .expect("valid submission")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn allocation_always_sums_to_one_hundred((profile, submission) in scored_submissions()) {
        let answers = answers(profile, submission);
        let result = engine(profile).evaluate(&answers);

        prop_assert!((result.allocation.total() - 100.0).abs() <= 0.05);
        prop_assert!(result.allocation.iter().all(|(_, pct)| pct >= 0.0));
    }

    #[test]
    fn overrides_never_raise_the_category((profile, submission) in scored_submissions()) {
        let answers = answers(profile, submission);
        let result = engine(profile).evaluate(&answers);

        prop_assert!(result.final_category() <= result.initial_category());
        prop_assert!((1..=5).contains(&result.final_category().index()));
        for entry in &result.overrides.log {
            prop_assert!(entry.after <= entry.before);
        }
    }

    #[test]
    fn scores_stay_on_their_scales((profile, submission) in scored_submissions()) {
        let answers = answers(profile, submission);
        let result = engine(profile).evaluate(&answers);

        prop_assert!((0.0..=100.0).contains(&result.health.score));
        prop_assert!(result.risk.total >= 0.0);
        prop_assert!(result.risk.total <= result.risk.scale_max);
        prop_assert!((40..=90).contains(&result.confidence.score));
    }

    #[test]
    fn safe_investment_respects_commitments((profile, submission) in scored_submissions()) {
        let answers = answers(profile, submission);
        let result = engine(profile).evaluate(&answers);
        let investment = &result.investment;
        let safe = investment.safe_monthly_investment;

        prop_assert!(safe == 0.0 || safe >= 500.0);
        let headroom = result.health.disposable_income
            - investment.monthly_emergency_saving
            - investment.monthly_debt_payment;
        prop_assert!(safe <= headroom.max(0.0) + 0.02);
    }
}
