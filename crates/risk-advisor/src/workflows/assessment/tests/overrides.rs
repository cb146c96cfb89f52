use super::common::*;
use crate::workflows::assessment::domain::{GoalPriority, InvestmentPurpose, LiquidityNeed};
use crate::workflows::assessment::scoring::overrides::{apply_overrides, count_contradictions};
use crate::workflows::assessment::scoring::{OverrideConfig, OverrideKind, RiskCategory};

#[test]
fn weak_safety_net_downgrades_one_level() {
    let mut answers = steady_answers();
    answers.high_interest_debt = 40_000.0;
    answers.emergency_fund = 2;

    let outcome = apply_overrides(RiskCategory::High, &answers, &OverrideConfig::default());

    assert_eq!(outcome.final_category, RiskCategory::Medium);
    assert_eq!(outcome.log.len(), 1);
    let entry = &outcome.log[0];
    assert_eq!(entry.kind, OverrideKind::FinancialHealth);
    assert!(entry.message.starts_with("Financial health"));
    assert_eq!(entry.before, RiskCategory::High);
    assert_eq!(entry.after, RiskCategory::Medium);
}

#[test]
fn downgrades_stop_at_very_low() {
    let mut answers = steady_answers();
    answers.high_interest_debt = 40_000.0;
    answers.emergency_fund = 1;

    let outcome = apply_overrides(RiskCategory::VeryLow, &answers, &OverrideConfig::default());

    assert_eq!(outcome.final_category, RiskCategory::VeryLow);
    assert_eq!(outcome.log[0].after, RiskCategory::VeryLow);
}

#[test]
fn critical_goal_drops_two_levels() {
    let mut answers = steady_answers();
    answers.goal_priority = GoalPriority::Critical;

    let outcome = apply_overrides(RiskCategory::VeryHigh, &answers, &OverrideConfig::default());

    assert_eq!(outcome.final_category, RiskCategory::Medium);
    assert_eq!(outcome.final_category.index(), 3);
    assert_eq!(outcome.allocation_key, 3);
    assert_eq!(
        outcome.log.iter().map(|entry| entry.kind).collect::<Vec<_>>(),
        vec![OverrideKind::GoalPriority]
    );
}

#[test]
fn high_liquidity_need_caps_at_medium() {
    let mut answers = steady_answers();
    answers.liquidity_need = LiquidityNeed::High;
    answers.age_group = 5;

    let outcome = apply_overrides(RiskCategory::VeryHigh, &answers, &OverrideConfig::default());

    assert_eq!(outcome.final_category, RiskCategory::Medium);
    assert_eq!(outcome.log.len(), 1);
    assert_eq!(
        outcome.log[0].message,
        "Liquidity: High need -> Cap at MEDIUM RISK"
    );

    let already_low = apply_overrides(RiskCategory::Low, &answers, &OverrideConfig::default());
    assert_eq!(already_low.final_category, RiskCategory::Low);
}

#[test]
fn contradictions_are_counted_per_pair() {
    let mut answers = steady_answers();
    answers.risk_behavior = 5;
    answers.time_horizon = 1;
    answers.experience = 2;
    assert_eq!(
        count_contradictions(&answers, &OverrideConfig::default()),
        2
    );

    answers.purpose = InvestmentPurpose::WealthCreation;
    answers.monthly_income = 40_000.0;
    assert_eq!(
        count_contradictions(&answers, &OverrideConfig::default()),
        3
    );
}

#[test]
fn two_contradictions_trigger_consistency_downgrade() {
    let mut answers = steady_answers();
    answers.risk_behavior = 5;
    answers.time_horizon = 1;
    answers.experience = 2;

    let outcome = apply_overrides(RiskCategory::High, &answers, &OverrideConfig::default());

    assert_eq!(outcome.contradictions, 2);
    assert_eq!(outcome.final_category, RiskCategory::Medium);
    assert_eq!(
        outcome.log[0].message,
        "Consistency: 2 contradictions found"
    );
}

#[test]
fn equity_beyond_age_reference_is_downgraded() {
    let mut answers = steady_answers();
    answers.age_group = 1;

    let outcome = apply_overrides(RiskCategory::VeryHigh, &answers, &OverrideConfig::default());

    assert_eq!(outcome.final_category, RiskCategory::High);
    assert_eq!(outcome.log.len(), 1);
    assert_eq!(outcome.log[0].kind, OverrideKind::AgeEquity);
    assert_eq!(
        outcome.log[0].message,
        "Age-Equity: Too aggressive for age 60"
    );
}

#[test]
fn aggressive_concentration_is_downgraded() {
    let mut answers = steady_answers();
    answers.age_group = 5;

    let outcome = apply_overrides(RiskCategory::VeryHigh, &answers, &OverrideConfig::default());

    assert_eq!(outcome.final_category, RiskCategory::High);
    assert_eq!(outcome.log.len(), 1);
    assert_eq!(
        outcome.log[0].message,
        "Concentration: Aggressive exposure 55% > 45%"
    );
}

#[test]
fn low_income_caps_at_medium() {
    let mut answers = steady_answers();
    answers.monthly_income = 20_000.0;
    answers.monthly_expenses = 12_000.0;
    answers.age_group = 5;

    let outcome = apply_overrides(RiskCategory::High, &answers, &OverrideConfig::default());

    assert_eq!(outcome.final_category, RiskCategory::Medium);
    assert_eq!(
        outcome.log.last().map(|entry| entry.message.as_str()),
        Some("Income: Monthly income < 25000 -> Cap at MEDIUM RISK")
    );
}

#[test]
fn clean_answers_keep_the_initial_category() {
    for initial in RiskCategory::ALL {
        let mut answers = steady_answers();
        answers.age_group = 5;
        let outcome = apply_overrides(initial, &answers, &OverrideConfig::default());
        if initial == RiskCategory::VeryHigh {
            // The classic preview row for VERY_HIGH always breaches the concentration limit.
            assert_eq!(outcome.final_category, RiskCategory::High);
        } else {
            assert_eq!(outcome.final_category, initial);
            assert!(outcome.log.is_empty());
        }
    }
}
