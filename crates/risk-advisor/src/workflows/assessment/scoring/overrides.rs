use serde::{Deserialize, Serialize};

use super::super::domain::{AnswerSet, GoalPriority, InvestmentPurpose, LiquidityNeed};
use super::category::RiskCategory;
use super::config::OverrideConfig;

/// Family an override log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    FinancialHealth,
    GoalPriority,
    Liquidity,
    Consistency,
    AgeEquity,
    Concentration,
    IncomeFloor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub kind: OverrideKind,
    pub message: String,
    pub before: RiskCategory,
    pub after: RiskCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideOutcome {
    pub initial: RiskCategory,
    pub final_category: RiskCategory,
    pub log: Vec<OverrideEntry>,
    pub contradictions: u8,
    /// Category index the allocation table is keyed by.
    pub allocation_key: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Downgrade(u8),
    CapAt(RiskCategory),
}

impl Effect {
    fn apply(self, category: RiskCategory) -> RiskCategory {
        match self {
            Self::Downgrade(steps) => category.downgrade(steps),
            Self::CapAt(ceiling) => category.cap_at(ceiling),
        }
    }
}

struct OverrideContext<'a> {
    answers: &'a AnswerSet,
    config: &'a OverrideConfig,
    contradictions: u8,
}

type Predicate = fn(&OverrideContext<'_>, RiskCategory) -> Option<String>;

struct OverrideRule {
    kind: OverrideKind,
    predicate: Predicate,
    effect: Effect,
}

/// Applied in order; every rule sees the category produced by the rules before it.
const RULES: [OverrideRule; 8] = [
    OverrideRule {
        kind: OverrideKind::FinancialHealth,
        predicate: weak_safety_net,
        effect: Effect::Downgrade(1),
    },
    OverrideRule {
        kind: OverrideKind::GoalPriority,
        predicate: critical_goal,
        effect: Effect::Downgrade(2),
    },
    OverrideRule {
        kind: OverrideKind::GoalPriority,
        predicate: important_goal,
        effect: Effect::Downgrade(1),
    },
    OverrideRule {
        kind: OverrideKind::Liquidity,
        predicate: high_liquidity_need,
        effect: Effect::CapAt(RiskCategory::Medium),
    },
    OverrideRule {
        kind: OverrideKind::Consistency,
        predicate: contradictory_answers,
        effect: Effect::Downgrade(1),
    },
    OverrideRule {
        kind: OverrideKind::AgeEquity,
        predicate: equity_exceeds_age,
        effect: Effect::Downgrade(1),
    },
    OverrideRule {
        kind: OverrideKind::Concentration,
        predicate: aggressive_concentration,
        effect: Effect::Downgrade(1),
    },
    OverrideRule {
        kind: OverrideKind::IncomeFloor,
        predicate: income_below_floor,
        effect: Effect::CapAt(RiskCategory::Medium),
    },
];

fn weak_safety_net(ctx: &OverrideContext<'_>, _: RiskCategory) -> Option<String> {
    (ctx.answers.emergency_fund < ctx.config.min_emergency_tier
        || ctx.answers.carries_high_interest_debt())
    .then(|| {
        "Financial health: Emergency fund < 3 months OR high-interest debt present".to_string()
    })
}

fn critical_goal(ctx: &OverrideContext<'_>, _: RiskCategory) -> Option<String> {
    (ctx.answers.goal_priority == GoalPriority::Critical)
        .then(|| "Goal priority: Critical goal -> Downgrade 2 levels".to_string())
}

fn important_goal(ctx: &OverrideContext<'_>, _: RiskCategory) -> Option<String> {
    (ctx.answers.goal_priority == GoalPriority::Important)
        .then(|| "Goal priority: Important goal -> Downgrade 1 level".to_string())
}

fn high_liquidity_need(ctx: &OverrideContext<'_>, _: RiskCategory) -> Option<String> {
    (ctx.answers.liquidity_need == LiquidityNeed::High)
        .then(|| "Liquidity: High need -> Cap at MEDIUM RISK".to_string())
}

fn contradictory_answers(ctx: &OverrideContext<'_>, _: RiskCategory) -> Option<String> {
    (ctx.contradictions >= ctx.config.contradiction_limit)
        .then(|| format!("Consistency: {} contradictions found", ctx.contradictions))
}

fn equity_exceeds_age(ctx: &OverrideContext<'_>, current: RiskCategory) -> Option<String> {
    let config = ctx.config;
    let age = lookup(&config.reference_ages, ctx.answers.age_group)?;
    let equity = lookup(&config.index_equity, current.index())?;
    let reference_equity = 100.0 - f64::from(age);

    (equity > reference_equity + config.age_equity_slack)
        .then(|| format!("Age-Equity: Too aggressive for age {age}"))
}

fn aggressive_concentration(ctx: &OverrideContext<'_>, current: RiskCategory) -> Option<String> {
    let config = ctx.config;
    let row = lookup(&config.preview_allocation, current.index())?;
    let exposure = row[2] + row[3];

    (exposure > config.concentration_limit).then(|| {
        format!(
            "Concentration: Aggressive exposure {exposure}% > {}%",
            config.concentration_limit
        )
    })
}

fn income_below_floor(ctx: &OverrideContext<'_>, _: RiskCategory) -> Option<String> {
    (ctx.answers.monthly_income < ctx.config.income_floor).then(|| {
        format!(
            "Income: Monthly income < {} -> Cap at MEDIUM RISK",
            ctx.config.income_floor
        )
    })
}

/// 1-indexed table lookup.
fn lookup<T: Copy>(table: &[T], tier: u8) -> Option<T> {
    usize::from(tier)
        .checked_sub(1)
        .and_then(|slot| table.get(slot))
        .copied()
}

/// Number of answer pairs that contradict each other.
pub(crate) fn count_contradictions(answers: &AnswerSet, config: &OverrideConfig) -> u8 {
    let bold = answers.risk_behavior >= config.contradiction_risk_floor;
    let ceiling = config.contradiction_tier_ceiling;
    let checks = [
        bold && answers.emergency_fund <= ceiling,
        bold && answers.time_horizon <= ceiling,
        bold && answers.experience <= ceiling,
        answers.purpose == InvestmentPurpose::WealthCreation
            && answers.monthly_income < config.growth_income_floor,
    ];
    checks.iter().filter(|hit| **hit).count() as u8
}

pub(crate) fn apply_overrides(
    initial: RiskCategory,
    answers: &AnswerSet,
    config: &OverrideConfig,
) -> OverrideOutcome {
    let ctx = OverrideContext {
        answers,
        config,
        contradictions: count_contradictions(answers, config),
    };

    let mut log = Vec::new();
    let final_category = RULES.iter().fold(initial, |current, rule| {
        match (rule.predicate)(&ctx, current) {
            Some(message) => {
                let after = rule.effect.apply(current);
                log.push(OverrideEntry {
                    kind: rule.kind,
                    message,
                    before: current,
                    after,
                });
                after
            }
            None => current,
        }
    });

    OverrideOutcome {
        initial,
        final_category,
        log,
        contradictions: ctx.contradictions,
        allocation_key: final_category.index(),
    }
}
