use crate::infra::{backend_override, ConfiguredStore};
use clap::Args;
use risk_advisor::config::{AppConfig, StoreBackend};
use risk_advisor::error::AppError;
use risk_advisor::workflows::assessment::{
    AnswerSubmission, AssessmentEnvelope, AssessmentService, AssessmentStatistics, GoalPriority,
    InflationStrategy, InvestmentPurpose, LiquidityNeed, LoanType, PersistenceStatus, ScoringConfig,
    ScoringProfile,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON questionnaire submission (`-` reads stdin)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Scoring profile (v1, v2 or v3). Defaults to ADVISOR_PROFILE.
    #[arg(long, value_parser = crate::infra::parse_profile)]
    pub(crate) profile: Option<ScoringProfile>,
    /// CSV store path (`memory` skips persistence). Defaults to ADVISOR_STORE_PATH.
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Print the full JSON report instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// CSV store path. Defaults to ADVISOR_STORE_PATH.
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Scoring profile (v1, v2 or v3). Defaults to v3.
    #[arg(long, value_parser = crate::infra::parse_profile)]
    pub(crate) profile: Option<ScoringProfile>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        profile,
        store,
        json,
    } = args;

    let config = AppConfig::load()?;
    let profile = profile.unwrap_or(config.advisor.profile);
    let backend = backend_override(store, config.advisor.store);

    let raw = if input.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(&input)?
    };
    let submission: AnswerSubmission = serde_json::from_str(&raw)?;

    let service = build_service(&backend, profile)?;
    let envelope = service.submit(submission)?;
    let report = service.report(&envelope);

    if json {
        println!("{}", report.to_pretty_json()?);
    } else {
        print!("{}", report.render_text());
        render_persistence(&envelope, &backend);
    }
    Ok(())
}

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let backend = backend_override(args.store, config.advisor.store);
    let service = build_service(&backend, config.advisor.profile)?;

    render_statistics(&service.statistics()?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let profile = args.profile.unwrap_or_default();
    let service = build_service(&StoreBackend::Memory, profile)?;

    println!("Risk advisor demo ({profile} scoring profile)");
    for (name, submission) in sample_households() {
        let envelope = service.submit(submission)?;
        let report = service.report(&envelope);
        println!("\n=== {name} ===");
        print!("{}", report.render_text());
    }

    println!();
    render_statistics(&service.statistics()?);
    Ok(())
}

fn build_service(
    backend: &StoreBackend,
    profile: ScoringProfile,
) -> Result<AssessmentService<ConfiguredStore>, AppError> {
    let store = Arc::new(ConfiguredStore::from_backend(backend));
    Ok(AssessmentService::new(
        store,
        ScoringConfig::for_profile(profile),
    )?)
}

fn render_persistence(envelope: &AssessmentEnvelope, backend: &StoreBackend) {
    match (&envelope.persistence, backend) {
        (PersistenceStatus::Stored, StoreBackend::Csv(path)) => {
            println!("\nRecorded in {}", path.display());
        }
        (PersistenceStatus::Stored, StoreBackend::Memory) => {}
        (PersistenceStatus::Failed { reason }, _) => {
            println!("\nWarning: assessment not recorded ({reason})");
        }
    }
}

fn render_statistics(statistics: &AssessmentStatistics) {
    println!("Assessments recorded: {}", statistics.total_assessments);
    if statistics.total_assessments == 0 {
        return;
    }
    println!(
        "Average financial health: {:.2}",
        statistics.average_financial_health
    );
    println!(
        "Most common category: {}",
        statistics
            .most_common_category
            .as_deref()
            .unwrap_or("n/a")
    );
    println!(
        "Average monthly investment: {}",
        risk_advisor::workflows::assessment::plan::format_amount(
            statistics.average_monthly_investment
        )
    );
    println!("Recent:");
    for row in &statistics.recent {
        println!(
            "  {} {} health {:.1} -> {}",
            row.timestamp, row.assessment_id, row.financial_health_score, row.risk_category
        );
    }
}

fn sample_households() -> Vec<(&'static str, AnswerSubmission)> {
    let steady_saver = AnswerSubmission {
        monthly_income: Some(85_000.0),
        monthly_expenses: Some(45_000.0),
        emergency_fund: Some(4),
        age_group: Some(4),
        purpose: Some(InvestmentPurpose::WealthCreation.into()),
        time_horizon: Some(5),
        risk_behavior: Some(4),
        experience: Some(3),
        knowledge: Some(4),
        goal_priority: Some(GoalPriority::Flexible.into()),
        loss_capacity: Some(3),
        liquidity_need: Some(LiquidityNeed::Low.into()),
        income_stability: Some(5),
        dependents: Some(2),
        emi_burden: Some(1),
        goal_timing: Some(3),
        esg_importance: Some(3),
        inflation_strategy: Some(InflationStrategy::Growth.into()),
        ..AnswerSubmission::default()
    };

    let stretched_borrower = AnswerSubmission {
        monthly_income: Some(42_000.0),
        monthly_expenses: Some(36_000.0),
        emergency_fund: Some(1),
        high_interest_debt: Some(180_000.0),
        loans: vec![LoanType::CreditCard, LoanType::Personal],
        age_group: Some(3),
        purpose: Some(InvestmentPurpose::EducationTaxSaving.into()),
        time_horizon: Some(2),
        risk_behavior: Some(4),
        experience: Some(1),
        goal_priority: Some(GoalPriority::Critical.into()),
        loss_capacity: Some(1),
        liquidity_need: Some(LiquidityNeed::High.into()),
        income_stability: Some(2),
        dependents: Some(4),
        emi_burden: Some(4),
        ..AnswerSubmission::default()
    };

    let pre_retiree = AnswerSubmission {
        monthly_income: Some(120_000.0),
        monthly_expenses: Some(70_000.0),
        emergency_fund: Some(6),
        loans: vec![LoanType::Home],
        age_group: Some(1),
        purpose: Some(InvestmentPurpose::Retirement.into()),
        time_horizon: Some(3),
        risk_behavior: Some(2),
        experience: Some(4),
        knowledge: Some(3),
        goal_priority: Some(GoalPriority::Important.into()),
        loss_capacity: Some(2),
        liquidity_need: Some(LiquidityNeed::Medium.into()),
        income_stability: Some(4),
        dependents: Some(1),
        emi_burden: Some(2),
        goal_timing: Some(1),
        esg_importance: Some(4),
        inflation_strategy: Some(InflationStrategy::Protection.into()),
        ..AnswerSubmission::default()
    };

    vec![
        ("Steady saver", steady_saver),
        ("Stretched borrower", stretched_borrower),
        ("Pre-retiree", pre_retiree),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_households_score_under_the_ranged_profile() {
        let service =
            build_service(&StoreBackend::Memory, ScoringProfile::V3).expect("service builds");
        for (name, submission) in sample_households() {
            let envelope = service
                .submit(submission)
                .unwrap_or_else(|err| panic!("{name} rejected: {err}"));
            assert_eq!(envelope.persistence, PersistenceStatus::Stored);
        }
        let statistics = service.statistics().expect("statistics load");
        assert_eq!(statistics.total_assessments, 3);
    }

    #[test]
    fn stretched_borrower_is_blocked_from_investing() {
        let service =
            build_service(&StoreBackend::Memory, ScoringProfile::V3).expect("service builds");
        let (_, submission) = sample_households().remove(1);

        let envelope = service.submit(submission).expect("valid submission");

        let investment = &envelope.result.investment;
        assert_eq!(investment.safe_monthly_investment, 0.0);
        assert!(investment
            .suitability
            .as_ref()
            .is_some_and(|verdict| !verdict.suitable));
    }
}
