use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::domain::{
    AnswerSet, AnswerSubmission, GoalPriority, InflationStrategy, InvestmentPurpose,
    LiquidityNeed,
};
use crate::workflows::assessment::intake::IntakeGuard;
use crate::workflows::assessment::repository::{
    AssessmentRow, AssessmentStore, InMemoryAssessmentStore, StoreError,
};
use crate::workflows::assessment::scoring::{AssessmentEngine, ScoringConfig, ScoringProfile};
use crate::workflows::assessment::{assessment_router, AssessmentService};

/// Salaried 40-year-old saving for retirement with three months of expenses put aside.
pub(crate) fn classic_answers() -> AnswerSet {
    AnswerSet {
        monthly_income: 50_000.0,
        monthly_expenses: 30_000.0,
        emergency_fund: 3,
        high_interest_debt: 0.0,
        loans: Vec::new(),
        age_group: 3,
        purpose: InvestmentPurpose::Retirement,
        time_horizon: 3,
        risk_behavior: 3,
        experience: 2,
        knowledge: 3,
        goal_priority: GoalPriority::Important,
        loss_capacity: 2,
        liquidity_need: LiquidityNeed::Medium,
        income_stability: 3,
        dependents: 3,
        emi_burden: 1,
        goal_timing: 2,
        esg_importance: None,
        inflation_strategy: InflationStrategy::Balanced,
    }
}

/// Answers with nothing pulling the category down: used to isolate single override rules.
pub(super) fn steady_answers() -> AnswerSet {
    AnswerSet {
        monthly_income: 120_000.0,
        emergency_fund: 5,
        age_group: 3,
        time_horizon: 5,
        experience: 4,
        goal_priority: GoalPriority::Flexible,
        liquidity_need: LiquidityNeed::Low,
        ..classic_answers()
    }
}

pub(super) fn submission() -> AnswerSubmission {
    AnswerSubmission {
        monthly_income: Some(50_000.0),
        monthly_expenses: Some(30_000.0),
        emergency_fund: Some(3),
        high_interest_debt: Some(0.0),
        loans: Vec::new(),
        age_group: Some(3),
        purpose: Some(InvestmentPurpose::Retirement.into()),
        time_horizon: Some(3),
        risk_behavior: Some(3),
        experience: Some(2),
        knowledge: Some(3),
        goal_priority: Some(GoalPriority::Important.into()),
        loss_capacity: Some(2),
        liquidity_need: Some(LiquidityNeed::Medium.into()),
        income_stability: Some(5),
        dependents: Some(1),
        emi_burden: Some(1),
        goal_timing: Some(2),
        esg_importance: None,
        inflation_strategy: Some(InflationStrategy::Balanced.into()),
    }
}

pub(super) fn invalid_submission() -> AnswerSubmission {
    AnswerSubmission {
        monthly_income: None,
        emergency_fund: Some(9),
        ..submission()
    }
}

pub(super) fn engine(profile: ScoringProfile) -> AssessmentEngine {
    AssessmentEngine::for_profile(profile).expect("builtin profile validates")
}

pub(super) fn guard(profile: ScoringProfile) -> IntakeGuard {
    IntakeGuard::from_config(&ScoringConfig::for_profile(profile))
}

pub(super) fn build_service(
    profile: ScoringProfile,
) -> (
    AssessmentService<InMemoryAssessmentStore>,
    Arc<InMemoryAssessmentStore>,
) {
    let store = Arc::new(InMemoryAssessmentStore::new());
    let service = AssessmentService::new(store.clone(), ScoringConfig::for_profile(profile))
        .expect("builtin profile validates");
    (service, store)
}

pub(super) fn unavailable_service() -> AssessmentService<UnavailableStore> {
    AssessmentService::new(Arc::new(UnavailableStore), ScoringConfig::v3())
        .expect("builtin profile validates")
}

pub(super) fn router_with_service(
    service: AssessmentService<InMemoryAssessmentStore>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

impl AssessmentStore for UnavailableStore {
    fn append_record(&self, _row: &AssessmentRow) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn load_all(&self) -> Result<Vec<AssessmentRow>, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
