//! Financial self-assessment: intake validation, the scoring pipeline, persistence of
//! completed assessments and the report surfaces built on top of them.

pub mod catalog;
pub mod csv_store;
pub mod domain;
pub mod intake;
pub mod plan;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{BucketSuggestion, Security, SecurityCatalog};
pub use csv_store::{export_csv, CsvAssessmentStore};
pub use domain::{
    AnswerSet, AnswerSubmission, AssessmentId, AssetBucket, Choice, DebtQuality, GoalPriority,
    InflationStrategy, InvestmentPurpose, LiquidityNeed, LoanType, TierCoded,
};
pub use intake::{FieldViolation, IntakeError, IntakeGuard};
pub use plan::{ActionPlan, AssessmentReport};
pub use repository::{
    AssessmentRow, AssessmentStatistics, AssessmentStore, InMemoryAssessmentStore, StoreError,
};
pub use router::assessment_router;
pub use scoring::{
    evaluate, Allocation, AssessmentEngine, AssessmentResult, RiskCategory, ScoringConfig,
    ScoringConfigError, ScoringProfile,
};
pub use service::{
    AssessmentEnvelope, AssessmentService, AssessmentServiceError, PersistenceStatus,
};
