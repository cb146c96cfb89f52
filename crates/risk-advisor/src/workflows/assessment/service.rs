use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::catalog::SecurityCatalog;
use super::csv_store::export_csv;
use super::domain::{AnswerSubmission, AssessmentId};
use super::intake::{IntakeError, IntakeGuard};
use super::plan::AssessmentReport;
use super::repository::{AssessmentRow, AssessmentStatistics, AssessmentStore, StoreError};
use super::scoring::{AssessmentEngine, AssessmentResult, ScoringConfig, ScoringConfigError};

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id(now: DateTime<Utc>) -> AssessmentId {
    let sequence = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("{}-{sequence:04}", now.format("%Y%m%d%H%M%S")))
}

/// Whether the record reached the store. Storage failures never discard a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceStatus {
    Stored,
    Failed { reason: String },
}

/// Result plus the clock-dependent metadata of one submission.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentEnvelope {
    pub assessment_id: AssessmentId,
    pub created_at: DateTime<Utc>,
    pub persistence: PersistenceStatus,
    pub result: AssessmentResult,
}

/// Service composing the intake guard, the scoring engine and the record store.
pub struct AssessmentService<S> {
    guard: Arc<IntakeGuard>,
    engine: Arc<AssessmentEngine>,
    store: Arc<S>,
    catalog: Arc<SecurityCatalog>,
}

impl<S> AssessmentService<S>
where
    S: AssessmentStore + 'static,
{
    pub fn new(store: Arc<S>, config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        let guard = IntakeGuard::from_config(&config);
        let engine = AssessmentEngine::new(config)?;
        Ok(Self {
            guard: Arc::new(guard),
            engine: Arc::new(engine),
            store,
            catalog: Arc::new(SecurityCatalog::default()),
        })
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &SecurityCatalog {
        &self.catalog
    }

    /// Validate, score and record a questionnaire submission.
    pub fn submit(
        &self,
        submission: AnswerSubmission,
    ) -> Result<AssessmentEnvelope, AssessmentServiceError> {
        let answers = self.guard.answer_set_from_submission(submission)?;
        let result = self.engine.evaluate(&answers);

        let created_at = Utc::now();
        let assessment_id = next_assessment_id(created_at);
        let row = AssessmentRow::from_result(&assessment_id, created_at, &result);

        let persistence = match self.store.append_record(&row) {
            Ok(()) => PersistenceStatus::Stored,
            Err(err) => {
                warn!(
                    assessment_id = %assessment_id.0,
                    error = %err,
                    "failed to persist assessment; returning result without a stored record"
                );
                PersistenceStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };

        info!(
            assessment_id = %assessment_id.0,
            profile = %result.profile,
            category = result.final_category().key(),
            health = result.health.score,
            overrides = result.overrides.log.len(),
            "assessment completed"
        );

        Ok(AssessmentEnvelope {
            assessment_id,
            created_at,
            persistence,
            result,
        })
    }

    pub fn report(&self, envelope: &AssessmentEnvelope) -> AssessmentReport {
        AssessmentReport::new(
            envelope.assessment_id.clone(),
            envelope.created_at,
            &envelope.result,
            &self.catalog,
        )
    }

    pub fn statistics(&self) -> Result<AssessmentStatistics, AssessmentServiceError> {
        let rows = self.store.load_all()?;
        Ok(AssessmentStatistics::from_rows(&rows))
    }

    pub fn export_csv(&self) -> Result<String, AssessmentServiceError> {
        let rows = self.store.load_all()?;
        Ok(export_csv(&rows)?)
    }

    pub fn clear(&self) -> Result<(), AssessmentServiceError> {
        self.store.clear()?;
        info!("assessment store cleared");
        Ok(())
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
