use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::AnswerSubmission;
use super::repository::AssessmentStore;
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing assessment intake, statistics and export endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: AssessmentStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            post(submit_handler::<S>).delete(clear_handler::<S>),
        )
        .route(
            "/api/v1/assessments/statistics",
            get(statistics_handler::<S>),
        )
        .route("/api/v1/assessments/export", get(export_handler::<S>))
        .with_state(service)
}

fn error_response(error: AssessmentServiceError) -> Response {
    match error {
        AssessmentServiceError::Intake(error) => {
            let violations: Vec<_> = error
                .violations
                .iter()
                .map(|violation| {
                    json!({
                        "field": violation.field(),
                        "message": violation.to_string(),
                    })
                })
                .collect();
            let payload = json!({
                "error": error.to_string(),
                "violations": violations,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AssessmentServiceError::Store(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

/// Run store-touching service work on the blocking pool; the CSV store does file I/O.
async fn run_blocking<S, T, F>(service: Arc<AssessmentService<S>>, work: F) -> Result<T, Response>
where
    S: AssessmentStore + 'static,
    T: Send + 'static,
    F: FnOnce(&AssessmentService<S>) -> Result<T, AssessmentServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || work(&service)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(error_response(error)),
        Err(join_error) => {
            error!(error = %join_error, "assessment task did not complete");
            let payload = json!({
                "error": "assessment task did not complete",
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    axum::Json(submission): axum::Json<AnswerSubmission>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    let outcome = run_blocking(service, move |service| {
        let envelope = service.submit(submission)?;
        let report = service.report(&envelope);
        Ok((envelope, report))
    })
    .await;

    match outcome {
        Ok((envelope, report)) => {
            let payload = json!({
                "assessment_id": envelope.assessment_id,
                "created_at": envelope.created_at,
                "persistence": envelope.persistence,
                "profile": envelope.result.profile,
                "confidence": envelope.result.confidence,
                "report": report,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn statistics_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    match run_blocking(service, |service| service.statistics()).await {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn export_handler<S>(State(service): State<Arc<AssessmentService<S>>>) -> Response
where
    S: AssessmentStore + 'static,
{
    match run_blocking(service, |service| service.export_csv()).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn clear_handler<S>(State(service): State<Arc<AssessmentService<S>>>) -> Response
where
    S: AssessmentStore + 'static,
{
    match run_blocking(service, |service| service.clear()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(response) => response,
    }
}
