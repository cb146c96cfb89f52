use super::common::*;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::assessment::scoring::ScoringProfile;

fn post_json(body: &serde_json::Value) -> Request<axum::body::Body> {
    Request::post("/api/v1/assessments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("json body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_returns_created_report() {
    let (service, _) = build_service(ScoringProfile::V3);
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(&serde_json::to_value(submission()).expect("serializes")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload.get("assessment_id").is_some());
    assert_eq!(payload["profile"], json!("v3"));
    assert_eq!(payload["persistence"]["status"], json!("stored"));
    assert_eq!(payload["report"]["risk_category"], json!("MEDIUM"));
    assert_eq!(
        payload["report"]["safe_investment"]["safe_monthly_investment"],
        json!(6000.0)
    );
}

#[tokio::test]
async fn submit_route_reports_every_violation() {
    let (service, _) = build_service(ScoringProfile::V3);
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(&json!({
            "monthly_expenses": 30000.0,
            "risk_behavior": 8,
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let fields: Vec<_> = payload["violations"]
        .as_array()
        .expect("violations array")
        .iter()
        .filter_map(|violation| violation["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["monthly_income", "risk_behavior"]);
}

#[tokio::test]
async fn submit_handler_reports_failed_persistence() {
    let service = Arc::new(unavailable_service());

    let response = crate::workflows::assessment::router::submit_handler::<UnavailableStore>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["persistence"]["status"], json!("failed"));
}

#[tokio::test]
async fn statistics_handler_returns_unavailable_on_store_failure() {
    let service = Arc::new(unavailable_service());

    let response =
        crate::workflows::assessment::router::statistics_handler::<UnavailableStore>(State(
            service,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("disk full")));
}

#[tokio::test]
async fn statistics_export_and_clear_routes() {
    let (service, store) = build_service(ScoringProfile::V1);
    service.submit(submission()).expect("submission succeeds");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/assessments/statistics")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_assessments"], json!(1));
    assert_eq!(payload["most_common_category"], json!("LOW RISK"));

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/assessments/export")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE),
        Some(&header::HeaderValue::from_static("text/csv; charset=utf-8"))
    );
    let body = read_text_body(response).await;
    assert_eq!(body.lines().count(), 2);

    let response = router
        .oneshot(
            Request::delete("/api/v1/assessments")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(crate::workflows::assessment::repository::AssessmentStore::load_all(&*store)
        .expect("rows load")
        .is_empty());
}

#[tokio::test]
async fn submit_route_accepts_numbered_choices() {
    let (service, _) = build_service(ScoringProfile::V3);
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(&json!({
            "monthly_income": 50000,
            "monthly_expenses": 30000,
            "emergency_fund": 3,
            "high_interest_debt": 0,
            "age_group": 3,
            "purpose": 4,
            "time_horizon": 3,
            "risk_behavior": 3,
            "experience": 2,
            "knowledge": 3,
            "goal_priority": 2,
            "loss_capacity": 2,
            "liquidity_need": 2,
            "income_stability": 5,
            "dependents": 1,
            "emi_burden": 1,
            "goal_timing": 2,
            "inflation_strategy": 2,
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let answers = &payload["report"]["answers"];
    assert_eq!(answers["purpose"], json!("retirement"));
    assert_eq!(answers["goal_priority"], json!("important"));
    assert_eq!(answers["liquidity_need"], json!("medium"));
    assert_eq!(answers["inflation_strategy"], json!("balanced"));
    assert_eq!(payload["report"]["risk_category"], json!("MEDIUM"));
    assert_eq!(
        payload["report"]["safe_investment"]["safe_monthly_investment"],
        json!(6000.0)
    );
}

#[tokio::test]
async fn submit_route_collects_tier_and_choice_violations() {
    let (service, store) = build_service(ScoringProfile::V3);
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(&json!({
            "monthly_income": 50000,
            "monthly_expenses": 30000,
            "emergency_fund": -1,
            "age_group": 300,
            "purpose": 9,
            "goal_priority": "urgent",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let violations = payload["violations"].as_array().expect("violations array");
    let fields: Vec<_> = violations
        .iter()
        .filter_map(|violation| violation["field"].as_str())
        .collect();
    assert_eq!(
        fields,
        vec!["emergency_fund", "age_group", "purpose", "goal_priority"]
    );
    assert_eq!(
        violations[1]["message"],
        json!("age_group must be between 1 and 5 (found 300)")
    );
    assert_eq!(
        violations[3]["message"],
        json!("goal_priority does not accept \"urgent\"")
    );
    assert!(crate::workflows::assessment::repository::AssessmentStore::load_all(&*store)
        .expect("rows load")
        .is_empty());
}
