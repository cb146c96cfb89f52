use crate::cli::ServeArgs;
use crate::infra::{backend_override, AppState, ConfiguredStore};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use risk_advisor::config::AppConfig;
use risk_advisor::error::AppError;
use risk_advisor::telemetry;
use risk_advisor::workflows::assessment::{AssessmentService, ScoringConfig};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(profile) = args.profile.take() {
        config.advisor.profile = profile;
    }
    config.advisor.store = backend_override(args.store.take(), config.advisor.store);

    telemetry::init(&config.telemetry)?;

    let scoring = ScoringConfig::for_profile(config.advisor.profile);
    let store = Arc::new(ConfiguredStore::from_backend(&config.advisor.store));
    let store_label = store.describe();
    let service = Arc::new(AssessmentService::new(store, scoring.clone())?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        scoring: Arc::new(scoring),
    };

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        profile = %config.advisor.profile,
        store = %store_label,
        "risk advisor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
