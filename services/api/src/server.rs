use crate::cli::ServeArgs;
use crate::infra::{seed_authors, AppState, InMemoryAlertPublisher, InMemoryReportRepository};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jubilee::community::CommunityAlertService;
use jubilee::config::AppConfig;
use jubilee::error::AppError;
use jubilee::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryReportRepository::seeded(seed_authors()));
    let publisher = Arc::new(InMemoryAlertPublisher::default());
    let community_service = Arc::new(CommunityAlertService::new(
        repository,
        publisher,
        config.escalation.clone(),
    ));

    let app = with_api_routes(community_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        window_minutes = config.escalation.report_window_minutes,
        "jubilee watch service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
