use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_comment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use report_comments::config::AppConfig;
use report_comments::error::AppError;
use report_comments::telemetry;
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

    let comment_service = build_service(&config)?;
    info!(
        banks = comment_service.banks().len(),
        char_budget = comment_service.settings().char_budget,
        row_cap = comment_service.settings().batch_row_cap,
        "statement banks registered"
    );

    let app = with_comment_routes(comment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "report comment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
