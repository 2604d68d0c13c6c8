use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryStore};
use crate::routes::with_matching_routes;
use agevo_match::config::AppConfig;
use agevo_match::error::AppError;
use agevo_match::matching::MatchingService;
use agevo_match::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let catalog = load_catalog(config.catalog.grant_catalog.as_deref())?;
    let source = config
        .catalog
        .grant_catalog
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "bundled sample".to_string());
    info!(
        %source,
        grants = catalog.len(),
        active = catalog.active().len(),
        "grant catalog ready"
    );

    let store = Arc::new(InMemoryStore::from_catalog(catalog));
    let matching_service = Arc::new(MatchingService::new(store));

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grant matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
