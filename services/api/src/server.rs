use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use propdesk::auth::ApiAuth;
use propdesk::catalog::CatalogService;
use propdesk::config::AppConfig;
use propdesk::error::AppError;
use propdesk::telemetry;
use propdesk::telephony::TelnyxClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(load_catalog(config.seed_path.as_deref())?);
    let catalog_service = Arc::new(CatalogService::new(catalog));

    let call_control = Arc::new(TelnyxClient::new(&config.telnyx)?);
    if !call_control.is_configured() {
        warn!("TELNYX_API_KEY is not set; call-control requests will fail");
    }

    let auth = ApiAuth::from_config(&config.auth);
    if !auth.is_configured() {
        warn!("APP_API_TOKENS is empty; every /api request will be rejected");
    }

    let app = with_service_routes(catalog_service, call_control, auth)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "property desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
