use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use propdesk::auth::ApiAuth;
use propdesk::catalog::{catalog_router, CatalogRepository, CatalogService};
use propdesk::telephony::{telephony_router, CallControl};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_service_routes<R, C>(
    catalog: Arc<CatalogService<R>>,
    call_control: Arc<C>,
    auth: ApiAuth,
) -> Router
where
    R: CatalogRepository + 'static,
    C: CallControl + 'static,
{
    catalog_router(catalog)
        .merge(telephony_router(call_control))
        .layer(Extension(auth))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use propdesk::catalog::CatalogSeed;
    use propdesk::config::TelnyxConfig;
    use propdesk::telephony::TelnyxClient;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const TOKEN: &str = "ops-token";

    fn app(ready: bool) -> Router {
        let catalog = CatalogSeed::demo().into_catalog().expect("demo seed");
        let service = Arc::new(CatalogService::new(Arc::new(catalog)));
        let client = Arc::new(TelnyxClient::new(&TelnyxConfig::default()).expect("client"));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(service, client, ApiAuth::new([TOKEN])).layer(Extension(state))
    }

    async fn get_json(router: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = router
            .oneshot(request.body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = get_json(app(true), "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = get_json(app(false), "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, _) = get_json(app(true), "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn merged_api_routes_share_the_auth_gate() {
        let (status, _) = get_json(app(true), "/api/properties", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, page) = get_json(app(true), "/api/properties", Some(TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["pagination"]["totalCount"], 3);

        let (status, _) = get_json(app(true), "/api/telnyx/calls/v3:abc", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unconfigured_provider_reports_failure() {
        let (status, body) = get_json(app(true), "/api/telnyx/calls/v3:abc", Some(TOKEN)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch call status");
    }
}
