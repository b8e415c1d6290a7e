//! # px-service — Payment Experience Service
//!
//! Axum implementation of the `paymentInstrumentsEx` surface: the PI
//! operations the PIDL SDK calls, and the client actions (challenges,
//! redirects, status checks) attached to their responses.
//!
//! ## API Surface
//!
//! | Path                                                 | Module                          |
//! |------------------------------------------------------|---------------------------------|
//! | `/v7.0/probe`                                        | [`routes::probe`]               |
//! | `/v7.0/{accountId}/paymentInstrumentsEx[/{piid}]`    | [`routes::instruments`]         |
//! | `/v7.0/{accountId}/paymentInstrumentsEx/{piid}/*`    | [`routes::instrument_actions`]  |
//! | `/v7.0/paymentInstrumentsEx/*`                       | [`routes::anonymous`]           |
//! | `/health/*`, `/metrics`                              | this module                     |
//! | `/openapi.json`                                      | [`openapi`]                     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → BodyLimit → Handler
//! ```
//!
//! Downstream calls go through the accessor traits of `px-accessors`; a
//! service with no configured URL makes the handlers that need it answer
//! 503.

pub mod client_actions;
pub mod config;
pub mod csv_token;
pub mod error;
pub mod error_mapping;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod pidl_factory;
pub mod risk_data;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Fails only when the Prometheus collectors cannot be registered.
pub fn app(state: AppState) -> Result<Router, prometheus::Error> {
    let metrics = ApiMetrics::new()?;

    let api = Router::new()
        .merge(routes::probe::router())
        .merge(routes::instruments::router())
        .merge(routes::instrument_actions::router())
        .merge(routes::anonymous::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(axum::Extension(metrics.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .route("/metrics", axum::routing::get(prometheus_metrics))
        .layer(axum::Extension(metrics))
        .with_state(state);

    Ok(Router::new().merge(probes).merge(api))
}

/// GET /metrics — Prometheus metrics scrape endpoint.
async fn prometheus_metrics(Extension(metrics): Extension<ApiMetrics>) -> impl IntoResponse {
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. PIMS and partner settings must be configured; every
/// other accessor is optional and only fails the routes that use it.
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if !state.is_ready() {
        let missing = state.config.unconfigured_services().join(", ");
        let msg = format!("downstream services not configured: {missing}");
        tracing::warn!("{}", msg);
        return (StatusCode::SERVICE_UNAVAILABLE, msg).into_response();
    }
    (StatusCode::OK, "ready").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let (status, body) = get(app(AppState::default()).unwrap(), "/health/liveness").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn readiness_names_missing_services() {
        let (status, body) = get(app(AppState::default()).unwrap(), "/health/readiness").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("PX_PIMS_URL"));
    }

    #[tokio::test]
    async fn metrics_count_api_requests() {
        let app = app(AppState::default()).unwrap();
        let (status, _) = get(app.clone(), "/v7.0/probe").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("px_http_requests_total"));
        assert!(body.contains("/v7.0/probe"));
    }

    #[tokio::test]
    async fn openapi_is_served() {
        let (status, body) = get(app(AppState::default()).unwrap(), "/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("paymentInstrumentsEx"));
    }
}
