//! `GET /v7.0/probe`: load-balancer availability check on the versioned
//! surface. Unlike `/health/readiness` it does not look at downstream
//! configuration.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::SERVICE_NAME;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v7.0/probe", get(probe))
}

/// GET /v7.0/probe — Service availability.
#[utoipa::path(
    get,
    path = "/v7.0/probe",
    responses((status = 200, description = "Service is up", body = ProbeResponse)),
    tag = "probe"
)]
async fn probe() -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn probe_answers_ok() {
        let app = router().with_state(AppState::default());
        let response = app
            .oneshot(Request::builder().uri("/v7.0/probe").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "PXService");
    }
}
