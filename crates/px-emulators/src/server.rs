// SPDX-License-Identifier: BUSL-1.1
//! The emulator HTTP server.
//!
//! A single router serves every service. The first path segment picks the
//! [`MockService`]; the rest of the path, the query, headers and JSON body
//! are recorded and handed to it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::error::EmulatorError;
use crate::mock_service::{EmulatedResponse, MockService, RecordedRequest};
use crate::providers::{CannedProvider, DefaultProvider, PimsProvider};
use crate::scenarios::{ScenarioRegistry, TestHeader, TEST_HEADER};
use crate::service::EmulatedService;

struct Inner {
    /// Indexed by `EmulatedService` discriminant.
    services: Vec<MockService>,
    pims: Arc<PimsProvider>,
    scenarios: ScenarioRegistry,
}

/// Every emulated service plus the scenario registry.
///
/// Cheaply cloneable via `Arc`; all clones share the same state.
#[derive(Clone)]
pub struct Emulators {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Emulators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emulators")
            .field("services", &self.inner.services.len())
            .field("scenarios", &self.inner.scenarios.len())
            .finish()
    }
}

impl Emulators {
    /// Emulators with the built-in scenarios.
    pub fn new() -> Result<Self, EmulatorError> {
        Ok(Self::with_scenarios(ScenarioRegistry::builtin()?))
    }

    pub fn with_scenarios(scenarios: ScenarioRegistry) -> Self {
        let pims = Arc::new(PimsProvider::new());
        let services = EmulatedService::ALL
            .into_iter()
            .map(|service| {
                let provider: Arc<dyn DefaultProvider> = match service {
                    EmulatedService::Pims => pims.clone(),
                    other => Arc::new(CannedProvider::new(other)),
                };
                MockService::new(service, provider)
            })
            .collect();
        Self {
            inner: Arc::new(Inner {
                services,
                pims,
                scenarios,
            }),
        }
    }

    pub fn service(&self, service: EmulatedService) -> &MockService {
        &self.inner.services[service as usize]
    }

    pub fn pims(&self) -> &MockService {
        self.service(EmulatedService::Pims)
    }

    pub fn partner_settings(&self) -> &MockService {
        self.service(EmulatedService::PartnerSettings)
    }

    pub fn accounts(&self) -> &MockService {
        self.service(EmulatedService::Accounts)
    }

    /// Direct access to the PIMS store, for seeding and PSD2 setup.
    pub fn pims_store(&self) -> &PimsProvider {
        &self.inner.pims
    }

    /// Reset every service: arrangements, traffic and provider state.
    pub fn reset_to_defaults(&self) {
        for service in &self.inner.services {
            service.reset_to_defaults();
        }
    }

    fn handle(&self, service: EmulatedService, request: RecordedRequest) -> EmulatedResponse {
        let selected = request
            .header(TEST_HEADER)
            .map(|raw| TestHeader::parse(raw).scenario_names())
            .unwrap_or_default();
        self.service(service)
            .respond(request, &self.inner.scenarios, &selected)
    }
}

/// Build the emulator router.
pub fn router(emulators: Emulators) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(emulators)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn dispatch(
    State(emulators): State<Emulators>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let trimmed = uri.path().trim_start_matches('/');
    let (prefix, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));
    let Some(service) = EmulatedService::from_path(prefix) else {
        return into_response(EmulatedResponse::error(
            404,
            "UnknownService",
            &format!("No emulated service is mounted at /{prefix}"),
        ));
    };

    let mut request = RecordedRequest::new(method.as_str(), format!("/{rest}"));
    request.query = Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default();
    for (name, value) in &headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    if !body.is_empty() {
        request.body = Some(
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned())),
        );
    }

    into_response(emulators.handle(service, request))
}

fn into_response(resp: EmulatedResponse) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match resp.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}

/// A running emulator server on an ephemeral local port. Dropping the
/// handle shuts the server down.
pub struct EmulatorServer {
    addr: SocketAddr,
    emulators: Emulators,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl EmulatorServer {
    /// Start a server with fresh emulators and the built-in scenarios.
    pub async fn start() -> Result<Self, EmulatorError> {
        Self::start_with(Emulators::new()?).await
    }

    pub async fn start_with(emulators: Emulators) -> Result<Self, EmulatorError> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();
        let app = router(emulators.clone());

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "emulator server stopped");
            }
        });
        tracing::debug!(%addr, "emulator server started");

        Ok(Self {
            addr,
            emulators,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Root URL, e.g. `http://127.0.0.1:41234`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL of one service, e.g. `http://127.0.0.1:41234/pims`.
    pub fn service_url(&self, service: EmulatedService) -> String {
        format!("{}/{}", self.base_url(), service.path())
    }

    pub fn emulators(&self) -> &Emulators {
        &self.emulators
    }

    /// Stop the server and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for EmulatorServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_app() -> (Emulators, Router) {
        let emulators = Emulators::new().expect("emulators");
        (emulators.clone(), router(emulators))
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_200() {
        let (_, app) = test_app();
        let req = axum::http::Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dispatches_by_service_prefix_and_records() {
        let (emulators, app) = test_app();
        let req = axum::http::Request::builder()
            .uri("/pims/v4.0/Account001/paymentInstruments?status=active")
            .header("x-ms-correlation-id", "c-1")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let pis = body_json(resp).await;
        assert!(pis.as_array().unwrap().iter().all(|p| p["status"] == "active"));

        let recorded = emulators.pims().requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path, "/v4.0/Account001/paymentInstruments");
        assert_eq!(recorded[0].query_value("status"), Some("active"));
        assert_eq!(recorded[0].header("X-MS-Correlation-Id"), Some("c-1"));
    }

    #[tokio::test]
    async fn unknown_prefix_is_404() {
        let (_, app) = test_app();
        let req = axum::http::Request::builder()
            .uri("/payerauth/anything")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["ErrorCode"], "UnknownService");
    }

    #[tokio::test]
    async fn test_header_selects_scenario() {
        let (_, app) = test_app();
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/frauddetection/api/v1/botcheck")
            .header(TEST_HEADER, r#"{"scenarios":"px.frauddetection.rejected","contact":"cit"}"#)
            .header("content-type", "application/json")
            .body(Body::from(json!({ "requestId": "r1" }).to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(body_json(resp).await["recommendation"], "Rejected");
    }

    #[tokio::test]
    async fn arranged_no_content_is_empty() {
        let (emulators, app) = test_app();
        emulators
            .accounts()
            .arrange_response(Value::Null, 204, Some("GET"), Some("/profiles"));
        let req = axum::http::Request::builder()
            .uri("/accounts/Account001/profiles?type=consumer")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn server_serves_on_ephemeral_port() {
        let server = EmulatorServer::start().await.expect("start");
        let url = format!("{}/v4.0/Account002/paymentInstruments", server.service_url(EmulatedService::Pims));
        let pis: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(pis[0]["id"], "Account002-Pi001-Amex");
        assert_eq!(server.emulators().pims().requests().len(), 1);
        server.shutdown().await;
    }
}
