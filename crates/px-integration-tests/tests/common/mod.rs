// SPDX-License-Identifier: BUSL-1.1
//! Shared fixture: a running emulator server and a px-service router wired
//! to it through `PX_EMULATOR_URL`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use px_core::{DisplayHint, PidlResource};
use px_emulators::{EmulatorServer, Emulators, TestHeader};
use px_service::config::ServiceConfig;
use px_service::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub const ACCOUNT: &str = "Account001";
pub const CONTACT: &str = "px-integration-tests";

pub struct TestFixture {
    server: EmulatorServer,
    app: Router,
}

impl TestFixture {
    pub async fn start() -> Self {
        let server = EmulatorServer::start().await.expect("emulator server starts");
        let base = server.base_url();
        let config = ServiceConfig::from_lookup(|var| (var == "PX_EMULATOR_URL").then(|| base.clone()))
            .expect("config from emulator url");
        let state = AppState::new(config).expect("accessors build");
        let app = px_service::app(state).expect("app builds");
        Self { server, app }
    }

    pub fn emulators(&self) -> &Emulators {
        self.server.emulators()
    }

    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self.app.clone(), "GET", uri)
    }

    pub fn post(&self, uri: &str, body: Value) -> TestRequest {
        TestRequest::new(self.app.clone(), "POST", uri).json(body)
    }
}

/// Path of the account's PI collection with `query` appended.
pub fn pis(query: &str) -> String {
    format!("/v7.0/{ACCOUNT}/paymentInstrumentsEx{query}")
}

/// Path of one PI (or one of its actions) with `query` appended.
pub fn pi(piid_and_action: &str, query: &str) -> String {
    format!("/v7.0/{ACCOUNT}/paymentInstrumentsEx/{piid_and_action}{query}")
}

pub struct TestRequest {
    app: Router,
    builder: axum::http::request::Builder,
    body: Option<Value>,
}

impl TestRequest {
    fn new(app: Router, method: &str, uri: &str) -> Self {
        Self {
            app,
            builder: Request::builder().method(method).uri(uri),
            body: None,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Select emulator scenarios through `x-ms-test`.
    pub fn scenarios(self, scenarios: &[&str]) -> Self {
        let value = TestHeader::new(scenarios, CONTACT).to_header_value();
        self.header("x-ms-test", &value)
    }

    pub fn flights(self, flights: &str) -> Self {
        self.header("x-ms-flight", flights)
    }

    pub async fn send(self) -> TestResponse {
        let body = match self.body {
            Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
            None => Body::empty(),
        };
        let request = self
            .builder
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let response = self.app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);
        TestResponse {
            status,
            content_type,
            text,
            json,
        }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub text: String,
    pub json: Value,
}

impl TestResponse {
    pub fn client_action(&self) -> &Value {
        &self.json["clientAction"]
    }

    /// `identity.id` of the first PIDL in the client action.
    pub fn first_pidl_id(&self) -> &str {
        self.client_action()["context"][0]["identity"]["id"]
            .as_str()
            .unwrap_or_default()
    }

    /// The first PIDL in the client action, typed.
    pub fn first_pidl(&self) -> PidlResource {
        serde_json::from_value(self.client_action()["context"][0].clone())
            .unwrap_or_else(|e| panic!("no PIDL in {}: {e}", self.text))
    }
}

/// `displayContent` of the text hint `id`.
pub fn hint_text<'a>(pidl: &'a PidlResource, id: &str) -> &'a str {
    match pidl.find_display_hint(id) {
        Some(DisplayHint::Text { display_content, .. }) => display_content,
        other => panic!("{id} is not a text hint: {other:?}"),
    }
}

/// `sourceUrl` of the image hint `id`.
pub fn hint_image<'a>(pidl: &'a PidlResource, id: &str) -> &'a str {
    match pidl.find_display_hint(id) {
        Some(DisplayHint::Image { source_url, .. }) => source_url,
        other => panic!("{id} is not an image hint: {other:?}"),
    }
}

/// The PI with `id` in a list response.
pub fn find<'a>(list: &'a Value, id: &str) -> &'a Value {
    list.as_array()
        .and_then(|pis| pis.iter().find(|pi| pi["id"] == id))
        .unwrap_or_else(|| panic!("{id} not in {list}"))
}
