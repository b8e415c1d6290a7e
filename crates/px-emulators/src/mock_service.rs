// SPDX-License-Identifier: BUSL-1.1
//! A single emulated downstream service.
//!
//! Resolution order for every request:
//!
//! 1. the newest arranged response whose method and URL pattern match,
//! 2. the one `x-ms-test` scenario that answers the request (400
//!    `MultipleScenariosMatched` when several do),
//! 3. the service's [`DefaultProvider`].
//!
//! Every request is recorded before it is answered.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::providers::DefaultProvider;
use crate::scenarios::{ScenarioOutcome, ScenarioRegistry};
use crate::service::EmulatedService;

/// A request received by an emulated service. `path` is relative to the
/// service prefix and always starts with `/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Header names are lower case.
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// First value of a query parameter, ignoring key case.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a repeatable query parameter.
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Non-empty path segments.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Path plus the re-encoded query, used for URL pattern matching.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    /// String field of the JSON body.
    pub fn body_str(&self, field: &str) -> Option<&str> {
        self.body.as_ref()?.get(field)?.as_str()
    }
}

/// The response an emulated service sends back. A `None` body is sent
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EmulatedResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl EmulatedResponse {
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body).filter(|b| !b.is_null()),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    /// A PascalCase error envelope, as the real services send.
    pub fn error(status: u16, code: &str, message: &str) -> Self {
        Self::json(
            status,
            json!({
                "CorrelationId": uuid::Uuid::new_v4().to_string(),
                "ErrorCode": code,
                "Message": message,
            }),
        )
    }
}

#[derive(Debug, Clone)]
struct Arrangement {
    response: EmulatedResponse,
    method: Option<String>,
    url_pattern: Option<String>,
}

impl Arrangement {
    fn matches(&self, request: &RecordedRequest) -> bool {
        let method_ok = self
            .method
            .as_deref()
            .map_or(true, |m| m.eq_ignore_ascii_case(&request.method));
        let url_ok = self
            .url_pattern
            .as_deref()
            .map_or(true, |p| pattern_matches(p, &request.path_and_query()));
        method_ok && url_ok
    }
}

/// Case-insensitive, unanchored match where `*` spans any text. A trailing
/// `$` anchors the pattern at the end of the path, ignoring the query,
/// unless the last segment is a `*`.
pub(crate) fn pattern_matches(pattern: &str, text: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let text = text.to_ascii_lowercase();
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(p) => (p, !p.ends_with('*')),
        None => (pattern.as_str(), false),
    };
    let mut rest = if anchored {
        text.split('?').next().unwrap_or("")
    } else {
        text.as_str()
    };
    let parts: Vec<&str> = pattern.split('*').filter(|p| !p.is_empty()).collect();
    for (i, part) in parts.iter().enumerate() {
        if anchored && i + 1 == parts.len() {
            return rest.ends_with(part);
        }
        match rest.find(part) {
            Some(at) => rest = &rest[at + part.len()..],
            None => return false,
        }
    }
    true
}

/// One emulated service: arrangements, recorded traffic, and a default
/// provider.
pub struct MockService {
    service: EmulatedService,
    arranged: Mutex<Vec<Arrangement>>,
    requests: Mutex<Vec<RecordedRequest>>,
    provider: Arc<dyn DefaultProvider>,
}

impl std::fmt::Debug for MockService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockService")
            .field("service", &self.service)
            .field("arranged", &self.arranged.lock().len())
            .field("requests", &self.requests.lock().len())
            .finish()
    }
}

impl MockService {
    pub fn new(service: EmulatedService, provider: Arc<dyn DefaultProvider>) -> Self {
        Self {
            service,
            arranged: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            provider,
        }
    }

    pub fn service(&self) -> EmulatedService {
        self.service
    }

    /// Answer every request to this service with `content` (status 200).
    pub fn arrange(&self, content: Value) {
        self.arrange_response(content, 200, None, None);
    }

    /// Arrange a response for requests matching `method` and `url_pattern`.
    /// Either filter may be omitted; the newest matching arrangement wins.
    /// A `Null` content is sent as an empty body.
    pub fn arrange_response(
        &self,
        content: Value,
        status: u16,
        method: Option<&str>,
        url_pattern: Option<&str>,
    ) {
        self.arranged.lock().push(Arrangement {
            response: EmulatedResponse::json(status, content),
            method: method.map(str::to_string),
            url_pattern: url_pattern.map(str::to_string),
        });
    }

    /// Every request received since the last reset, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Requests whose path contains `fragment` (case-insensitive).
    pub fn requests_matching(&self, fragment: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| pattern_matches(fragment, &r.path))
            .cloned()
            .collect()
    }

    pub fn reset_to_defaults(&self) {
        self.arranged.lock().clear();
        self.requests.lock().clear();
        self.provider.reset();
    }

    /// Record and answer one request.
    pub fn respond(
        &self,
        request: RecordedRequest,
        scenarios: &ScenarioRegistry,
        selected: &[String],
    ) -> EmulatedResponse {
        self.requests.lock().push(request.clone());

        let arranged = self
            .arranged
            .lock()
            .iter()
            .rev()
            .find(|a| a.matches(&request))
            .map(|a| a.response.clone());
        if let Some(response) = arranged {
            tracing::debug!(service = %self.service, path = %request.path, "arranged response");
            return response;
        }

        match scenarios.resolve(self.service, selected, &request) {
            ScenarioOutcome::Answered { scenario, response } => {
                tracing::debug!(service = %self.service, scenario, "scenario response");
                response
            }
            ScenarioOutcome::Conflict(names) => {
                tracing::warn!(service = %self.service, scenarios = ?names, "multiple scenarios matched");
                EmulatedResponse::error(
                    400,
                    "MultipleScenariosMatched",
                    &format!("More than one test scenario matched: {}", names.join(",")),
                )
            }
            ScenarioOutcome::Unmatched => self.provider.respond(&request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CannedProvider;

    fn fraud() -> MockService {
        MockService::new(
            EmulatedService::FraudDetection,
            Arc::new(CannedProvider::new(EmulatedService::FraudDetection)),
        )
    }

    fn no_scenarios() -> ScenarioRegistry {
        ScenarioRegistry::default()
    }

    #[test]
    fn pattern_matching() {
        assert!(pattern_matches("*/extendedView*", "/v4.0/paymentInstruments/pi/extendedview"));
        assert!(pattern_matches("/sessions/", "/v4.0/sessions/abc"));
        assert!(pattern_matches("*", "/anything"));
        assert!(!pattern_matches("/remove", "/paymentInstruments/pi/replace"));
        assert!(pattern_matches("/paymentInstruments$", "/v4.0/Account001/paymentInstruments?country=us"));
        assert!(!pattern_matches("/paymentInstruments$", "/v4.0/Account001/paymentInstruments/pi/resume"));
        assert!(pattern_matches("/paymentInstruments*$", "/v4.0/Account001/paymentInstruments/pi/resume"));
        assert!(pattern_matches("abc*$", "/x/abcdef"));
        assert!(!pattern_matches("abc*$", "/x/def"));
    }

    #[test]
    fn newest_matching_arrangement_wins() {
        let svc = fraud();
        svc.arrange(json!({ "recommendation": "Rejected" }));
        svc.arrange_response(json!({ "recommendation": "Review" }), 200, Some("POST"), Some("botcheck"));
        svc.arrange_response(json!({ "ignored": true }), 500, Some("GET"), None);

        let resp = svc.respond(
            RecordedRequest::new("post", "/api/v1/botcheck"),
            &no_scenarios(),
            &[],
        );
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body.unwrap()["recommendation"], "Review");
    }

    #[test]
    fn defaults_apply_without_arrangements() {
        let svc = fraud();
        let resp = svc.respond(
            RecordedRequest::new("POST", "/api/v1/botcheck"),
            &no_scenarios(),
            &[],
        );
        assert_eq!(resp.body.unwrap()["recommendation"], "Approved");
    }

    #[test]
    fn reset_clears_arrangements_and_traffic() {
        let svc = fraud();
        svc.arrange_response(Value::Null, 503, None, None);
        let req = RecordedRequest::new("POST", "/api/v1/botcheck").with_body(json!({ "a": 1 }));
        assert_eq!(svc.respond(req, &no_scenarios(), &[]).status, 503);
        assert_eq!(svc.requests().len(), 1);
        assert_eq!(svc.requests()[0].body, Some(json!({ "a": 1 })));

        svc.reset_to_defaults();
        assert!(svc.requests().is_empty());
        let req = RecordedRequest::new("POST", "/api/v1/botcheck");
        assert_eq!(svc.respond(req, &no_scenarios(), &[]).status, 200);
    }

    #[test]
    fn null_content_is_an_empty_body() {
        let resp = EmulatedResponse::json(204, Value::Null);
        assert!(resp.body.is_none());
    }

    #[test]
    fn query_helpers() {
        let req = RecordedRequest::new("GET", "/v4.0/Account001/paymentInstruments")
            .with_query("status", "active")
            .with_query("Status", "pending");
        assert_eq!(req.query_values("status"), vec!["active", "pending"]);
        assert_eq!(
            req.path_and_query(),
            "/v4.0/Account001/paymentInstruments?status=active&Status=pending"
        );
        assert_eq!(req.segments(), vec!["v4.0", "Account001", "paymentInstruments"]);
    }
}
