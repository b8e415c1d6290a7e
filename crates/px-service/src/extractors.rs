//! # Custom Extractors
//!
//! [`RequestContext`] collects the headers every operation reads (flights,
//! test scenarios, client context). [`PiQuery`] reads the query string with
//! case-insensitive keys and a repeatable `status`. JSON bodies are parsed
//! by hand so that an empty body can be told apart from a malformed one.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use px_accessors::context::{CORRELATION_ID_HEADER, FLIGHT_HEADER, TEST_HEADER};
use px_accessors::AccessorContext;
use px_core::client_context::ENCODING_HEADER;
use px_core::{ClientContext, Flights};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;

pub const DEVICE_INFO_HEADER: &str = "x-ms-deviceinfo";
pub const AAD_INFO_HEADER: &str = "x-ms-aadinfo";
pub const MSA_PROFILE_HEADER: &str = "x-ms-msaprofile";
pub const CUSTOMER_TYPE_HEADER: &str = "x-ms-customer-type";
pub const PIDLSDK_VERSION_HEADER: &str = "x-ms-pidlsdk-version";
pub const REQUEST_CONTEXT_HEADERS: [&str; 2] = ["request-context", "x-ms-request-context"];

/// Validation hook for typed request bodies.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Map a JSON rejection to a 400 `InvalidRequestData`.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::invalid_request(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::invalid_request)?;
    Ok(value)
}

/// `None` for an empty (or `null`) body; 400 when the body is not JSON.
pub fn optional_json_body(body: &Bytes) -> Result<Option<Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_request(format!("request body is not valid JSON: {e}")))?;
    Ok(Some(value).filter(|v| !v.is_null()))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Header-derived context shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub correlation_id: String,
    pub flights: Flights,
    pub raw_flights: Option<String>,
    pub test_header: Option<String>,
    pub device_info: ClientContext,
    pub aad_info: ClientContext,
    pub msa_profile: ClientContext,
    pub customer_type: Option<String>,
    pub pidlsdk_version: Option<String>,
    pub request_context: Option<String>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let base64 = header(headers, ENCODING_HEADER)
            .map(|v| v.eq_ignore_ascii_case("base64"))
            .unwrap_or(false);
        let client_context = |name: &str| -> Result<ClientContext, AppError> {
            match header(headers, name) {
                Some(raw) => Ok(ClientContext::parse(name, &raw, base64)?),
                None => Ok(ClientContext::default()),
            }
        };
        let raw_flights = header(headers, FLIGHT_HEADER);

        Ok(Self {
            correlation_id: header(headers, CORRELATION_ID_HEADER)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            flights: raw_flights.as_deref().map(Flights::parse).unwrap_or_default(),
            raw_flights,
            test_header: header(headers, TEST_HEADER),
            device_info: client_context(DEVICE_INFO_HEADER)?,
            aad_info: client_context(AAD_INFO_HEADER)?,
            msa_profile: client_context(MSA_PROFILE_HEADER)?,
            customer_type: header(headers, CUSTOMER_TYPE_HEADER),
            pidlsdk_version: header(headers, PIDLSDK_VERSION_HEADER),
            request_context: REQUEST_CONTEXT_HEADERS
                .iter()
                .find_map(|name| header(headers, name)),
        })
    }

    /// Headers forwarded to downstream calls made for this request.
    pub fn accessor_context(&self) -> AccessorContext {
        AccessorContext::new(self.correlation_id.clone())
            .with_test_header(self.test_header.clone())
            .with_flights(self.raw_flights.clone())
    }

    /// Anonymous (guest) checkout.
    pub fn is_guest(&self) -> bool {
        self.customer_type
            .as_deref()
            .map(|t| t.eq_ignore_ascii_case("anonymous"))
            .unwrap_or(false)
    }

    pub fn flight(&self, name: &str) -> bool {
        self.flights.is_enabled(name)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

/// Query parameters of the `paymentInstrumentsEx` surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PiQuery {
    pub country: Option<String>,
    pub partner: String,
    pub language: String,
    pub scenario: Option<String>,
    pub complete_prerequisites: bool,
    pub operation: Option<String>,
    pub include_pidl: bool,
    pub status: Vec<String>,
    pub billable_account_id: Option<String>,
    pub classic_product: Option<String>,
    pub session_query_url: Option<String>,
    pub payment_session_id: Option<String>,
    pub target_payment_instrument_id: Option<String>,
    pub request_id: Option<String>,
    pub reference_id: Option<String>,
    pub session_id: Option<String>,
    pub is_successful: bool,
    pub device_id: Option<String>,
}

pub const DEFAULT_PARTNER: &str = "default";
pub const DEFAULT_LANGUAGE: &str = "en-US";

impl Default for PiQuery {
    fn default() -> Self {
        Self {
            country: None,
            partner: DEFAULT_PARTNER.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            scenario: None,
            complete_prerequisites: false,
            operation: None,
            include_pidl: false,
            status: Vec::new(),
            billable_account_id: None,
            classic_product: None,
            session_query_url: None,
            payment_session_id: None,
            target_payment_instrument_id: None,
            request_id: None,
            reference_id: None,
            session_id: None,
            is_successful: false,
            device_id: None,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl PiQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.to_ascii_lowercase().as_str() {
                "country" => query.country = Some(value.to_ascii_lowercase()),
                "partner" => query.partner = value,
                "language" => query.language = value,
                "scenario" => query.scenario = Some(value),
                "completeprerequisites" => query.complete_prerequisites = parse_bool(&value),
                "operation" => query.operation = Some(value),
                "includepidl" => query.include_pidl = parse_bool(&value),
                "status" => query
                    .status
                    .extend(value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty())),
                "billableaccountid" => query.billable_account_id = Some(value),
                "classicproduct" => query.classic_product = Some(value),
                "sessionqueryurl" => query.session_query_url = Some(value),
                "paymentsessionid" => query.payment_session_id = Some(value),
                "targetpaymentinstrumentid" => query.target_payment_instrument_id = Some(value),
                "requestid" => query.request_id = Some(value),
                "referenceid" => query.reference_id = Some(value),
                "sessionid" => query.session_id = Some(value),
                "issuccessful" => query.is_successful = parse_bool(&value),
                "deviceid" => query.device_id = Some(value),
                _ => {}
            }
        }
        query
    }

    pub fn country(&self) -> &str {
        self.country.as_deref().unwrap_or_default()
    }

    /// Case-insensitive scenario check.
    pub fn has_scenario(&self, scenario: &str) -> bool {
        self.scenario
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case(scenario))
            .unwrap_or(false)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PiQuery {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::invalid_request(e.body_text()))?;
        Ok(Self::from_pairs(pairs))
    }
}
