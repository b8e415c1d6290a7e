//! # Service Error Envelope
//!
//! The PascalCase error body shared by PIMS and the payment experience
//! service. When a downstream error is mapped onto a field-level message,
//! the top-level `Message` becomes [`NO_MESSAGE`] and the user-facing text
//! moves into `Details`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client_action::ClientAction;

/// Marker message for errors whose text lives in `Details`.
pub const NO_MESSAGE: &str = "[]";

/// Service-level error codes produced by the payment experience service
/// itself (downstream codes are passed through as strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidRequestData,
    ServiceError,
    RequestFailed,
    OperationNotSupported,
    PaymentInstrumentNotFound,
    PuidNotFound,
    InvalidPicvDetailsPayload,
    ChallengeRequired,
    PimsSessionFailed,
    PimsSessionExpired,
    ValidateCvvReturnedContent,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequestData => "InvalidRequestData",
            Self::ServiceError => "ServiceError",
            Self::RequestFailed => "RequestFailed",
            Self::OperationNotSupported => "OperationNotSupported",
            Self::PaymentInstrumentNotFound => "PaymentInstrumentNotFound",
            Self::PuidNotFound => "PuidNotFound",
            Self::InvalidPicvDetailsPayload => "InvalidPicvDetailsPayload",
            Self::ChallengeRequired => "ChallengeRequired",
            Self::PimsSessionFailed => "PimsSessionFailed",
            Self::PimsSessionExpired => "PimsSessionExpired",
            Self::ValidateCvvReturnedContent => "ValidateCVVReturnedContent",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level entry in `Details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceErrorDetail {
    pub error_code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// The error envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ServiceErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<Box<ServiceErrorResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_display_message: Option<String>,
    #[serde(
        default,
        rename = "clientAction",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_action: Option<ClientAction>,
}

impl ServiceErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.as_str(), message)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_inner(mut self, inner: ServiceErrorResponse) -> Self {
        self.inner_error = Some(Box::new(inner));
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn add_detail(&mut self, detail: ServiceErrorDetail) {
        self.details.push(detail);
    }

    /// Move the user-facing message onto `target` and blank the top-level
    /// message.
    pub fn into_field_error(mut self, message: &str, target: &str) -> Self {
        let code = self.error_code.clone();
        self.add_detail(ServiceErrorDetail {
            error_code: code,
            message: message.to_string(),
            target: Some(target.to_string()),
        });
        self.message = NO_MESSAGE.to_string();
        self
    }

    /// Whether the error code matches, ignoring case.
    pub fn is(&self, code: &str) -> bool {
        self.error_code.eq_ignore_ascii_case(code)
    }
}
