//! # API Error Types
//!
//! [`AppError`] implements `axum::response::IntoResponse` and always
//! answers with a [`ServiceErrorResponse`] body, the same PascalCase
//! envelope PIMS uses. Downstream errors that a handler has already mapped
//! to a user-facing message are carried as [`AppError::Downstream`] and
//! returned unchanged. Internal error details are logged and never exposed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use px_accessors::AccessorError;
use px_core::messages;
use px_core::{ErrorCode, PxCoreError, ServiceErrorResponse};
use thiserror::Error;

/// Name reported in the `Source` of errors raised by this service.
pub const SERVICE_NAME: &str = "PXService";

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed (400).
    #[error("validation error {code}: {message}")]
    Validation { code: String, message: String },

    /// Resource not found (404). The body is returned as-is.
    #[error("not found: {}", .0.message)]
    NotFound(Box<ServiceErrorResponse>),

    /// An error envelope with its final status, usually a mapped
    /// downstream error.
    #[error("downstream error {status}: {}", error.error_code)]
    Downstream {
        status: StatusCode,
        error: Box<ServiceErrorResponse>,
    },

    /// Service dependency not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 400 `InvalidRequestData`.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::validation(ErrorCode::InvalidRequestData, message)
    }

    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code: code.as_str().to_string(),
            message: message.into(),
        }
    }

    /// Return an already-built envelope with `status`.
    pub fn downstream(status: StatusCode, error: ServiceErrorResponse) -> Self {
        Self::Downstream {
            status,
            error: Box::new(error),
        }
    }

    /// A downstream envelope returned with its original status.
    pub fn with_status(status: u16, error: ServiceErrorResponse) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::downstream(status, error)
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self::ServiceUnavailable(msg.to_string())
    }

    /// Return the HTTP status code and error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &str) {
        match self {
            Self::Validation { code, .. } => (StatusCode::BAD_REQUEST, code),
            Self::NotFound(error) => (StatusCode::NOT_FOUND, &error.error_code),
            Self::Downstream { status, error } => (*status, &error.error_code),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailable"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::ServiceError.as_str()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            Self::Downstream { status, .. } if status.is_server_error() => {
                tracing::warn!(error = %self, "downstream error")
            }
            _ => {}
        }

        let body = match self {
            Self::Validation { code, message } => {
                ServiceErrorResponse::new(code, message).with_source(SERVICE_NAME)
            }
            Self::NotFound(error) | Self::Downstream { error, .. } => *error,
            Self::ServiceUnavailable(message) => {
                ServiceErrorResponse::new("ServiceUnavailable", message).with_source(SERVICE_NAME)
            }
            Self::Internal(_) => {
                ServiceErrorResponse::from_code(ErrorCode::ServiceError, messages::GENERIC)
                    .with_source(SERVICE_NAME)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Unmapped downstream failures. Handlers that map errors per payment
/// family inspect [`AccessorError::service_error`] before falling back
/// to this conversion.
impl From<AccessorError> for AppError {
    fn from(err: AccessorError) -> Self {
        match err {
            AccessorError::Service { status, error, .. } => Self::with_status(status, error),
            AccessorError::Config(msg) => Self::ServiceUnavailable(msg),
            other @ (AccessorError::Http { .. } | AccessorError::Deserialization { .. }) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<PxCoreError> for AppError {
    fn from(err: PxCoreError) -> Self {
        match err {
            PxCoreError::QrCode(_) => Self::Internal(err.to_string()),
            other => Self::invalid_request(other.to_string()),
        }
    }
}
