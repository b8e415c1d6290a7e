//! Downstream accessor error types.

use px_core::ServiceErrorResponse;

/// Errors from downstream service calls.
#[derive(Debug, thiserror::Error)]
pub enum AccessorError {
    /// HTTP transport error.
    #[error("HTTP error calling {service} {operation}: {source}")]
    Http {
        service: &'static str,
        operation: &'static str,
        source: reqwest::Error,
    },
    /// The service answered with a non-2xx status. `error` is the parsed
    /// error envelope, or a synthetic one wrapping the raw body.
    #[error("{service} returned {status}: {} {}", error.error_code, error.message)]
    Service {
        service: &'static str,
        status: u16,
        error: ServiceErrorResponse,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize {service} {operation} response: {reason}")]
    Deserialization {
        service: &'static str,
        operation: &'static str,
        reason: String,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AccessorError {
    /// Downstream status code when the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Downstream error envelope when the service answered.
    pub fn service_error(&self) -> Option<&ServiceErrorResponse> {
        match self {
            Self::Service { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_exposes_status_and_envelope() {
        let err = AccessorError::Service {
            service: "PIMS",
            status: 404,
            error: ServiceErrorResponse::new("AccountPINotFound", "not found"),
        };
        assert!(err.is_not_found());
        assert_eq!(err.service_error().map(|e| e.error_code.as_str()), Some("AccountPINotFound"));
        assert_eq!(err.to_string(), "PIMS returned 404: AccountPINotFound not found");
    }

    #[test]
    fn config_error_has_no_status() {
        let err = AccessorError::Config("missing base url".into());
        assert_eq!(err.status(), None);
        assert!(err.service_error().is_none());
    }
}
