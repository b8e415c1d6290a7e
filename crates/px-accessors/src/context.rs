//! Per-request context forwarded to every downstream call.

use reqwest::RequestBuilder;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-ms-correlation-id";
pub const TEST_HEADER: &str = "x-ms-test";
pub const FLIGHT_HEADER: &str = "x-ms-flight";

/// Headers propagated from the inbound request to downstream services.
///
/// `x-ms-test` is what lets the emulators pick a scenario, so it must reach
/// every call made on behalf of the request.
#[derive(Debug, Clone, Default)]
pub struct AccessorContext {
    pub correlation_id: String,
    pub test_header: Option<String>,
    pub flights: Option<String>,
}

impl AccessorContext {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            ..Default::default()
        }
    }

    /// A context with a fresh correlation id.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn with_test_header(mut self, value: Option<String>) -> Self {
        self.test_header = value;
        self
    }

    pub fn with_flights(mut self, value: Option<String>) -> Self {
        self.flights = value;
        self
    }

    pub(crate) fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        request = request.header(CORRELATION_ID_HEADER, &self.correlation_id);
        if let Some(test) = &self.test_header {
            request = request.header(TEST_HEADER, test);
        }
        if let Some(flights) = &self.flights {
            request = request.header(FLIGHT_HEADER, flights);
        }
        request
    }
}
