//! Shared reqwest plumbing for every accessor.
//!
//! Each `Http*Accessor` owns one [`ServiceClient`]: a configured
//! `reqwest::Client`, the normalized base URL, and the service name used in
//! errors and logs. GETs follow the configured [`RetryPolicy`]; writes are sent once.

use std::time::Duration;

use px_core::client_action::status_name;
use px_core::ServiceErrorResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub(crate) struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    service: &'static str,
    retry: RetryPolicy,
}

impl ServiceClient {
    pub(crate) fn new(service: &'static str, config: AccessorConfig) -> Result<Self, AccessorError> {
        let base_url = config.normalized_base_url()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| AccessorError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            service,
            retry: config.retry,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET with retry, decoding a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &AccessorContext,
        path: &str,
        query: &[(&str, String)],
        operation: &'static str,
    ) -> Result<T, AccessorError> {
        let url = self.url(path);
        let resp = self
            .retry
            .send(self.service, || ctx.apply(self.client.get(&url).query(query)).send())
            .await
        .map_err(|source| self.transport(operation, source))?;
        let resp = self.check(resp, operation).await?;
        self.decode(resp, operation).await
    }

    /// POST a JSON body, decoding a JSON response.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        ctx: &AccessorContext,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        operation: &'static str,
    ) -> Result<T, AccessorError> {
        let resp = self.post(ctx, path, query, body, operation).await?;
        self.decode(resp, operation).await
    }

    /// POST a JSON body. Returns the parsed body, or `None` for an empty one
    /// (e.g. 204).
    pub(crate) async fn post_optional<B: Serialize + ?Sized>(
        &self,
        ctx: &AccessorContext,
        path: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<(u16, Option<Value>), AccessorError> {
        let resp = self.post(ctx, path, &[], body, operation).await?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|source| self.transport(operation, source))?;
        if text.trim().is_empty() {
            return Ok((status, None));
        }
        let value = serde_json::from_str(&text).map_err(|e| AccessorError::Deserialization {
            service: self.service,
            operation,
            reason: e.to_string(),
        })?;
        Ok((status, Some(value)))
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        ctx: &AccessorContext,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        operation: &'static str,
    ) -> Result<reqwest::Response, AccessorError> {
        let request = ctx.apply(self.client.post(self.url(path)).query(query).json(body));
        let resp = request
            .send()
            .await
            .map_err(|source| self.transport(operation, source))?;
        self.check(resp, operation).await
    }

    fn transport(&self, operation: &'static str, source: reqwest::Error) -> AccessorError {
        tracing::warn!(service = self.service, operation, error = %source, "downstream transport failure");
        AccessorError::Http {
            service: self.service,
            operation,
            source,
        }
    }

    /// Turn a non-2xx response into [`AccessorError::Service`].
    async fn check(
        &self,
        resp: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, AccessorError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let error = parse_error_body(status.as_u16(), &body);
        tracing::warn!(
            service = self.service,
            operation,
            status = status.as_u16(),
            error_code = %error.error_code,
            "downstream service returned an error"
        );
        Err(AccessorError::Service {
            service: self.service,
            status: status.as_u16(),
            error,
        })
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        operation: &'static str,
    ) -> Result<T, AccessorError> {
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| self.transport(operation, source))?;
        serde_json::from_slice(&bytes).map_err(|e| AccessorError::Deserialization {
            service: self.service,
            operation,
            reason: e.to_string(),
        })
    }
}

/// Parse a downstream error body. Bodies that are not an error envelope
/// are wrapped in one named after the status.
pub(crate) fn parse_error_body(status: u16, body: &str) -> ServiceErrorResponse {
    match serde_json::from_str::<ServiceErrorResponse>(body) {
        Ok(err) if !err.error_code.is_empty() => err,
        _ => ServiceErrorResponse::new(status_name(status), body),
    }
}
