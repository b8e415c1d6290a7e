//! # Prometheus Metrics
//!
//! HTTP request counts, latency and errors, recorded by
//! [`metrics_middleware`] and exported on `/metrics`.
//!
//! The `path` label is the matched route template
//! (`/v7.0/:account_id/paymentInstrumentsEx/:piid`), so account and PI ids
//! never become label values. Unmatched requests fall back to the raw path
//! with UUID segments replaced by `{id}`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

fn sum(counter: &IntCounterVec) -> u64 {
    counter
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

impl ApiMetrics {
    /// Create a metrics instance with a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("px_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )?;
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "px_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )?;
        let http_errors_total = IntCounterVec::new(
            Opts::new("px_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_errors_total.clone()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
            }),
        })
    }

    /// Total request count across all labels.
    pub fn requests(&self) -> u64 {
        sum(&self.inner.http_requests_total)
    }

    /// Total error count across all labels.
    pub fn errors(&self) -> u64 {
        sum(&self.inner.http_errors_total)
    }

    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer).map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

fn is_uuid(segment: &str) -> bool {
    match segment.len() {
        36 => segment.chars().enumerate().all(|(i, c)| {
            if matches!(i, 8 | 13 | 18 | 23) {
                c == '-'
            } else {
                c.is_ascii_hexdigit()
            }
        }),
        32 => segment.chars().all(|c| c.is_ascii_hexdigit()),
        _ => false,
    }
}

fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| if is_uuid(segment) { "{id}" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

/// Records one request in the [`ApiMetrics`] request extension.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(request.uri().path()),
    };
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.record_request(
            &method,
            &path,
            response.status().as_u16(),
            start.elapsed().as_secs_f64(),
        );
    }
    response
}
