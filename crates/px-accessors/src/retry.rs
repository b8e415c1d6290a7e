//! Backoff policy for idempotent downstream GETs.
//!
//! Only transport failures (connection refused, timeouts) are retried. A
//! downstream 4xx/5xx is an answer and goes straight back to the caller.

use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);

/// How often, and how patiently, a GET is re-sent. The delay doubles per
/// attempt starting at `base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// No retries: the request is sent once.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `send` until it yields a response or the retries run out.
    pub(crate) async fn send<F, Fut>(&self, service: &'static str, send: F) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempt = 0;
        loop {
            match send().await {
                Ok(resp) => return Ok(resp),
                Err(err) if attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        service,
                        attempt,
                        max_retries = self.max_retries,
                        error = %err,
                        "downstream GET failed, retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
