//! Accessor configuration.
//!
//! One [`AccessorConfig`] per downstream service. [`ServiceEndpoints`]
//! collects the optional base URL of every service; a service without a
//! URL is left unconfigured and the handlers that need it answer 503.

use url::Url;

use crate::error::AccessorError;
use crate::retry::RetryPolicy;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one downstream HTTP accessor.
#[derive(Debug, Clone)]
pub struct AccessorConfig {
    /// Base URL of the service (e.g. `http://127.0.0.1:7100/pims`).
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Retries for GETs that fail in transport.
    pub retry: RetryPolicy,
}

impl AccessorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the base URL and strip any trailing slash.
    pub(crate) fn normalized_base_url(&self) -> Result<String, AccessorError> {
        Url::parse(&self.base_url)
            .map_err(|e| AccessorError::Config(format!("invalid base url {}: {e}", self.base_url)))?;
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}

/// Path prefixes the emulator server mounts each service under.
pub mod service_path {
    pub const PIMS: &str = "pims";
    pub const PARTNER_SETTINGS: &str = "partnersettings";
    pub const ACCOUNTS: &str = "accounts";
    pub const TOKEN_POLICY: &str = "tokenpolicy";
    pub const CATALOG: &str = "catalog";
    pub const PURCHASE: &str = "purchase";
    pub const ORCHESTRATION: &str = "orchestration";
    pub const NETWORK_TOKENIZATION: &str = "networktokenization";
    pub const SESSION: &str = "session";
    pub const CHALLENGE_MANAGEMENT: &str = "challengemanagement";
    pub const FRAUD_DETECTION: &str = "frauddetection";
    pub const ISSUER: &str = "issuer";
    pub const COMMERCE_ACCOUNT_DATA: &str = "commerceaccountdata";
    pub const STORED_VALUE: &str = "storedvalue";
}

/// Base URLs of every downstream service the payment experience service
/// calls.
#[derive(Debug, Clone, Default)]
pub struct ServiceEndpoints {
    pub pims: Option<String>,
    pub partner_settings: Option<String>,
    pub accounts: Option<String>,
    pub token_policy: Option<String>,
    pub catalog: Option<String>,
    pub purchase: Option<String>,
    pub orchestration: Option<String>,
    pub network_tokenization: Option<String>,
    pub challenge_management: Option<String>,
    pub fraud_detection: Option<String>,
    pub issuer: Option<String>,
    pub stored_value: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

impl ServiceEndpoints {
    /// Derive every service URL from a single emulator base URL
    /// (`{base}/{service}`).
    pub fn from_emulator(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let at = |path: &str| Some(format!("{base}/{path}"));
        Self {
            pims: at(service_path::PIMS),
            partner_settings: at(service_path::PARTNER_SETTINGS),
            accounts: at(service_path::ACCOUNTS),
            token_policy: at(service_path::TOKEN_POLICY),
            catalog: at(service_path::CATALOG),
            purchase: at(service_path::PURCHASE),
            orchestration: at(service_path::ORCHESTRATION),
            network_tokenization: at(service_path::NETWORK_TOKENIZATION),
            challenge_management: at(service_path::CHALLENGE_MANAGEMENT),
            fraud_detection: at(service_path::FRAUD_DETECTION),
            issuer: at(service_path::ISSUER),
            stored_value: at(service_path::STORED_VALUE),
            timeout_secs: None,
            max_retries: None,
        }
    }

    pub(crate) fn config(&self, url: &Option<String>) -> Option<AccessorConfig> {
        let retry = RetryPolicy {
            max_retries: self.max_retries.unwrap_or(crate::retry::DEFAULT_MAX_RETRIES),
            ..RetryPolicy::default()
        };
        url.as_ref().map(|u| AccessorConfig {
            base_url: u.clone(),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emulator_urls_use_service_prefixes() {
        let endpoints = ServiceEndpoints::from_emulator("http://127.0.0.1:7100/");
        assert_eq!(endpoints.pims.as_deref(), Some("http://127.0.0.1:7100/pims"));
        assert_eq!(
            endpoints.partner_settings.as_deref(),
            Some("http://127.0.0.1:7100/partnersettings")
        );
        let issuer = endpoints.config(&endpoints.issuer).unwrap();
        assert_eq!(issuer.timeout_secs, 30);
        assert_eq!(issuer.retry, RetryPolicy::default());
    }

    #[test]
    fn max_retries_reaches_every_accessor() {
        let endpoints = ServiceEndpoints {
            max_retries: Some(0),
            ..ServiceEndpoints::from_emulator("http://127.0.0.1:7100")
        };
        assert_eq!(endpoints.config(&endpoints.pims).unwrap().retry.max_retries, 0);
    }

    #[test]
    fn rejects_invalid_base_url() {
        let cfg = AccessorConfig::new("not a url");
        assert!(matches!(cfg.normalized_base_url(), Err(AccessorError::Config(_))));
        let cfg = AccessorConfig::new("http://localhost:1/pims/");
        assert_eq!(cfg.normalized_base_url().unwrap(), "http://localhost:1/pims");
    }
}
