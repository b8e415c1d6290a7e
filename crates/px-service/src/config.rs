//! # Service Configuration
//!
//! Read from the environment at startup. Downstream URLs come either from a
//! single emulator base (`PX_EMULATOR_URL`, every service mounted under its
//! prefix) or one variable per service; a per-service variable overrides the
//! emulator-derived URL. Services with no URL stay unconfigured and the
//! handlers that need them answer 503.

use px_accessors::ServiceEndpoints;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 7000;
pub const DEFAULT_PIDL_BASE_URL: &str = "https://pidl.pay.example";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    /// Base of the URLs embedded in PIDL poll and submit actions.
    pub pidl_base_url: String,
    pub max_body_bytes: usize,
    pub endpoints: ServiceEndpoints,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            pidl_base_url: DEFAULT_PIDL_BASE_URL.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            endpoints: ServiceEndpoints::default(),
        }
    }
}

/// `(variable, field)` pairs for the per-service URL overrides.
const SERVICE_VARS: &[(&str, fn(&mut ServiceEndpoints) -> &mut Option<String>)] = &[
    ("PX_PIMS_URL", |e| &mut e.pims),
    ("PX_PARTNER_SETTINGS_URL", |e| &mut e.partner_settings),
    ("PX_ACCOUNTS_URL", |e| &mut e.accounts),
    ("PX_TOKEN_POLICY_URL", |e| &mut e.token_policy),
    ("PX_CATALOG_URL", |e| &mut e.catalog),
    ("PX_PURCHASE_URL", |e| &mut e.purchase),
    ("PX_ORCHESTRATION_URL", |e| &mut e.orchestration),
    ("PX_NETWORK_TOKENIZATION_URL", |e| &mut e.network_tokenization),
    ("PX_CHALLENGE_MANAGEMENT_URL", |e| &mut e.challenge_management),
    ("PX_FRAUD_DETECTION_URL", |e| &mut e.fraud_detection),
    ("PX_ISSUER_URL", |e| &mut e.issuer),
    ("PX_STORED_VALUE_URL", |e| &mut e.stored_value),
];

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut endpoints = match get("PX_EMULATOR_URL") {
            Some(base) => ServiceEndpoints::from_emulator(&base),
            None => ServiceEndpoints::default(),
        };
        for (var, field) in SERVICE_VARS {
            if let Some(url) = get(var) {
                *field(&mut endpoints) = Some(url);
            }
        }
        endpoints.timeout_secs = parse_number(&get, "PX_TIMEOUT_SECS")?;
        endpoints.max_retries = parse_number(&get, "PX_MAX_RETRIES")?;

        Ok(Self {
            port: parse_number(&get, "PX_PORT")?.unwrap_or(DEFAULT_PORT),
            pidl_base_url: get("PX_PIDL_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PIDL_BASE_URL.to_string()),
            max_body_bytes: parse_number(&get, "PX_MAX_BODY_BYTES")?
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            endpoints,
        })
    }

    /// Names of the downstream services with no URL.
    pub fn unconfigured_services(&self) -> Vec<&'static str> {
        let mut endpoints = self.endpoints.clone();
        SERVICE_VARS
            .iter()
            .filter(|(_, field)| field(&mut endpoints).is_none())
            .map(|(var, _)| *var)
            .collect()
    }
}

fn parse_number<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(var)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value })
        })
        .transpose()
}
