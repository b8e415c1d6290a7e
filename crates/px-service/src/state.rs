//! # Application State
//!
//! Shared state for the Axum application: configuration and the downstream
//! accessor suite. Cheap to clone; every clone shares the same accessors.

use std::sync::Arc;

use px_accessors::accounts::AccountsAccessor;
use px_accessors::catalog::CatalogAccessor;
use px_accessors::challenge_management::ChallengeManagementAccessor;
use px_accessors::fraud_detection::FraudDetectionAccessor;
use px_accessors::issuer::IssuerAccessor;
use px_accessors::network_tokenization::NetworkTokenizationAccessor;
use px_accessors::orchestration::OrchestrationAccessor;
use px_accessors::partner_settings::PartnerSettingsAccessor;
use px_accessors::pims::PimsAccessor;
use px_accessors::purchase::PurchaseAccessor;
use px_accessors::stored_value::StoredValueAccessor;
use px_accessors::token_policy::TokenPolicyAccessor;
use px_accessors::{AccessorError, AccessorSuite};

use crate::config::ServiceConfig;
use crate::error::AppError;

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub accessors: AccessorSuite,
}

fn require<'a, T: ?Sized>(slot: &'a Option<Arc<T>>, service: &str) -> Result<&'a T, AppError> {
    slot.as_deref()
        .ok_or_else(|| AppError::ServiceUnavailable(format!("{service} accessor not configured")))
}

impl AppState {
    /// Build HTTP accessors for every configured endpoint.
    pub fn new(config: ServiceConfig) -> Result<Self, AccessorError> {
        let accessors = AccessorSuite::from_endpoints(&config.endpoints)?;
        Ok(Self::with_accessors(config, accessors))
    }

    pub fn with_accessors(config: ServiceConfig, accessors: AccessorSuite) -> Self {
        Self {
            config: Arc::new(config),
            accessors,
        }
    }

    /// Ready once PIMS and partner settings are reachable by configuration.
    pub fn is_ready(&self) -> bool {
        self.accessors.pims.is_some() && self.accessors.partner_settings.is_some()
    }

    pub fn pims(&self) -> Result<&dyn PimsAccessor, AppError> {
        require(&self.accessors.pims, "PIMS")
    }

    pub fn partner_settings(&self) -> Result<&dyn PartnerSettingsAccessor, AppError> {
        require(&self.accessors.partner_settings, "PartnerSettings")
    }

    pub fn accounts(&self) -> Result<&dyn AccountsAccessor, AppError> {
        require(&self.accessors.accounts, "Accounts")
    }

    pub fn token_policy(&self) -> Result<&dyn TokenPolicyAccessor, AppError> {
        require(&self.accessors.token_policy, "TokenPolicy")
    }

    pub fn catalog(&self) -> Result<&dyn CatalogAccessor, AppError> {
        require(&self.accessors.catalog, "Catalog")
    }

    pub fn purchase(&self) -> Result<&dyn PurchaseAccessor, AppError> {
        require(&self.accessors.purchase, "Purchase")
    }

    pub fn orchestration(&self) -> Result<&dyn OrchestrationAccessor, AppError> {
        require(&self.accessors.orchestration, "Orchestration")
    }

    pub fn network_tokenization(&self) -> Result<&dyn NetworkTokenizationAccessor, AppError> {
        require(&self.accessors.network_tokenization, "NetworkTokenization")
    }

    pub fn challenge_management(&self) -> Result<&dyn ChallengeManagementAccessor, AppError> {
        require(&self.accessors.challenge_management, "ChallengeManagement")
    }

    pub fn fraud_detection(&self) -> Result<&dyn FraudDetectionAccessor, AppError> {
        require(&self.accessors.fraud_detection, "FraudDetection")
    }

    pub fn issuer(&self) -> Result<&dyn IssuerAccessor, AppError> {
        require(&self.accessors.issuer, "Issuer")
    }

    pub fn stored_value(&self) -> Result<&dyn StoredValueAccessor, AppError> {
        require(&self.accessors.stored_value, "StoredValue")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn default_state_is_not_ready() {
        let state = AppState::default();
        assert!(!state.is_ready());
        let err = state.pims().err().unwrap();
        assert_eq!(err.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn emulator_config_builds_every_accessor() {
        let config = ServiceConfig {
            endpoints: px_accessors::ServiceEndpoints::from_emulator("http://127.0.0.1:1"),
            ..Default::default()
        };
        let state = AppState::new(config).unwrap();
        assert!(state.is_ready());
        assert!(state.stored_value().is_ok());
        assert!(state.issuer().is_ok());
    }
}
