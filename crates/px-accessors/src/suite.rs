//! The full set of downstream accessors, shared across handlers.

use std::sync::Arc;

use crate::accounts::{AccountsAccessor, HttpAccountsAccessor};
use crate::catalog::{CatalogAccessor, HttpCatalogAccessor};
use crate::challenge_management::{ChallengeManagementAccessor, HttpChallengeManagementAccessor};
use crate::config::{AccessorConfig, ServiceEndpoints};
use crate::error::AccessorError;
use crate::fraud_detection::{FraudDetectionAccessor, HttpFraudDetectionAccessor};
use crate::issuer::{HttpIssuerAccessor, IssuerAccessor};
use crate::network_tokenization::{HttpNetworkTokenizationAccessor, NetworkTokenizationAccessor};
use crate::orchestration::{HttpOrchestrationAccessor, OrchestrationAccessor};
use crate::partner_settings::{HttpPartnerSettingsAccessor, PartnerSettingsAccessor};
use crate::pims::{HttpPimsAccessor, PimsAccessor};
use crate::purchase::{HttpPurchaseAccessor, PurchaseAccessor};
use crate::stored_value::{HttpStoredValueAccessor, StoredValueAccessor};
use crate::token_policy::{HttpTokenPolicyAccessor, TokenPolicyAccessor};

/// One optional accessor per downstream service. `None` means the service
/// URL was not configured.
#[derive(Clone, Default)]
pub struct AccessorSuite {
    pub pims: Option<Arc<dyn PimsAccessor>>,
    pub partner_settings: Option<Arc<dyn PartnerSettingsAccessor>>,
    pub accounts: Option<Arc<dyn AccountsAccessor>>,
    pub token_policy: Option<Arc<dyn TokenPolicyAccessor>>,
    pub catalog: Option<Arc<dyn CatalogAccessor>>,
    pub purchase: Option<Arc<dyn PurchaseAccessor>>,
    pub orchestration: Option<Arc<dyn OrchestrationAccessor>>,
    pub network_tokenization: Option<Arc<dyn NetworkTokenizationAccessor>>,
    pub challenge_management: Option<Arc<dyn ChallengeManagementAccessor>>,
    pub fraud_detection: Option<Arc<dyn FraudDetectionAccessor>>,
    pub issuer: Option<Arc<dyn IssuerAccessor>>,
    pub stored_value: Option<Arc<dyn StoredValueAccessor>>,
}

impl std::fmt::Debug for AccessorSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorSuite")
            .field("pims", &self.pims.is_some())
            .field("partner_settings", &self.partner_settings.is_some())
            .field("accounts", &self.accounts.is_some())
            .field("token_policy", &self.token_policy.is_some())
            .field("catalog", &self.catalog.is_some())
            .field("purchase", &self.purchase.is_some())
            .field("orchestration", &self.orchestration.is_some())
            .field("network_tokenization", &self.network_tokenization.is_some())
            .field("challenge_management", &self.challenge_management.is_some())
            .field("fraud_detection", &self.fraud_detection.is_some())
            .field("issuer", &self.issuer.is_some())
            .field("stored_value", &self.stored_value.is_some())
            .finish()
    }
}

fn build<T>(
    config: Option<AccessorConfig>,
    new: impl FnOnce(AccessorConfig) -> Result<T, AccessorError>,
) -> Result<Option<T>, AccessorError> {
    config.map(new).transpose()
}

impl AccessorSuite {
    /// Build HTTP accessors for every configured endpoint.
    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Result<Self, AccessorError> {
        let e = endpoints;
        Ok(Self {
            pims: build(e.config(&e.pims), HttpPimsAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn PimsAccessor>),
            partner_settings: build(e.config(&e.partner_settings), HttpPartnerSettingsAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn PartnerSettingsAccessor>),
            accounts: build(e.config(&e.accounts), HttpAccountsAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn AccountsAccessor>),
            token_policy: build(e.config(&e.token_policy), HttpTokenPolicyAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn TokenPolicyAccessor>),
            catalog: build(e.config(&e.catalog), HttpCatalogAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn CatalogAccessor>),
            purchase: build(e.config(&e.purchase), HttpPurchaseAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn PurchaseAccessor>),
            orchestration: build(e.config(&e.orchestration), HttpOrchestrationAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn OrchestrationAccessor>),
            network_tokenization: build(
                e.config(&e.network_tokenization),
                HttpNetworkTokenizationAccessor::new,
            )?
            .map(|a| Arc::new(a) as Arc<dyn NetworkTokenizationAccessor>),
            challenge_management: build(
                e.config(&e.challenge_management),
                HttpChallengeManagementAccessor::new,
            )?
            .map(|a| Arc::new(a) as Arc<dyn ChallengeManagementAccessor>),
            fraud_detection: build(e.config(&e.fraud_detection), HttpFraudDetectionAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn FraudDetectionAccessor>),
            issuer: build(e.config(&e.issuer), HttpIssuerAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn IssuerAccessor>),
            stored_value: build(e.config(&e.stored_value), HttpStoredValueAccessor::new)?
                .map(|a| Arc::new(a) as Arc<dyn StoredValueAccessor>),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_services_stay_empty() {
        let endpoints = ServiceEndpoints {
            pims: Some("http://127.0.0.1:7100/pims".into()),
            ..Default::default()
        };
        let suite = AccessorSuite::from_endpoints(&endpoints).unwrap();
        assert!(suite.pims.is_some());
        assert!(suite.issuer.is_none());
    }

    #[test]
    fn emulator_configures_everything() {
        let suite =
            AccessorSuite::from_endpoints(&ServiceEndpoints::from_emulator("http://127.0.0.1:7100"))
                .unwrap();
        assert!(suite.pims.is_some() && suite.stored_value.is_some() && suite.catalog.is_some());
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let endpoints = ServiceEndpoints {
            issuer: Some("::not-a-url".into()),
            ..Default::default()
        };
        assert!(matches!(
            AccessorSuite::from_endpoints(&endpoints),
            Err(AccessorError::Config(_))
        ));
    }
}
