//! PartnerSettings accessor: per-partner templates, redirection patterns
//! and feature toggles.

use async_trait::async_trait;
use px_core::partner::PaymentExperienceSettings;

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "PartnerSettingsService";

#[async_trait]
pub trait PartnerSettingsAccessor: Send + Sync {
    /// Settings keyed by operation. `operation` narrows the answer to one
    /// entry when the service supports it.
    async fn get_payment_experience_settings(
        &self,
        ctx: &AccessorContext,
        partner: &str,
        operation: Option<&str>,
    ) -> Result<PaymentExperienceSettings, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpPartnerSettingsAccessor {
    client: ServiceClient,
}

impl HttpPartnerSettingsAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl PartnerSettingsAccessor for HttpPartnerSettingsAccessor {
    async fn get_payment_experience_settings(
        &self,
        ctx: &AccessorContext,
        partner: &str,
        operation: Option<&str>,
    ) -> Result<PaymentExperienceSettings, AccessorError> {
        let mut query = vec![("settingsType", "PaymentExperience".to_string())];
        if let Some(op) = operation {
            query.push(("operation", op.to_string()));
        }
        self.client
            .get_json(
                ctx,
                &format!("partnersettings/{partner}"),
                &query,
                "GetPaymentExperienceSettings",
            )
            .await
    }
}
