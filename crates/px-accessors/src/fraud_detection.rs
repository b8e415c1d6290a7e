//! Fraud detection accessor: bot check on add-PI requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "FraudDetectionService";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotCheckResult {
    #[serde(default)]
    pub recommendation: String,
}

impl BotCheckResult {
    pub fn is_approved(&self) -> bool {
        !self.recommendation.eq_ignore_ascii_case("rejected")
    }
}

#[async_trait]
pub trait FraudDetectionAccessor: Send + Sync {
    async fn bot_check(
        &self,
        ctx: &AccessorContext,
        request: &Value,
    ) -> Result<BotCheckResult, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpFraudDetectionAccessor {
    client: ServiceClient,
}

impl HttpFraudDetectionAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl FraudDetectionAccessor for HttpFraudDetectionAccessor {
    async fn bot_check(
        &self,
        ctx: &AccessorContext,
        request: &Value,
    ) -> Result<BotCheckResult, AccessorError> {
        self.client
            .post_json(ctx, "api/v1/botcheck", &[], request, "BotCheck")
            .await
    }
}
