//! TokenPolicy accessor: describes a CSV token and whether it can be
//! redeemed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "TokenPolicyService";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptionRequest {
    pub token_value: String,
    pub market: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyEvaluation {
    #[serde(default)]
    pub is_redeemable: bool,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAsset {
    pub value: f64,
    pub currency: String,
}

/// A product the token can be redeemed against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProduct {
    pub product_id: String,
    #[serde(default)]
    pub sku_id: String,
    #[serde(default)]
    pub availability_id: Option<String>,
    #[serde(default)]
    pub category: String,
}

impl TokenProduct {
    /// Catalog big id `product/sku/availability`.
    pub fn big_id(&self) -> Option<String> {
        self.availability_id
            .as_ref()
            .filter(|a| !a.is_empty())
            .map(|a| format!("{}/{}/{}", self.product_id, self.sku_id, a))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescription {
    #[serde(default)]
    pub token_value: String,
    #[serde(default)]
    pub token_state: Option<String>,
    #[serde(default)]
    pub policy_evaluation: PolicyEvaluation,
    #[serde(default)]
    pub asset: Option<TokenAsset>,
    #[serde(default)]
    pub products: Vec<TokenProduct>,
}

#[async_trait]
pub trait TokenPolicyAccessor: Send + Sync {
    async fn get_token_description(
        &self,
        ctx: &AccessorContext,
        user_id: &str,
        request: &TokenDescriptionRequest,
    ) -> Result<TokenDescription, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpTokenPolicyAccessor {
    client: ServiceClient,
}

impl HttpTokenPolicyAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl TokenPolicyAccessor for HttpTokenPolicyAccessor {
    async fn get_token_description(
        &self,
        ctx: &AccessorContext,
        user_id: &str,
        request: &TokenDescriptionRequest,
    ) -> Result<TokenDescription, AccessorError> {
        self.client
            .post_json(
                ctx,
                &format!("users/{user_id}/tokenDescriptionRequests"),
                &[],
                request,
                "GetTokenDescription",
            )
            .await
    }
}
