//! Issuer accessor: co-branded card applications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "IssuerService";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub card_product: String,
    pub channel: String,
    pub market: String,
    pub referrer_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[async_trait]
pub trait IssuerAccessor: Send + Sync {
    async fn apply(
        &self,
        ctx: &AccessorContext,
        puid: &str,
        request: &ApplyRequest,
    ) -> Result<ApplyResponse, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpIssuerAccessor {
    client: ServiceClient,
}

impl HttpIssuerAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl IssuerAccessor for HttpIssuerAccessor {
    async fn apply(
        &self,
        ctx: &AccessorContext,
        puid: &str,
        request: &ApplyRequest,
    ) -> Result<ApplyResponse, AccessorError> {
        self.client
            .post_json(ctx, &format!("applications/{puid}"), &[], request, "Apply")
            .await
    }
}
