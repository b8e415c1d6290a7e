//! Network tokenization accessor: the network tokens (and their card art)
//! held for a user's device. PIs reference tokens by id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "NetworkTokenizationService";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkToken {
    pub id: String,
    #[serde(default)]
    pub card_metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TokenList {
    #[serde(default)]
    tokens: Vec<NetworkToken>,
}

#[async_trait]
pub trait NetworkTokenizationAccessor: Send + Sync {
    async fn list_network_tokens(
        &self,
        ctx: &AccessorContext,
        puid: Option<&str>,
        device_id: &str,
    ) -> Result<Vec<NetworkToken>, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpNetworkTokenizationAccessor {
    client: ServiceClient,
}

impl HttpNetworkTokenizationAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl NetworkTokenizationAccessor for HttpNetworkTokenizationAccessor {
    async fn list_network_tokens(
        &self,
        ctx: &AccessorContext,
        puid: Option<&str>,
        device_id: &str,
    ) -> Result<Vec<NetworkToken>, AccessorError> {
        let mut query = vec![("deviceId", device_id.to_string())];
        if let Some(puid) = puid {
            query.push(("puid", puid.to_string()));
        }
        let list: TokenList = self
            .client
            .get_json(ctx, "tokens", &query, "ListNetworkTokens")
            .await?;
        Ok(list.tokens)
    }
}
