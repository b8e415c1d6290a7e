//! Accounts accessor: account profiles.
//!
//! Profiles use the snake_case Jarvis contract (`default_address_id`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "AccountsService";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub profile_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_address_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ProfileList {
    #[serde(default)]
    items: Vec<AccountProfile>,
}

#[async_trait]
pub trait AccountsAccessor: Send + Sync {
    /// First profile of `profile_type` (e.g. `consumer`), if any.
    async fn get_profile(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        profile_type: &str,
    ) -> Result<Option<AccountProfile>, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpAccountsAccessor {
    client: ServiceClient,
}

impl HttpAccountsAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl AccountsAccessor for HttpAccountsAccessor {
    async fn get_profile(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        profile_type: &str,
    ) -> Result<Option<AccountProfile>, AccessorError> {
        let list: ProfileList = self
            .client
            .get_json(
                ctx,
                &format!("{account_id}/profiles"),
                &[("type", profile_type.to_string())],
                "GetProfiles",
            )
            .await?;
        Ok(list
            .items
            .into_iter()
            .find(|p| p.profile_type.eq_ignore_ascii_case(profile_type)))
    }
}
