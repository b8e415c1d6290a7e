//! Stored value accessor: funding a stored-value balance through an
//! external provider (e.g. bitpay) and polling the result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "StoredValueService";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub redirection_url: Option<String>,
}

impl FundResponse {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

#[async_trait]
pub trait StoredValueAccessor: Send + Sync {
    async fn fund_stored_value(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        request: &Value,
    ) -> Result<FundResponse, AccessorError>;

    async fn check_fund_stored_value(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        fund_id: &str,
    ) -> Result<FundResponse, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpStoredValueAccessor {
    client: ServiceClient,
}

impl HttpStoredValueAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl StoredValueAccessor for HttpStoredValueAccessor {
    async fn fund_stored_value(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        request: &Value,
    ) -> Result<FundResponse, AccessorError> {
        self.client
            .post_json(ctx, &format!("{account_id}/funds"), &[], request, "FundStoredValue")
            .await
    }

    async fn check_fund_stored_value(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        fund_id: &str,
    ) -> Result<FundResponse, AccessorError> {
        self.client
            .get_json(
                ctx,
                &format!("{account_id}/funds/{fund_id}"),
                &[],
                "CheckFundStoredValue",
            )
            .await
    }
}
