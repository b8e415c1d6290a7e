//! Purchase accessor: redeems CSV tokens as orders.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "PurchaseService";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub token_value: String,
    pub market: String,
    pub language: String,
    pub client_context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub order_state: String,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl Order {
    pub fn is_purchased(&self) -> bool {
        self.order_state.eq_ignore_ascii_case("purchased")
    }
}

#[async_trait]
pub trait PurchaseAccessor: Send + Sync {
    async fn redeem_csv_token(
        &self,
        ctx: &AccessorContext,
        user_id: &str,
        request: &RedeemRequest,
    ) -> Result<Order, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpPurchaseAccessor {
    client: ServiceClient,
}

impl HttpPurchaseAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl PurchaseAccessor for HttpPurchaseAccessor {
    async fn redeem_csv_token(
        &self,
        ctx: &AccessorContext,
        user_id: &str,
        request: &RedeemRequest,
    ) -> Result<Order, AccessorError> {
        self.client
            .post_json(
                ctx,
                &format!("v7.0/users/{user_id}/orders"),
                &[],
                request,
                "RedeemCSVToken",
            )
            .await
    }
}
