//! Orchestration accessor: PI replace and remove, which fan out to
//! subscriptions and pre-orders.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "PaymentOrchestratorService";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceRequest<'a> {
    target_payment_instrument_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_session_id: Option<&'a str>,
}

#[async_trait]
pub trait OrchestrationAccessor: Send + Sync {
    async fn replace_payment_instrument(
        &self,
        ctx: &AccessorContext,
        piid: &str,
        target_piid: &str,
        payment_session_id: Option<&str>,
    ) -> Result<Value, AccessorError>;

    /// `None` when the service answers without a body.
    async fn remove_payment_instrument(
        &self,
        ctx: &AccessorContext,
        piid: &str,
    ) -> Result<Option<Value>, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpOrchestrationAccessor {
    client: ServiceClient,
}

impl HttpOrchestrationAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl OrchestrationAccessor for HttpOrchestrationAccessor {
    async fn replace_payment_instrument(
        &self,
        ctx: &AccessorContext,
        piid: &str,
        target_piid: &str,
        payment_session_id: Option<&str>,
    ) -> Result<Value, AccessorError> {
        let body = ReplaceRequest {
            target_payment_instrument_id: target_piid,
            payment_session_id,
        };
        let (_, resp) = self
            .client
            .post_optional(
                ctx,
                &format!("paymentInstruments/{piid}/replace"),
                &body,
                "ReplacePaymentInstrument",
            )
            .await?;
        Ok(resp.unwrap_or(Value::Null))
    }

    async fn remove_payment_instrument(
        &self,
        ctx: &AccessorContext,
        piid: &str,
    ) -> Result<Option<Value>, AccessorError> {
        let (_, resp) = self
            .client
            .post_optional(
                ctx,
                &format!("paymentInstruments/{piid}/remove"),
                &json!({}),
                "RemovePaymentInstrument",
            )
            .await?;
        Ok(resp)
    }
}
