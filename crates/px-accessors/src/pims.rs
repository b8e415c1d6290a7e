//! # PIMS Accessor
//!
//! Payment Instrument Management Service: the owner of PI records.
//!
//! ## Endpoints
//!
//! | Operation | Route |
//! |---|---|
//! | list | `GET  /v4.0/{accountId}/paymentInstruments?status=..&country=..` |
//! | get | `GET  /v4.0/{accountId}/paymentInstruments/{piid}` |
//! | extended view | `GET  /v4.0/paymentInstruments/{piid}/extendedView` |
//! | add | `POST /v4.0/{accountId}/paymentInstruments` |
//! | update | `POST /v4.0/{accountId}/paymentInstruments/{piid}/update` |
//! | resume | `POST /v4.0/{accountId}/paymentInstruments/{piid}/resume` |
//! | validate PICV | `POST /v4.0/{accountId}/paymentInstruments/{piid}/validatePicv` |
//! | validate CVV | `POST /v4.0/{accountId}/paymentInstruments/{piid}/validatecvv` |
//! | session | `GET  /v4.0/{sessionQueryUrl}` |

use async_trait::async_trait;
use px_core::PaymentInstrument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "PIMS";

/// Market parameters forwarded to PIMS. Lists only carry `country`.
#[derive(Debug, Clone, Default)]
pub struct PimsQuery {
    pub country: Option<String>,
    pub language: Option<String>,
    pub partner: Option<String>,
}

impl PimsQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("country", &self.country),
            ("language", &self.language),
            ("partner", &self.partner),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
        .collect()
    }
}

/// A PIMS payment session (3DS polling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PimsSession {
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piid: Option<String>,
}

/// Result of a CVV validation: PIMS answers 204 on success.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidateCvvOutcome {
    pub status: u16,
    pub body: Option<Value>,
}

#[async_trait]
pub trait PimsAccessor: Send + Sync {
    async fn list_payment_instruments(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        statuses: &[String],
        query: &PimsQuery,
    ) -> Result<Vec<PaymentInstrument>, AccessorError>;

    async fn get_payment_instrument(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
    ) -> Result<PaymentInstrument, AccessorError>;

    async fn get_extended_payment_instrument(
        &self,
        ctx: &AccessorContext,
        piid: &str,
    ) -> Result<PaymentInstrument, AccessorError>;

    async fn add_payment_instrument(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        query: &PimsQuery,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError>;

    async fn update_payment_instrument(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError>;

    async fn resume_pending_operation(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError>;

    async fn validate_picv(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError>;

    async fn validate_cvv(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<ValidateCvvOutcome, AccessorError>;

    async fn get_session(
        &self,
        ctx: &AccessorContext,
        session_query_url: &str,
    ) -> Result<PimsSession, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpPimsAccessor {
    client: ServiceClient,
}

impl HttpPimsAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

fn pi_path(account_id: &str, piid: &str, action: &str) -> String {
    format!("v4.0/{account_id}/paymentInstruments/{piid}/{action}")
}

#[async_trait]
impl PimsAccessor for HttpPimsAccessor {
    async fn list_payment_instruments(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        statuses: &[String],
        query: &PimsQuery,
    ) -> Result<Vec<PaymentInstrument>, AccessorError> {
        let mut pairs: Vec<(&str, String)> = statuses.iter().map(|s| ("status", s.clone())).collect();
        if let Some(country) = &query.country {
            pairs.push(("country", country.clone()));
        }
        self.client
            .get_json(
                ctx,
                &format!("v4.0/{account_id}/paymentInstruments"),
                &pairs,
                "ListPaymentInstruments",
            )
            .await
    }

    async fn get_payment_instrument(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
    ) -> Result<PaymentInstrument, AccessorError> {
        self.client
            .get_json(
                ctx,
                &format!("v4.0/{account_id}/paymentInstruments/{piid}"),
                &[],
                "GetPaymentInstrument",
            )
            .await
    }

    async fn get_extended_payment_instrument(
        &self,
        ctx: &AccessorContext,
        piid: &str,
    ) -> Result<PaymentInstrument, AccessorError> {
        self.client
            .get_json(
                ctx,
                &format!("v4.0/paymentInstruments/{piid}/extendedView"),
                &[],
                "GetExtendedPaymentInstrument",
            )
            .await
    }

    async fn add_payment_instrument(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        query: &PimsQuery,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError> {
        self.client
            .post_json(
                ctx,
                &format!("v4.0/{account_id}/paymentInstruments"),
                &query.pairs(),
                body,
                "PostPaymentInstrument",
            )
            .await
    }

    async fn update_payment_instrument(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError> {
        self.client
            .post_json(ctx, &pi_path(account_id, piid, "update"), &[], body, "UpdatePaymentInstrument")
            .await
    }

    async fn resume_pending_operation(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError> {
        self.client
            .post_json(ctx, &pi_path(account_id, piid, "resume"), &[], body, "ResumePendingOperation")
            .await
    }

    async fn validate_picv(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<PaymentInstrument, AccessorError> {
        self.client
            .post_json(ctx, &pi_path(account_id, piid, "validatePicv"), &[], body, "ValidatePicv")
            .await
    }

    async fn validate_cvv(
        &self,
        ctx: &AccessorContext,
        account_id: &str,
        piid: &str,
        body: &Value,
    ) -> Result<ValidateCvvOutcome, AccessorError> {
        let (status, body) = self
            .client
            .post_optional(ctx, &pi_path(account_id, piid, "validatecvv"), body, "ValidateCvv")
            .await?;
        Ok(ValidateCvvOutcome { status, body })
    }

    async fn get_session(
        &self,
        ctx: &AccessorContext,
        session_query_url: &str,
    ) -> Result<PimsSession, AccessorError> {
        let path = format!("v4.0/{}", session_query_url.trim_start_matches('/'));
        self.client.get_json(ctx, &path, &[], "GetSession").await
    }
}
