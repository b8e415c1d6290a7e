//! # Payment Instrument Action Routes
//!
//! Actions on one existing PI:
//!
//! - `POST .../:piid/replace` — move subscriptions to another (or a new) card.
//! - `POST .../:piid/remove` — remove through orchestration.
//! - `POST .../:piid/resume` — finish a pending add (SMS code, PICV amount).
//! - `POST .../:piid/validateCvv` — check a CVV against the card.
//! - `GET  .../:piid/getChallengeContext` — inputs for a client-side challenge.
//! - `POST|GET .../:piid/redeem` — fund stored value through BitPay and poll it.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use px_core::partner::is_xbox_native_partner;
use px_core::payment_method::FAMILY_CREDIT_CARD;
use px_core::{
    ClientAction, ErrorCode, PaymentInstrument, PaymentMethodKind, ServiceErrorResponse,
};
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::instruments::INVALID_PI_DATA;
use super::{action_context, body_str, fetch_pi, pidl_links, pims_query, service_failure};
use crate::client_actions::{add_client_action, RequestType};
use crate::error::{AppError, SERVICE_NAME};
use crate::error_mapping::{map_credit_card_common, map_generic, map_resume_error, map_update_error};
use crate::extractors::{optional_json_body, PiQuery, RequestContext};
use crate::pidl_factory;
use crate::risk_data;
use crate::state::AppState;

pub const SCENARIO_HAS_SUBS_OR_PRE_ORDERS: &str = "hasSubsOrPreOrders";
pub const BITPAY_PIID: &str = "bitpay";
const CHALLENGE_3DS2: &str = "3ds2";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Replace stopped because the target card needs a PSD2 challenge first.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceChallengeRequired {
    pub piid: String,
    pub challenge_required: bool,
    #[schema(value_type = Option<Object>)]
    pub pi: Option<PaymentInstrument>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeContext {
    pub payment_method_type: String,
    pub ip_address: Option<String>,
}

/// Funding state of a BitPay top-up.
#[derive(Debug, Serialize, ToSchema)]
pub struct FundStatus {
    /// `completed` or `poll`.
    pub status: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid/replace",
            post(replace_payment_instrument),
        )
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid/remove",
            post(remove_payment_instrument),
        )
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid/resume",
            post(resume_pending_operation),
        )
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid/validateCvv",
            post(validate_cvv),
        )
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid/getChallengeContext",
            get(get_challenge_context),
        )
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid/redeem",
            post(fund_stored_value).get(check_fund_stored_value),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v7.0/:account_id/paymentInstrumentsEx/:piid/replace — Replace a PI.
///
/// The target is `targetPaymentInstrumentId` from the body (or query);
/// without one a new credit card is added from the body and becomes the
/// target.
#[utoipa::path(
    post,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/replace",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "PI being replaced"),
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Replaced, or a challenge is required", body = ReplaceChallengeRequired),
        (status = 400, description = "Invalid request or unsupported PI type"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn replace_payment_instrument(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    query: PiQuery,
    body: Bytes,
) -> Result<Response, AppError> {
    let Some(mut body) = optional_json_body(&body)? else {
        return Err(AppError::invalid_request(INVALID_PI_DATA));
    };
    let ctx = rc.accessor_context();
    let payment_session_id = body_str(&body, "paymentSessionId")
        .map(str::to_string)
        .or_else(|| query.payment_session_id.clone());

    let mut new_pi = None;
    let target = match body_str(&body, "targetPaymentInstrumentId")
        .map(str::to_string)
        .or_else(|| query.target_payment_instrument_id.clone())
    {
        Some(target) => target,
        None => {
            let family = body_str(&body, "paymentMethodFamily")
                .ok_or_else(|| AppError::invalid_request("paymentMethodFamily is missing"))?;
            if !family.eq_ignore_ascii_case(FAMILY_CREDIT_CARD) {
                return Err(AppError::invalid_request(
                    "Replace operation not supported for the given PI type",
                ));
            }
            let kind = PaymentMethodKind::classify(family, body_str(&body, "paymentMethodType").unwrap_or_default());

            risk_data::attach(&mut body, &rc.device_info, &query.partner, &rc.flights);
            let mut added = match state
                .pims()?
                .add_payment_instrument(&ctx, &account_id, &pims_query(&query), &body)
                .await
            {
                Ok(pi) => pi,
                Err(err) => {
                    let (status, error) = service_failure(err)?;
                    return Err(map_update_error(status, error, kind));
                }
            };
            let links = pidl_links(&state, &query, &account_id);
            add_client_action(&mut added, &action_context(links, &query, None, RequestType::AddPi))?;
            if added.client_action.is_some() {
                // The new card needs the user first; replace once it is active.
                return Ok(Json(added).into_response());
            }
            let target = added.id.clone();
            new_pi = Some(added);
            target
        }
    };

    if target == piid {
        return Ok(replaced_response(new_pi, None));
    }

    if query.has_scenario(SCENARIO_HAS_SUBS_OR_PRE_ORDERS) && payment_session_id.is_none() {
        let extended = state.pims()?.get_extended_payment_instrument(&ctx, &target).await?;
        if extended.requires_challenge(CHALLENGE_3DS2) {
            tracing::info!(piid = %piid, target = %target, "replace needs a 3DS2 challenge");
            return Ok(Json(ReplaceChallengeRequired {
                piid: target,
                challenge_required: true,
                pi: new_pi,
            })
            .into_response());
        }
    }

    let replaced = match state
        .orchestration()?
        .replace_payment_instrument(&ctx, &piid, &target, payment_session_id.as_deref())
        .await
    {
        Ok(replaced) => replaced,
        Err(err) => {
            let (status, error) = service_failure(err)?;
            return Err(map_generic(status, error));
        }
    };
    tracing::info!(piid = %piid, target = %target, "payment instrument replaced");
    Ok(replaced_response(new_pi, Some(replaced)))
}

fn replaced_response(new_pi: Option<PaymentInstrument>, replaced: Option<Value>) -> Response {
    match (new_pi, replaced) {
        (Some(pi), _) => Json(pi).into_response(),
        (None, Some(replaced)) if !replaced.is_null() => Json(replaced).into_response(),
        _ => StatusCode::OK.into_response(),
    }
}

/// POST /v7.0/:account_id/paymentInstrumentsEx/:piid/remove — Remove a PI.
#[utoipa::path(
    post,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/remove",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "Payment instrument id"),
    ),
    responses(
        (status = 204, description = "Removed"),
        (status = 200, description = "Removed with a body, or the subscription message PIDL", body = Object),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn remove_payment_instrument(
    State(state): State<AppState>,
    Path((_account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    query: PiQuery,
) -> Result<Response, AppError> {
    match state
        .orchestration()?
        .remove_payment_instrument(&rc.accessor_context(), &piid)
        .await
    {
        Ok(Some(body)) => Ok(Json(body).into_response()),
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(err) => {
            let (status, error) = service_failure(err)?;
            if is_xbox_native_partner(&query.partner) && error.is("SubscriptionNotCanceled") {
                let pidl = pidl_factory::subscription_message();
                let resource = pidl_factory::client_action_resource(ClientAction::pidl(vec![pidl]));
                return Ok(Json(resource).into_response());
            }
            Err(map_generic(status, error))
        }
    }
}

/// POST /v7.0/:account_id/paymentInstrumentsEx/:piid/resume — Resume a
/// pending add.
#[utoipa::path(
    post,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/resume",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "Payment instrument id"),
    ),
    request_body = Object,
    responses(
        (status = 200, description = "The updated PI", body = Object),
        (status = 400, description = "Mapped PIMS error"),
        (status = 500, description = "PI state has no client action for a resume"),
        (status = 404, description = "Unknown account/PI pair"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn resume_pending_operation(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    query: PiQuery,
    body: Bytes,
) -> Result<Json<PaymentInstrument>, AppError> {
    let mut body = optional_json_body(&body)?.unwrap_or_else(|| json!({}));
    let pi = fetch_pi(&state, &rc, &account_id, &piid).await?;
    let kind = pi.kind();

    risk_data::attach(&mut body, &rc.device_info, &query.partner, &rc.flights);

    let ctx = rc.accessor_context();
    let pims = state.pims()?;
    let result = if kind == PaymentMethodKind::Sepa {
        pims.validate_picv(&ctx, &account_id, &piid, &body).await
    } else {
        pims.resume_pending_operation(&ctx, &account_id, &piid, &body).await
    };
    let links = pidl_links(&state, &query, &account_id);

    match result {
        Ok(mut updated) => {
            let request_type = if kind == PaymentMethodKind::Sepa {
                RequestType::AddPi
            } else {
                RequestType::Resume
            };
            add_client_action(&mut updated, &action_context(links, &query, None, request_type))?;
            Ok(Json(updated))
        }
        Err(err) => {
            let (status, error) = service_failure(err)?;
            tracing::info!(status, code = %error.error_code, piid = %piid, "PIMS rejected resume");
            let wrong_amount = kind.is_direct_debit() && error.is("InvalidAmount");
            let mut mapped = map_resume_error(error, kind);
            if wrong_amount {
                let refreshed = fetch_pi(&state, &rc, &account_id, &piid).await?;
                let scheme = if kind == PaymentMethodKind::Sepa { "sepa" } else { "ach" };
                let remaining = refreshed
                    .details
                    .picv_details
                    .as_ref()
                    .and_then(|d| d.remaining_attempts);
                let pidl = pidl_factory::picv_challenge(&links, scheme, &refreshed, remaining);
                mapped.client_action = Some(ClientAction::pidl(vec![pidl]));
            }
            Err(AppError::with_status(status, mapped))
        }
    }
}

/// POST /v7.0/:account_id/paymentInstrumentsEx/:piid/validateCvv — Check a CVV.
#[utoipa::path(
    post,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/validateCvv",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "Payment instrument id"),
    ),
    request_body = Object,
    responses(
        (status = 204, description = "CVV is valid"),
        (status = 400, description = "Invalid CVV, or PIMS returned content"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn validate_cvv(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let Some(body) = optional_json_body(&body)? else {
        return Err(AppError::invalid_request(INVALID_PI_DATA));
    };
    match state
        .pims()?
        .validate_cvv(&rc.accessor_context(), &account_id, &piid, &body)
        .await
    {
        Ok(outcome) if outcome.status == StatusCode::NO_CONTENT.as_u16() || outcome.body.is_none() => {
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(outcome) => {
            tracing::warn!(status = outcome.status, piid = %piid, "validate CVV returned content");
            Err(AppError::validation(
                ErrorCode::ValidateCvvReturnedContent,
                format!("PIMS validate CVV answered {} with content", outcome.status),
            ))
        }
        Err(err) => {
            let (status, error) = service_failure(err)?;
            Err(AppError::with_status(status, map_credit_card_common(error)))
        }
    }
}

/// GET /v7.0/:account_id/paymentInstrumentsEx/:piid/getChallengeContext
#[utoipa::path(
    get,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/getChallengeContext",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "Payment instrument id"),
    ),
    responses(
        (status = 200, description = "Challenge inputs", body = ChallengeContext),
        (status = 404, description = "Unknown account/PI pair"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn get_challenge_context(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
) -> Result<Json<ChallengeContext>, AppError> {
    let pi = fetch_pi(&state, &rc, &account_id, &piid).await?;
    Ok(Json(ChallengeContext {
        payment_method_type: pi.method_type().to_string(),
        ip_address: rc.device_info.ip_address().map(str::to_string),
    }))
}

/// POST /v7.0/:account_id/paymentInstrumentsEx/:piid/redeem — Start a
/// BitPay stored-value top-up. Other PIs answer `null`.
#[utoipa::path(
    post,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/redeem",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "`bitpay`"),
    ),
    request_body = Object,
    responses((status = 200, description = "Resource with a redirect PIDL client action", body = Object)),
    tag = "paymentInstrumentsEx"
)]
async fn fund_stored_value(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    query: PiQuery,
    body: Bytes,
) -> Result<Response, AppError> {
    if !piid.eq_ignore_ascii_case(BITPAY_PIID) {
        return Ok(Json(Value::Null).into_response());
    }
    let body = optional_json_body(&body)?.unwrap_or_else(|| json!({}));
    let request = json!({
        "amount": body.get("amount").cloned().unwrap_or(Value::Null),
        "currency": body.get("currency").cloned().unwrap_or(Value::Null),
        "country": query.country(),
        "paymentInstrumentId": BITPAY_PIID,
        "greenId": body.pointer("/riskData/greenId").cloned().unwrap_or(Value::Null),
        "ipAddress": rc.device_info.ip_address(),
    });
    let fund = state
        .stored_value()?
        .fund_stored_value(&rc.accessor_context(), &account_id, &request)
        .await?;
    let Some(url) = fund.redirection_url.as_deref().filter(|u| !u.is_empty()) else {
        return Err(AppError::downstream(
            StatusCode::INTERNAL_SERVER_ERROR,
            ServiceErrorResponse::from_code(
                ErrorCode::ServiceError,
                format!("fund {} has no redirection URL", fund.id),
            )
            .with_source(SERVICE_NAME),
        ));
    };
    tracing::info!(fund_id = %fund.id, "stored value funding started");
    let pidl = pidl_factory::fund_redirect(url);
    Ok(Json(pidl_factory::client_action_resource(ClientAction::pidl(vec![pidl]))).into_response())
}

/// GET /v7.0/:account_id/paymentInstrumentsEx/:piid/redeem — Poll the
/// top-up named by `referenceId`.
#[utoipa::path(
    get,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/redeem",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "`bitpay`"),
        ("referenceId" = String, Query, description = "Fund id returned by the POST"),
    ),
    responses((status = 200, description = "Funding state", body = FundStatus)),
    tag = "paymentInstrumentsEx"
)]
async fn check_fund_stored_value(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    query: PiQuery,
) -> Result<Response, AppError> {
    if !piid.eq_ignore_ascii_case(BITPAY_PIID) {
        return Ok(Json(Value::Null).into_response());
    }
    let reference_id = query
        .reference_id
        .as_deref()
        .ok_or_else(|| AppError::invalid_request("referenceId is missing"))?;
    let fund = state
        .stored_value()?
        .check_fund_stored_value(&rc.accessor_context(), &account_id, reference_id)
        .await?;
    let status = if fund.is_completed() { "completed" } else { "poll" };
    Ok(Json(FundStatus { status: status.to_string() }).into_response())
}
