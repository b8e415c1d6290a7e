//! # Payment Instrument Routes
//!
//! | Method | Path                                              | Handler |
//! |--------|---------------------------------------------------|---------|
//! | GET    | `/v7.0/:account_id/paymentInstrumentsEx`          | list    |
//! | POST   | `/v7.0/:account_id/paymentInstrumentsEx`          | add     |
//! | GET    | `/v7.0/:account_id/paymentInstrumentsEx/:piid`    | get     |
//! | POST   | `/v7.0/:account_id/paymentInstrumentsEx/:piid/update` | update |
//!
//! Every PI returned carries the client action for its state (see
//! [`crate::client_actions`]).

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use px_accessors::network_tokenization::NetworkToken;
use px_accessors::pims::PimsQuery;
use px_core::messages::{self, credit_card};
use px_core::partner::{FEATURE_ADD_NEW_PAYMENT_METHOD, FEATURE_REDEEM_GIFT_CARD};
use px_core::payment_instrument::PaymentMethodDisplay;
use px_core::payment_method::{type_optional_for_family, FAMILY_ADD_NEW_PAYMENT_METHOD};
use px_core::{
    flights, ClientAction, ErrorCode, PaymentInstrument, PaymentInstrumentStatus, PaymentMethod,
    PaymentMethodKind, PidlResource, ServiceErrorResponse,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::{action_context, body_str, fetch_pi, partner_setting, pidl_links, pims_query, service_failure};
use crate::client_actions::{add_client_action, RequestType};
use crate::csv_token;
use crate::error::{AppError, SERVICE_NAME};
use crate::error_mapping::{map_add_error, map_update_error, AddErrorContext, AddPiFailure};
use crate::extractors::{optional_json_body, PiQuery, RequestContext, DEFAULT_PARTNER};
use crate::pidl_factory::{self, PidlLinks};
use crate::risk_data;
use crate::state::AppState;

pub const OPERATION_SELECT_INSTANCE: &str = "selectinstance";
pub const OPERATION_ADD: &str = "add";
pub const SCENARIO_THREEDS_ONE_POLLING: &str = "threedsonepolling";

pub const INVALID_PI_DATA: &str = "The input PI data is invalid.";
const ADD_NEW_PAYMENT_METHOD_LINK: &str = "newPaymentMethodLink";
const CHALLENGE_SESSION_FIELD: &str = "pxChallengeSessionId";
const PX_CHALLENGE_TYPE: &str = "PXChallenge";
const CONSUMER_PROFILE: &str = "consumer";
const PIMS_SOURCE: &str = "PIMS";
const DEFAULT_DEVICE_ID: &str = "0";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Identity of the select-instance PIDL returned with the list.
#[derive(Debug, Serialize, ToSchema)]
pub struct PidlIdentity {
    pub partner: String,
    pub language: String,
    pub country: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PidlInfo {
    #[schema(value_type = Vec<Object>)]
    pub select_instance: Vec<PidlResource>,
    pub identity: PidlIdentity,
}

/// The PI list together with the PIDL that renders it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrumentsWithPidl {
    #[schema(value_type = Vec<Object>)]
    pub payment_instruments: Vec<PaymentInstrument>,
    pub pidl_info: PidlInfo,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx",
            get(list_payment_instruments).post(add_payment_instrument),
        )
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid",
            get(get_payment_instrument),
        )
        .route(
            "/v7.0/:account_id/paymentInstrumentsEx/:piid/update",
            post(update_payment_instrument),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v7.0/:account_id/paymentInstrumentsEx — List the account's PIs.
#[utoipa::path(
    get,
    path = "/v7.0/{account_id}/paymentInstrumentsEx",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("status" = Option<Vec<String>>, Query, description = "PI statuses to include, default active"),
        ("includePidl" = Option<bool>, Query, description = "Return the select-instance PIDL with the list"),
    ),
    responses(
        (status = 200, description = "Payment instruments", body = PaymentInstrumentsWithPidl),
        (status = 503, description = "PIMS not configured"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn list_payment_instruments(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    mut rc: RequestContext,
    query: PiQuery,
) -> Result<Response, AppError> {
    let operation = query.operation.as_deref().unwrap_or(OPERATION_SELECT_INSTANCE);
    let setting = partner_setting(&state, &rc, &query.partner, operation).await;
    if let Some(setting) = &setting {
        setting.apply_flights(&mut rc.flights);
    }

    let statuses = if query.status.is_empty() {
        vec![PaymentInstrumentStatus::Active.as_str().to_string()]
    } else {
        query.status.clone()
    };
    let mut pis = state
        .pims()?
        .list_payment_instruments(&rc.accessor_context(), &account_id, &statuses, &list_query(&query))
        .await?;
    tracing::debug!(account_id = %account_id, count = pis.len(), "listed payment instruments");

    let links = pidl_links(&state, &query, &account_id);
    let actions = action_context(links, &query, setting.as_ref(), RequestType::GetPi);
    for pi in &mut pis {
        add_client_action(pi, &actions)?;
    }

    if rc.flight(flights::LIST_MODERN_PIS_WITH_CARD_ART) {
        let device_id = query.device_id.as_deref().unwrap_or(DEFAULT_DEVICE_ID);
        attach_card_art(&state, &rc, device_id, &mut pis).await;
    }

    if query.include_pidl && rc.flight(flights::INCLUDE_PIDL_WITH_PI_LIST) {
        let select = pidl_factory::select_instance(&pis, &query.partner, &query.language, query.country());
        let body = PaymentInstrumentsWithPidl {
            payment_instruments: pis,
            pidl_info: PidlInfo {
                select_instance: vec![select],
                identity: PidlIdentity {
                    partner: query.partner.clone(),
                    language: query.language.clone(),
                    country: query.country().to_string(),
                },
            },
        };
        return Ok(Json(body).into_response());
    }

    let add_new_option = setting
        .as_ref()
        .map(|s| s.is_feature_enabled(FEATURE_ADD_NEW_PAYMENT_METHOD, query.country()))
        .unwrap_or(false);
    if add_new_option {
        pis.push(add_new_payment_method_link());
    }
    Ok(Json(pis).into_response())
}

/// GET /v7.0/:account_id/paymentInstrumentsEx/:piid — Read one PI.
///
/// With `sessionQueryUrl` the PIMS 3DS session is read first. Under the
/// `threedsonepolling` scenario the session state overrides the PI status;
/// otherwise a failed or expired session is an error.
#[utoipa::path(
    get,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "Payment instrument id"),
        ("sessionQueryUrl" = Option<String>, Query, description = "PIMS session to poll"),
    ),
    responses(
        (status = 200, description = "The payment instrument", body = Object),
        (status = 400, description = "Session failed or expired"),
        (status = 404, description = "Unknown account/PI pair"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn get_payment_instrument(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    query: PiQuery,
) -> Result<Json<PaymentInstrument>, AppError> {
    let polling = query.has_scenario(SCENARIO_THREEDS_ONE_POLLING);
    let mut piid = piid;
    let mut polled_status = None;

    if let Some(session_query_url) = query.session_query_url.as_deref() {
        let session = state
            .pims()?
            .get_session(&rc.accessor_context(), session_query_url)
            .await?;
        tracing::debug!(session_id = %session.id, status = %session.status, polling, "read PIMS session");
        match session.status.to_ascii_lowercase().as_str() {
            "success" => {
                if let Some(session_piid) = session.piid.filter(|id| !id.is_empty()) {
                    piid = session_piid;
                }
            }
            "inprogress" | "created" if polling => polled_status = Some(PaymentInstrumentStatus::Pending),
            "failed" | "expired" if polling => polled_status = Some(PaymentInstrumentStatus::Declined),
            "failed" => {
                return Err(AppError::validation(
                    ErrorCode::PimsSessionFailed,
                    format!("PIMS session {} failed", session.id),
                ))
            }
            "expired" => {
                return Err(AppError::validation(
                    ErrorCode::PimsSessionExpired,
                    format!("PIMS session {} expired", session.id),
                ))
            }
            _ => {}
        }
    }

    let mut pi = fetch_pi(&state, &rc, &account_id, &piid).await?;
    if polling {
        if let Some(status) = polled_status {
            pi.status = status;
        }
        return Ok(Json(pi));
    }

    let links = pidl_links(&state, &query, &account_id);
    add_client_action(&mut pi, &action_context(links, &query, None, RequestType::GetPi))?;
    Ok(Json(pi))
}

/// POST /v7.0/:account_id/paymentInstrumentsEx — Add a PI.
#[utoipa::path(
    post,
    path = "/v7.0/{account_id}/paymentInstrumentsEx",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("completePrerequisites" = Option<bool>, Query, description = "Collect a billing address when the profile has none"),
    ),
    request_body = Object,
    responses(
        (status = 200, description = "The new PI, or a resource carrying a client action", body = Object),
        (status = 400, description = "Invalid request or mapped PIMS error"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn add_payment_instrument(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    mut rc: RequestContext,
    query: PiQuery,
    body: Bytes,
) -> Result<Response, AppError> {
    let Some(mut body) = optional_json_body(&body)? else {
        return Err(AppError::invalid_request(INVALID_PI_DATA));
    };
    let family = body_str(&body, "paymentMethodFamily")
        .map(str::to_string)
        .ok_or_else(|| AppError::invalid_request("paymentMethodFamily is missing"))?;
    let method_type = body_str(&body, "paymentMethodType").unwrap_or_default().to_string();
    if method_type.is_empty() && !type_optional_for_family(&family) {
        return Err(AppError::invalid_request("paymentMethodType is missing"));
    }
    if query.complete_prerequisites
        && (query.country.is_none() || query.partner.eq_ignore_ascii_case(DEFAULT_PARTNER))
    {
        return Err(AppError::invalid_request(
            "completePrerequisites requires country and partner",
        ));
    }

    let kind = PaymentMethodKind::classify(&family, &method_type);
    let setting = partner_setting(&state, &rc, &query.partner, OPERATION_ADD).await;
    if let Some(setting) = &setting {
        setting.apply_flights(&mut rc.flights);
    }
    let links = pidl_links(&state, &query, &account_id);

    let challenge_session = take_challenge_session(&mut body);
    if kind.is_credit_card() && rc.flight(flights::CHALLENGE_SWITCH) && rc.flight(flights::ENABLE_CHALLENGE) {
        if let Some(resource) = px_challenge_gate(&state, &rc, &links, &account_id, challenge_session, &mut body).await? {
            return Ok(Json(resource).into_response());
        }
    }

    if kind.is_credit_card() && rc.flight(flights::RATE_LIMIT_PER_ACCOUNT) {
        tracing::warn!(account_id = %account_id, family = %family, "card add rate limited by flight");
        return Err(rate_limited(&rc));
    }

    let redeem_enabled = setting
        .as_ref()
        .map(|s| s.is_feature_enabled(FEATURE_REDEEM_GIFT_CARD, query.country()))
        .unwrap_or(false);
    if kind == PaymentMethodKind::StoredValue && (redeem_enabled || rc.flight(flights::ENABLE_REDEEM_CSV_FLOW)) {
        let resource = csv_token::handle_stored_value(&state, &rc, &query, &account_id, &body).await?;
        return Ok(Json(resource).into_response());
    }

    risk_data::attach(&mut body, &rc.device_info, &query.partner, &rc.flights);

    if let Some(request_id) = query.request_id.as_deref() {
        if rc.flight(flights::INTEGRATE_FRAUD_DETECTION) {
            bot_check(&state, &rc, request_id).await;
        }
    }

    let ctx = rc.accessor_context();
    let mut pi = match state
        .pims()?
        .add_payment_instrument(&ctx, &account_id, &pims_query(&query), &body)
        .await
    {
        Ok(pi) => pi,
        Err(err) => {
            let (status, error) = service_failure(err)?;
            tracing::info!(status, code = %error.error_code, family = %family, "PIMS rejected add");
            let error_ctx = AddErrorContext {
                family: &family,
                method_type: &method_type,
                partner: &query.partner,
                country: query.country(),
                flights: &rc.flights,
                setting: setting.as_ref(),
                is_guest: rc.is_guest(),
            };
            return match map_add_error(status, error, &error_ctx) {
                AddPiFailure::Respond(err) => Err(err),
                AddPiFailure::PxChallenge => {
                    let resource = new_px_challenge(&state, &rc, &links, &account_id).await?;
                    Ok(Json(resource).into_response())
                }
            };
        }
    };
    tracing::info!(piid = %pi.id, status = %pi.status, "payment instrument added");

    add_client_action(&mut pi, &action_context(links, &query, setting.as_ref(), RequestType::AddPi))?;

    if query.complete_prerequisites && pi.status == PaymentInstrumentStatus::Active {
        let profile = state
            .accounts()?
            .get_profile(&ctx, &account_id, CONSUMER_PROFILE)
            .await?;
        let has_address = profile.and_then(|p| p.default_address_id).is_some();
        if !has_address {
            pi.client_action = Some(ClientAction::pidl(vec![pidl_factory::billing_address(&links)]));
        }
    }

    Ok(Json(pi).into_response())
}

/// POST /v7.0/:account_id/paymentInstrumentsEx/:piid/update — Update a PI.
#[utoipa::path(
    post,
    path = "/v7.0/{account_id}/paymentInstrumentsEx/{piid}/update",
    params(
        ("account_id" = String, Path, description = "Account id"),
        ("piid" = String, Path, description = "Payment instrument id"),
    ),
    request_body = Object,
    responses(
        (status = 200, description = "The updated PI", body = Object),
        (status = 400, description = "Invalid request or mapped PIMS error"),
    ),
    tag = "paymentInstrumentsEx"
)]
async fn update_payment_instrument(
    State(state): State<AppState>,
    Path((account_id, piid)): Path<(String, String)>,
    rc: RequestContext,
    query: PiQuery,
    body: Bytes,
) -> Result<Json<PaymentInstrument>, AppError> {
    let Some(mut body) = optional_json_body(&body)? else {
        return Err(AppError::invalid_request(INVALID_PI_DATA));
    };
    let family = body_str(&body, "paymentMethodFamily")
        .ok_or_else(|| AppError::invalid_request("paymentMethodFamily is missing"))?;
    let method_type = body_str(&body, "paymentMethodType")
        .ok_or_else(|| AppError::invalid_request("paymentMethodType is missing"))?;
    let kind = PaymentMethodKind::classify(family, method_type);

    risk_data::attach(&mut body, &rc.device_info, &query.partner, &rc.flights);

    let mut pi = match state
        .pims()?
        .update_payment_instrument(&rc.accessor_context(), &account_id, &piid, &body)
        .await
    {
        Ok(pi) => pi,
        Err(err) => {
            let (status, error) = service_failure(err)?;
            return Err(map_update_error(status, error, kind));
        }
    };

    let links = pidl_links(&state, &query, &account_id);
    add_client_action(&mut pi, &action_context(links, &query, None, RequestType::AddPi))?;
    Ok(Json(pi))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn add_new_payment_method_link() -> PaymentInstrument {
    PaymentInstrument {
        id: ADD_NEW_PAYMENT_METHOD_LINK.to_string(),
        payment_method: PaymentMethod::new(FAMILY_ADD_NEW_PAYMENT_METHOD, ""),
        status: PaymentInstrumentStatus::Active,
        ..Default::default()
    }
}

fn list_query(query: &PiQuery) -> PimsQuery {
    PimsQuery {
        country: query.country.clone(),
        ..Default::default()
    }
}

/// Copy card art from the first indexed network token a PI references.
/// The token lookup is best effort.
async fn attach_card_art(state: &AppState, rc: &RequestContext, device_id: &str, pis: &mut [PaymentInstrument]) {
    let Some(accessor) = state.accessors.network_tokenization.as_ref() else {
        return;
    };
    let tokens = match accessor
        .list_network_tokens(&rc.accessor_context(), rc.msa_profile.puid(), device_id)
        .await
    {
        Ok(tokens) => tokens,
        Err(err) => {
            tracing::warn!(device_id, error = %err, "network token lookup failed");
            return;
        }
    };
    let index: HashMap<&str, &NetworkToken> = tokens.iter().map(|t| (t.id.as_str(), t)).collect();

    for pi in pis.iter_mut() {
        let Some(token_refs) = pi.details.network_tokens.as_ref() else {
            continue;
        };
        let card_art = token_refs
            .iter()
            .find_map(|r| index.get(r.id.as_str()))
            .and_then(|t| t.card_metadata.clone());
        if let Some(card_art) = card_art {
            pi.payment_method
                .display
                .get_or_insert_with(PaymentMethodDisplay::default)
                .card_art = Some(card_art);
        }
    }
}

fn take_challenge_session(body: &mut Value) -> Option<String> {
    body.as_object_mut()
        .and_then(|o| o.remove(CHALLENGE_SESSION_FIELD))
        .and_then(|v| v.as_str().map(str::trim).map(str::to_string))
        .filter(|id| !id.is_empty())
}

/// Run the PX challenge before a card add. `Some` is the response to send;
/// `None` means the challenge is complete and the add continues with the
/// evidence recorded in `details`.
async fn px_challenge_gate(
    state: &AppState,
    rc: &RequestContext,
    links: &PidlLinks<'_>,
    account_id: &str,
    session_id: Option<String>,
    body: &mut Value,
) -> Result<Option<PidlResource>, AppError> {
    let Some(session_id) = session_id else {
        return new_px_challenge(state, rc, links, account_id).await.map(Some);
    };

    let session = state
        .challenge_management()?
        .get_challenge_status(&rc.accessor_context(), &session_id)
        .await?;
    if !session.is_completed() {
        tracing::info!(session_id = %session_id, status = %session.status, "PX challenge not completed");
        let pidl = pidl_factory::px_challenge(links, &session_id);
        return Ok(Some(pidl_factory::client_action_resource(ClientAction::pidl(vec![pidl]))));
    }

    if let Some(object) = body.as_object_mut() {
        let details = object
            .entry("details")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(details) = details.as_object_mut() {
            details.insert(
                "challengeEvidence".into(),
                json!({
                    "challengeSessionId": session_id,
                    "challengeType": session.challenge_type.as_deref().unwrap_or(PX_CHALLENGE_TYPE),
                    "challengeResult": session.status,
                }),
            );
        }
    }
    Ok(None)
}

async fn new_px_challenge(
    state: &AppState,
    rc: &RequestContext,
    links: &PidlLinks<'_>,
    account_id: &str,
) -> Result<PidlResource, AppError> {
    let request = json!({
        "challengeType": PX_CHALLENGE_TYPE,
        "accountId": account_id,
        "partner": links.partner,
        "language": links.language,
    });
    let session = state
        .challenge_management()?
        .create_challenge_session(&rc.accessor_context(), &request)
        .await?;
    tracing::info!(session_id = %session.session_id, "PX challenge session created");
    let pidl = pidl_factory::px_challenge(links, &session.session_id);
    Ok(pidl_factory::client_action_resource(ClientAction::pidl(vec![pidl])))
}

fn rate_limited(rc: &RequestContext) -> AppError {
    let inner = ServiceErrorResponse::new("ValidationFailed", credit_card::VALIDATION_FAILED)
        .with_source(PIMS_SOURCE);
    let error = ServiceErrorResponse::new("ValidationFailed", messages::GENERIC)
        .with_source(SERVICE_NAME)
        .with_inner(inner)
        .with_correlation_id(rc.correlation_id.as_str());
    AppError::with_status(400, error)
}

/// Bot check ahead of a payment-request add. A failed check counts as
/// approved.
async fn bot_check(state: &AppState, rc: &RequestContext, request_id: &str) {
    let Some(accessor) = state.accessors.fraud_detection.as_ref() else {
        return;
    };
    let request = json!({ "requestId": request_id });
    match accessor.bot_check(&rc.accessor_context(), &request).await {
        Ok(result) if !result.is_approved() => {
            tracing::warn!(request_id, recommendation = %result.recommendation, "bot check did not approve");
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(request_id, error = %err, "bot check failed, treating as approved"),
    }
}
