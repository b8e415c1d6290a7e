//! # Anonymous Payment Instrument Routes
//!
//! Calls made without an account in the path:
//!
//! - `POST /v7.0/paymentInstrumentsEx/create` — second-screen card add.
//! - `POST /v7.0/paymentInstrumentsEx/apply` — co-branded card application.
//! - `GET  /v7.0/paymentInstrumentsEx/:piid/resumeAnonymous` — page loaded
//!   in the 3DS iframe when the bank redirects back.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use px_accessors::issuer::ApplyRequest;
use px_core::partner::is_xbox_native_partner;
use px_core::{ClientAction, ErrorCode, PaymentInstrument, PidlResource, ServiceErrorResponse};
use serde_json::Value;
use url::form_urlencoded;

use super::instruments::INVALID_PI_DATA;
use super::{action_context, body_str, pidl_links, pims_query};
use crate::client_actions::{add_client_action, RequestType};
use crate::error::{AppError, SERVICE_NAME};
use crate::extractors::{optional_json_body, PiQuery, RequestContext};
use crate::pidl_factory;
use crate::risk_data;
use crate::state::AppState;

pub const SCENARIO_SECOND_SCREEN_ADD_PI: &str = "secondScreenAddPi";
const BAD_SESSION_STATE: &str = "BadSessionState";
const THREE_DS_ONE_RESUME_FAILED: &str = "ThreeDSOneResumeAddPiFailed";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v7.0/paymentInstrumentsEx/create", post(create_anonymous))
        .route("/v7.0/paymentInstrumentsEx/apply", post(apply))
        .route(
            "/v7.0/paymentInstrumentsEx/:piid/resumeAnonymous",
            get(resume_anonymous),
        )
}

/// POST /v7.0/paymentInstrumentsEx/create — Add a card from a second screen.
///
/// Only the `secondScreenAddPi` scenario is accepted. The account the card
/// is added to travels in the body's `accountId`.
#[utoipa::path(
    post,
    path = "/v7.0/paymentInstrumentsEx/create",
    request_body = Object,
    responses(
        (status = 200, description = "The added PI", body = Object),
        (status = 400, description = "Not a second-screen add"),
    ),
    tag = "anonymous"
)]
async fn create_anonymous(
    State(state): State<AppState>,
    rc: RequestContext,
    query: PiQuery,
    body: Bytes,
) -> Result<Json<PaymentInstrument>, AppError> {
    if !query.has_scenario(SCENARIO_SECOND_SCREEN_ADD_PI) {
        return Err(AppError::invalid_request("Invalid anonymous post call"));
    }
    let Some(mut body) = optional_json_body(&body)? else {
        return Err(AppError::invalid_request(INVALID_PI_DATA));
    };
    let account_id = body_str(&body, "accountId")
        .map(str::to_string)
        .ok_or_else(|| AppError::invalid_request("Invalid account ID for the second-screen session"))?;

    risk_data::attach(&mut body, &rc.device_info, &query.partner, &rc.flights);
    let mut pi = state
        .pims()?
        .add_payment_instrument(&rc.accessor_context(), &account_id, &pims_query(&query), &body)
        .await?;
    let links = pidl_links(&state, &query, &account_id);
    add_client_action(&mut pi, &action_context(links, &query, None, RequestType::AddPi))?;
    tracing::info!(piid = %pi.id, session_id = ?query.session_id, "second-screen add completed");
    Ok(Json(pi))
}

/// POST /v7.0/paymentInstrumentsEx/apply — Start a co-branded card
/// application with the issuer.
#[utoipa::path(
    post,
    path = "/v7.0/paymentInstrumentsEx/apply",
    params(("sessionId" = Option<String>, Query, description = "Existing issuer session")),
    request_body = Object,
    responses(
        (status = 200, description = "Redirect PIDL", body = Object),
        (status = 400, description = "PUID missing from x-ms-msaprofile"),
        (status = 500, description = "Issuer returned no redirect URL"),
    ),
    tag = "anonymous"
)]
async fn apply(
    State(state): State<AppState>,
    rc: RequestContext,
    query: PiQuery,
    body: Bytes,
) -> Result<Json<PidlResource>, AppError> {
    let body = optional_json_body(&body)?.unwrap_or(Value::Null);
    let caller_session = query.session_id.clone().filter(|s| !s.is_empty());
    let mut request = ApplyRequest {
        card_product: body_str(&body, "cardProduct").unwrap_or_default().to_string(),
        channel: body_str(&body, "channel").unwrap_or_default().to_string(),
        market: body_str(&body, "market").unwrap_or(query.country()).to_string(),
        referrer_id: body_str(&body, "referrerId").unwrap_or_default().to_string(),
        session_id: caller_session.clone().unwrap_or_else(new_session_id),
    };

    if is_xbox_native_partner(&query.partner) {
        let url = application_url(&state.config.pidl_base_url, &query, &request);
        return Ok(Json(pidl_factory::co_branded_card_qr_code(&url, &request.session_id)));
    }

    let puid = rc
        .msa_profile
        .puid()
        .ok_or_else(|| {
            AppError::validation(
                ErrorCode::PuidNotFound,
                "Customer puid invalid and is required for Apply flow",
            )
        })?
        .to_string();

    let ctx = rc.accessor_context();
    let issuer = state.issuer()?;
    let response = match issuer.apply(&ctx, &puid, &request).await {
        Ok(response) => response,
        Err(err)
            if caller_session.is_some()
                && err.service_error().is_some_and(|e| e.is(BAD_SESSION_STATE)) =>
        {
            tracing::info!(session_id = %request.session_id, "issuer rejected session, retrying with a new one");
            request.session_id = new_session_id();
            issuer.apply(&ctx, &puid, &request).await?
        }
        Err(err) => return Err(err.into()),
    };

    match response.redirect_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => Ok(Json(pidl_factory::redirect_pidl(url))),
        None => Err(AppError::downstream(
            StatusCode::INTERNAL_SERVER_ERROR,
            ServiceErrorResponse::from_code(
                ErrorCode::ServiceError,
                "RedirectUrl from IssuerService apply was not valid",
            )
            .with_source(SERVICE_NAME),
        )),
    }
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Application page a console user opens on a phone.
fn application_url(base_url: &str, query: &PiQuery, request: &ApplyRequest) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("sessionId", &request.session_id)
        .append_pair("partner", &query.partner)
        .append_pair("language", &query.language)
        .append_pair("country", query.country())
        .append_pair("channel", &request.channel)
        .append_pair("referrerId", &request.referrer_id)
        .finish();
    format!("{base_url}/v7.0/paymentInstrumentsEx/apply?{query}")
}

/// GET /v7.0/paymentInstrumentsEx/:piid/resumeAnonymous — 3DS return page.
///
/// Answers an HTML page that posts the next client action to the parent
/// frame.
#[utoipa::path(
    get,
    path = "/v7.0/paymentInstrumentsEx/{piid}/resumeAnonymous",
    params(
        ("piid" = String, Path, description = "Payment instrument id"),
        ("isSuccessful" = Option<bool>, Query, description = "Outcome of the bank challenge"),
        ("sessionQueryUrl" = Option<String>, Query, description = "PIMS session to poll"),
    ),
    responses((status = 200, description = "HTML post-message page", content_type = "text/html")),
    tag = "anonymous"
)]
async fn resume_anonymous(
    State(state): State<AppState>,
    Path(piid): Path<String>,
    query: PiQuery,
) -> Response {
    let action = if query.is_successful {
        let links = pidl_links(&state, &query, "");
        let pi = PaymentInstrument {
            id: piid,
            ..Default::default()
        };
        let session_query_url = query.session_query_url.as_deref().unwrap_or_default();
        ClientAction::pidl(vec![pidl_factory::three_ds_status_check(&links, &pi, session_query_url)])
    } else {
        ClientAction::failure(400, THREE_DS_ONE_RESUME_FAILED, "Resume add PI failed")
    };
    post_message_page(&action)
}

fn post_message_page(action: &ClientAction) -> Response {
    let payload = serde_json::to_string(action).unwrap_or_else(|_| "{}".to_string());
    let html = format!(
        "<html><script>window.parent.postMessage(\"{}\", \"*\");</script><body/></html>",
        js_string_escape(&payload)
    );
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}

/// Escape for a double-quoted JavaScript string literal inside a script tag.
fn js_string_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\u0027"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
