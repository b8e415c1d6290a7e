//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented handlers into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PXService — paymentInstrumentsEx",
        version = "0.4.44",
        description = "Payment experience service: payment instrument list, get, add, update, replace, remove and resume, with the client actions (PIDL challenges, redirects, status checks) the PIDL SDK renders.\n\nUpstream services (PIMS, partner settings, accounts, challenge management, fraud detection, issuer, network tokenization, orchestration, stored value) are reached through configured accessors.",
        license(name = "BUSL-1.1")
    ),
    servers(
        (url = "http://localhost:7000", description = "Local development server"),
    ),
    paths(
        // ── Probe ───────────────────────────────────────────────────────
        crate::routes::probe::probe,
        // ── paymentInstrumentsEx ────────────────────────────────────────
        crate::routes::instruments::list_payment_instruments,
        crate::routes::instruments::get_payment_instrument,
        crate::routes::instruments::add_payment_instrument,
        crate::routes::instruments::update_payment_instrument,
        crate::routes::instrument_actions::replace_payment_instrument,
        crate::routes::instrument_actions::remove_payment_instrument,
        crate::routes::instrument_actions::resume_pending_operation,
        crate::routes::instrument_actions::validate_cvv,
        crate::routes::instrument_actions::get_challenge_context,
        crate::routes::instrument_actions::fund_stored_value,
        crate::routes::instrument_actions::check_fund_stored_value,
        // ── Anonymous ───────────────────────────────────────────────────
        crate::routes::anonymous::create_anonymous,
        crate::routes::anonymous::apply,
        crate::routes::anonymous::resume_anonymous,
    ),
    components(
        schemas(
            crate::routes::probe::ProbeResponse,
            crate::routes::instruments::PidlIdentity,
            crate::routes::instruments::PidlInfo,
            crate::routes::instruments::PaymentInstrumentsWithPidl,
            crate::routes::instrument_actions::ReplaceChallengeRequired,
            crate::routes::instrument_actions::ChallengeContext,
            crate::routes::instrument_actions::FundStatus,
        ),
    ),
    tags(
        (name = "probe", description = "Availability check"),
        (name = "paymentInstrumentsEx", description = "Payment instruments of an account and the actions on them"),
        (name = "anonymous", description = "Second-screen add, co-branded card apply and the 3DS resume page"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
