//! # API Route Modules
//!
//! - `probe` — `/v7.0/probe`, the versioned availability check.
//! - `instruments` — list, get, add and update of payment instruments.
//! - `instrument_actions` — per-PI actions: replace, remove, resume,
//!   validate CVV, challenge context and stored-value funding.
//! - `anonymous` — calls without an account: second-screen create, issuer
//!   apply and the 3DS resume page.
//!
//! Helpers shared by several handlers live here.

pub mod anonymous;
pub mod instrument_actions;
pub mod instruments;
pub mod probe;

use px_accessors::pims::PimsQuery;
use px_accessors::AccessorError;
use px_core::{ErrorCode, PaymentExperienceSetting, PaymentInstrument, ServiceErrorResponse};

use crate::client_actions::{ClientActionContext, RequestType};
use crate::error::{AppError, SERVICE_NAME};
use crate::extractors::{PiQuery, RequestContext};
use crate::pidl_factory::PidlLinks;
use crate::state::AppState;

/// Links for PIDLs built while answering a request on `account_id`.
pub(crate) fn pidl_links<'a>(state: &'a AppState, query: &'a PiQuery, account_id: &'a str) -> PidlLinks<'a> {
    PidlLinks {
        base_url: &state.config.pidl_base_url,
        account_id,
        partner: &query.partner,
        language: &query.language,
        country: query.country(),
    }
}

pub(crate) fn action_context<'a>(
    links: PidlLinks<'a>,
    query: &'a PiQuery,
    setting: Option<&'a PaymentExperienceSetting>,
    request_type: RequestType,
) -> ClientActionContext<'a> {
    ClientActionContext {
        links,
        partner: &query.partner,
        country: query.country(),
        scenario: query.scenario.as_deref(),
        setting,
        request_type,
    }
}

pub(crate) fn pims_query(query: &PiQuery) -> PimsQuery {
    PimsQuery {
        country: query.country.clone(),
        language: Some(query.language.clone()),
        partner: Some(query.partner.clone()),
    }
}

/// The partner's setting for `operation`. Partner settings are advisory:
/// an unconfigured or failing service means no setting.
pub(crate) async fn partner_setting(
    state: &AppState,
    rc: &RequestContext,
    partner: &str,
    operation: &str,
) -> Option<PaymentExperienceSetting> {
    let accessor = state.accessors.partner_settings.as_ref()?;
    match accessor
        .get_payment_experience_settings(&rc.accessor_context(), partner, Some(operation))
        .await
    {
        Ok(mut settings) => settings.remove(operation),
        Err(err) => {
            tracing::warn!(partner, operation, error = %err, "partner settings unavailable");
            None
        }
    }
}

/// Read a PI, answering 404 `PaymentInstrumentNotFound` when PIMS does not
/// know the account/PI pair.
pub(crate) async fn fetch_pi(
    state: &AppState,
    rc: &RequestContext,
    account_id: &str,
    piid: &str,
) -> Result<PaymentInstrument, AppError> {
    match state
        .pims()?
        .get_payment_instrument(&rc.accessor_context(), account_id, piid)
        .await
    {
        Ok(pi) => Ok(pi),
        Err(err) if err.is_not_found() => {
            let inner = err
                .service_error()
                .cloned()
                .unwrap_or_else(|| ServiceErrorResponse::new("NotFound", err.to_string()));
            let error = ServiceErrorResponse::from_code(
                ErrorCode::PaymentInstrumentNotFound,
                format!("Payment instrument {piid} was not found for account {account_id}"),
            )
            .with_source(SERVICE_NAME)
            .with_inner(inner)
            .with_correlation_id(rc.correlation_id.as_str());
            Err(AppError::NotFound(Box::new(error)))
        }
        Err(err) => Err(err.into()),
    }
}

/// Split a downstream failure into status and envelope for mapping.
/// Transport and decoding failures have nothing to map and convert
/// directly.
pub(crate) fn service_failure(err: AccessorError) -> Result<(u16, ServiceErrorResponse), AppError> {
    match err {
        AccessorError::Service { status, error, .. } => Ok((status, error)),
        other => Err(other.into()),
    }
}

/// String field of a JSON body, trimmed; `None` when absent or blank.
pub(crate) fn body_str<'a>(body: &'a serde_json::Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
