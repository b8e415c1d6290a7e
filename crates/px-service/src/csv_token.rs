//! # Stored-Value (CSV) Token Flow
//!
//! Adding a stored-value PI redeems a gift-card token in two calls. The
//! first (`actionType=validate`) checks the token with TokenPolicy and,
//! for tokens that resolve to a CSV catalog product, answers with a
//! confirm-redeem PIDL. The second (`actionType=redeem`) revalidates and
//! redeems through Purchase.

use px_accessors::pims::PimsQuery;
use px_accessors::purchase::RedeemRequest;
use px_accessors::token_policy::TokenDescriptionRequest;
use px_core::messages::csv;
use px_core::payment_method::FAMILY_EWALLET;
use px_core::{
    csv_token::format_amount, flights, ClientAction, ClientActionType, CsvTokenRedemptionResult,
    CsvTokenStatus, CsvTokenValidationResult, PaymentMethodKind, PidlResource, ServiceErrorResponse,
};
use serde_json::{json, Value};

use crate::error::{AppError, SERVICE_NAME};
use crate::extractors::{PiQuery, RequestContext};
use crate::pidl_factory::{self, PidlLinks};
use crate::state::AppState;

pub const ACTION_VALIDATE: &str = "validate";
pub const ACTION_REDEEM: &str = "redeem";

const TOKEN_POLICY_SOURCE: &str = "TokenPolicyService";
const CATEGORY_OTHER: &str = "Other";
const PRODUCT_TYPE_CSV: &str = "CSV";

/// A CSV request as read from the add-PI body.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRequest {
    pub token: String,
    pub action: String,
}

impl CsvRequest {
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match (field("tokenIdentifierValue"), field("actionType")) {
            (Some(token), Some(action)) => Ok(Self { token, action }),
            _ => Err(AppError::invalid_request("tokenIdentifierValue or action is missing")),
        }
    }
}

/// 400 envelope for token failures, attributed to TokenPolicy.
fn token_error(correlation_id: &str, code: &str, message: &str) -> AppError {
    let inner = ServiceErrorResponse::new(code, message).with_source(TOKEN_POLICY_SOURCE);
    let error = ServiceErrorResponse::new(code, message)
        .with_source(SERVICE_NAME)
        .with_inner(inner)
        .with_correlation_id(correlation_id);
    AppError::with_status(400, error)
}

/// Handle a stored-value add. Returns the resource carrying the client
/// action.
pub async fn handle_stored_value(
    state: &AppState,
    rc: &RequestContext,
    query: &PiQuery,
    account_id: &str,
    body: &Value,
) -> Result<PidlResource, AppError> {
    let request = CsvRequest::from_body(body)?;

    if rc.flight(flights::DISABLE_REDEEM_CSV_FLOW) {
        return Err(token_error(
            &rc.correlation_id,
            CsvTokenStatus::CouldNotValidate.as_str(),
            csv::COULD_NOT_VALIDATE,
        ));
    }

    let user_id = rc.msa_profile.puid().unwrap_or(account_id);
    let links = PidlLinks {
        base_url: &state.config.pidl_base_url,
        account_id,
        partner: &query.partner,
        language: &query.language,
        country: query.country(),
    };

    if request.action.eq_ignore_ascii_case(ACTION_VALIDATE) {
        let result = validate_token(state, rc, user_id, &request.token, query).await?;
        tracing::info!(status = %result.token_status, "CSV token validated");
        match (result.token_status, result.token_value, result.token_currency.as_deref()) {
            (CsvTokenStatus::ValidCsvToken, Some(value), Some(currency)) => {
                let amount = format_amount(value, currency);
                let pidl = pidl_factory::confirm_redeem(&links, &request.token, &amount);
                Ok(pidl_factory::client_action_resource(ClientAction::pidl(vec![pidl])))
            }
            (status, _, _) => Err(token_error(&rc.correlation_id, status.as_str(), csv::INVALID_TOKEN)),
        }
    } else if request.action.eq_ignore_ascii_case(ACTION_REDEEM) {
        let redemption = redeem_token(state, rc, user_id, &request.token, query).await?;
        tracing::info!(
            success = redemption.is_success,
            status = %redemption.token_status,
            "CSV token redemption finished"
        );
        let action = if redemption.is_success {
            let csv_pi = stored_value_pi(state, rc, account_id).await?;
            ClientAction::return_context(json!({ "redeemResult": redemption, "csvPI": csv_pi }))
        } else {
            ClientAction {
                context: Some(json!({ "redeemResult": redemption })),
                ..ClientAction::new(ClientActionType::Failure)
            }
        };
        Ok(pidl_factory::client_action_resource(action))
    } else {
        Err(AppError::invalid_request("action is invalid"))
    }
}

/// Ask TokenPolicy about the token and, when it is redeemable, confirm with
/// Catalog that it resolves to a CSV product.
pub async fn validate_token(
    state: &AppState,
    rc: &RequestContext,
    user_id: &str,
    token: &str,
    query: &PiQuery,
) -> Result<CsvTokenValidationResult, AppError> {
    let ctx = rc.accessor_context();
    let request = TokenDescriptionRequest {
        token_value: token.to_string(),
        market: query.country().to_string(),
        language: query.language.clone(),
    };
    let description = match state.token_policy()?.get_token_description(&ctx, user_id, &request).await {
        Ok(description) => description,
        Err(err) if err.is_not_found() => {
            return Ok(CsvTokenValidationResult::status(CsvTokenStatus::TokenNotFound))
        }
        Err(err) => return Err(err.into()),
    };

    if !description.policy_evaluation.is_redeemable {
        let result = description.policy_evaluation.result.as_deref().unwrap_or_default();
        return Ok(CsvTokenValidationResult::status(CsvTokenStatus::from_policy_result(result)));
    }

    let Some(asset) = description.asset.as_ref().filter(|a| !a.currency.is_empty()) else {
        return Ok(CsvTokenValidationResult::status(CsvTokenStatus::NonCsvToken));
    };

    let big_ids: Vec<String> = description
        .products
        .iter()
        .filter(|p| p.category.eq_ignore_ascii_case(CATEGORY_OTHER))
        .filter_map(|p| p.big_id())
        .collect();
    if big_ids.is_empty() {
        return Ok(CsvTokenValidationResult::status(CsvTokenStatus::NonCsvToken));
    }

    let catalog = state
        .catalog()?
        .get_products(&ctx, &big_ids, query.country(), &query.language)
        .await?;
    let is_csv = catalog
        .products
        .iter()
        .any(|p| p.product_type.eq_ignore_ascii_case(PRODUCT_TYPE_CSV));
    if !is_csv {
        return Ok(CsvTokenValidationResult::status(CsvTokenStatus::NonCsvToken));
    }

    Ok(CsvTokenValidationResult {
        token_status: CsvTokenStatus::ValidCsvToken,
        token_value: Some(asset.value),
        token_currency: Some(asset.currency.clone()),
    })
}

fn failed_redemption(token_status: CsvTokenStatus) -> CsvTokenRedemptionResult {
    CsvTokenRedemptionResult {
        is_success: false,
        token_status,
        order_id: None,
        value: None,
        currency: None,
    }
}

/// Revalidate, then redeem through Purchase.
pub async fn redeem_token(
    state: &AppState,
    rc: &RequestContext,
    user_id: &str,
    token: &str,
    query: &PiQuery,
) -> Result<CsvTokenRedemptionResult, AppError> {
    let validation = validate_token(state, rc, user_id, token, query).await?;
    if validation.token_status != CsvTokenStatus::ValidCsvToken {
        return Ok(failed_redemption(validation.token_status));
    }

    let request = RedeemRequest {
        token_value: token.to_string(),
        market: query.country().to_string(),
        language: query.language.clone(),
        client_context: rc.device_info.ip_address().unwrap_or_default().to_string(),
    };
    let order = match state
        .purchase()?
        .redeem_csv_token(&rc.accessor_context(), user_id, &request)
        .await
    {
        Ok(order) => order,
        Err(err) if err.status() == Some(400) => {
            tracing::warn!(error = %err, "purchase rejected CSV redemption");
            return Ok(failed_redemption(CsvTokenStatus::Unknown));
        }
        Err(err) => return Err(err.into()),
    };

    if !order.is_purchased() {
        return Ok(failed_redemption(CsvTokenStatus::Unknown));
    }
    Ok(CsvTokenRedemptionResult {
        is_success: true,
        token_status: CsvTokenStatus::ValidCsvToken,
        order_id: Some(order.order_id),
        value: order.total_amount.or(validation.token_value),
        currency: order.currency.or(validation.token_currency),
    })
}

/// The account's stored-value PI after a successful redemption.
async fn stored_value_pi(state: &AppState, rc: &RequestContext, account_id: &str) -> Result<Value, AppError> {
    let pis = state
        .pims()?
        .list_payment_instruments(&rc.accessor_context(), account_id, &["active".to_string()], &PimsQuery::default())
        .await?;
    let pi = pis.into_iter().find(|pi| {
        pi.family().eq_ignore_ascii_case(FAMILY_EWALLET) && pi.kind() == PaymentMethodKind::StoredValue
    });
    Ok(pi.and_then(|pi| serde_json::to_value(pi).ok()).unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn request_needs_token_and_action() {
        let ok = CsvRequest::from_body(&json!({ "tokenIdentifierValue": "ABC", "actionType": "validate" })).unwrap();
        assert_eq!(ok.token, "ABC");
        assert_eq!(ok.action, "validate");

        for body in [
            json!({ "tokenIdentifierValue": "ABC" }),
            json!({ "actionType": "redeem" }),
            json!({ "tokenIdentifierValue": " ", "actionType": "redeem" }),
        ] {
            let err = CsvRequest::from_body(&body).unwrap_err();
            assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "InvalidRequestData"));
        }
    }

    #[test]
    fn token_error_nests_token_policy_source() {
        match token_error("corr-1", "TokenExpired", csv::INVALID_TOKEN) {
            AppError::Downstream { status, error } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(error.error_code, "TokenExpired");
                assert_eq!(error.source.as_deref(), Some(SERVICE_NAME));
                assert_eq!(error.correlation_id.as_deref(), Some("corr-1"));
                let inner = error.inner_error.unwrap();
                assert_eq!(inner.source.as_deref(), Some(TOKEN_POLICY_SOURCE));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_redemption_serializes_camel_case() {
        let v = serde_json::to_value(failed_redemption(CsvTokenStatus::TokenExpired)).unwrap();
        assert_eq!(v, json!({ "isSuccess": false, "tokenStatus": "TokenExpired" }));
    }
}
