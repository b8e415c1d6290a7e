//! # PIMS Error Mapping
//!
//! Rewrites PIMS error envelopes into user-facing messages before they are
//! returned. A field-level error moves its message into a
//! [`ServiceErrorDetail`](px_core::ServiceErrorDetail) whose `Target` names
//! the PIDL property to highlight, and the top-level `Message` becomes
//! `"[]"`. Errors the client cannot act on get the generic message.
//!
//! Each operation has its own map: add and resume know more error codes than
//! update, and replace/remove always answer with the generic message.

use px_core::messages::{self, alipay, credit_card, cup, non_sim, paypal, FieldMessage};
use px_core::payment_method::FAMILY_CREDIT_CARD;
use px_core::{
    flights, partner, ClientAction, ClientActionType, Flights, PaymentExperienceSetting,
    PaymentMethodKind, ServiceErrorResponse,
};
use serde_json::json;

use crate::error::{AppError, SERVICE_NAME};

const XBOX_SETTINGS_PARTNER: &str = "xboxsettings";

/// Inputs to the add-PI map beyond the error itself.
#[derive(Debug, Clone, Copy)]
pub struct AddErrorContext<'a> {
    pub family: &'a str,
    pub method_type: &'a str,
    pub partner: &'a str,
    pub country: &'a str,
    pub flights: &'a Flights,
    pub setting: Option<&'a PaymentExperienceSetting>,
    pub is_guest: bool,
}

/// What the add handler should do with a failed PIMS post.
#[derive(Debug)]
pub enum AddPiFailure {
    /// Return this envelope with this status.
    Respond(AppError),
    /// PIMS asked for a challenge; show the PX challenge PIDL instead.
    PxChallenge,
}

fn field_or_generic(error: ServiceErrorResponse, mapped: Option<FieldMessage>) -> ServiceErrorResponse {
    match mapped {
        Some(field) => error.into_field_error(field.message, field.target),
        None => generic(error),
    }
}

fn generic(mut error: ServiceErrorResponse) -> ServiceErrorResponse {
    error.message = messages::GENERIC.to_string();
    error
}

fn field(error: ServiceErrorResponse, message: &'static str, target: &'static str) -> ServiceErrorResponse {
    error.into_field_error(message, target)
}

/// The shared credit-card map.
pub fn map_credit_card_common(error: ServiceErrorResponse) -> ServiceErrorResponse {
    let mapped = messages::credit_card_error(&error.error_code);
    field_or_generic(error, mapped)
}

/// The shared direct-debit map. `sepa` selects the SEPA wording.
pub fn map_direct_debit_common(error: ServiceErrorResponse, sepa: bool) -> ServiceErrorResponse {
    let mapped = messages::direct_debit_error(&error.error_code, sepa);
    field_or_generic(error, mapped)
}

fn is_add_credit_card(ctx: &AddErrorContext<'_>, kind: PaymentMethodKind) -> bool {
    let card = if ctx.flights.is_enabled(flights::CHECK_CREDIT_CARD_TYPES) {
        kind.is_credit_card()
    } else {
        ctx.family.eq_ignore_ascii_case(FAMILY_CREDIT_CARD) && !kind.is_union_pay()
    };
    card && !partner::is_wallet_partner(ctx.partner)
}

/// Map a PIMS add-PI failure.
pub fn map_add_error(status: u16, error: ServiceErrorResponse, ctx: &AddErrorContext<'_>) -> AddPiFailure {
    if ctx.is_guest && error.is("ChallengeRequired") {
        let error = ServiceErrorResponse::new(error.error_code, messages::GENERIC).with_source(SERVICE_NAME);
        return AddPiFailure::Respond(AppError::with_status(400, error));
    }

    let kind = PaymentMethodKind::classify(ctx.family, ctx.method_type);
    let mut status = status;
    let mapped = match kind {
        k if k.is_union_pay() => map_cup_add(error),
        PaymentMethodKind::PayPal => {
            if error.is("IncorrectCredential") {
                field(error, paypal::INCORRECT_CREDENTIAL, paypal::TARGET_CREDENTIALS)
            } else {
                generic(error)
            }
        }
        k if is_add_credit_card(ctx, k) => {
            if ctx.flights.is_enabled(flights::CHALLENGE_SWITCH) && error.is("ChallengeRequired") {
                return AddPiFailure::PxChallenge;
            }
            map_credit_card_add(error, ctx)
        }
        PaymentMethodKind::Sepa if error.is("OperationNotSupported") => {
            status = 500;
            error
        }
        k if k.is_direct_debit() => map_direct_debit_common(error, k == PaymentMethodKind::Sepa),
        PaymentMethodKind::Alipay => map_alipay_add(error),
        PaymentMethodKind::NonSim => map_non_sim_add(error, ctx.partner),
        _ => error,
    };
    AddPiFailure::Respond(AppError::with_status(status, mapped))
}

fn map_cup_add(error: ServiceErrorResponse) -> ServiceErrorResponse {
    let code = error.error_code.as_str();
    if code.eq_ignore_ascii_case("ValidationFailed") || code.eq_ignore_ascii_case("InvalidPhoneValue") {
        let target = "accountToken,phone";
        return error.into_field_error(cup::INVALID_PHONE_OR_CARD, target);
    }
    if error.is("InvalidPaymentInstrumentInfo") {
        return field(error, cup::INVALID_CARD_NUMBER, cup::TARGET_CARD_NUMBER);
    }
    if error.is("TooManyOperations") {
        let mut error = error;
        error.message = cup::TOO_MANY_SMS_REQUESTS.to_string();
        return error;
    }
    generic(error)
}

fn map_credit_card_add(error: ServiceErrorResponse, ctx: &AddErrorContext<'_>) -> ServiceErrorResponse {
    let mut error = if error.is("InvalidPaymentInstrumentInfo") {
        field(error, credit_card::INVALID_CARD_NUMBER, credit_card::TARGET_CARD_NUMBER)
    } else if error.is("PrepaidCardNotSupported") {
        field(error, credit_card::PREPAID_CARD_NOT_SUPPORTED, credit_card::TARGET_CARD_NUMBER)
    } else if error.is("InvalidIssuerResponseWithTRPAU0008") || error.is("InvalidIssuerResponseWithTRPAU0009") {
        let mut error = error;
        error.message = credit_card::INVALID_ISSUER_RESPONSE.to_string();
        if ctx.flights.is_enabled(flights::DISPLAY_3DS_NOT_ENABLED_INLINE) {
            error.add_detail(px_core::ServiceErrorDetail {
                error_code: error.error_code.clone(),
                message: credit_card::INVALID_ISSUER_RESPONSE.to_string(),
                target: Some(credit_card::TARGET_CARD_NUMBER.to_string()),
            });
        }
        error
    } else {
        map_credit_card_common(error)
    };

    let conditional_address = ctx
        .setting
        .map(|s| s.is_feature_enabled(partner::FEATURE_CONDITIONAL_BILLING_ADDRESS, ctx.country))
        .unwrap_or(false);
    if conditional_address {
        error.client_action = Some(ClientAction {
            context: Some(json!({ "propertyName": "hideAddressGroup", "propertyValue": false })),
            ..ClientAction::new(ClientActionType::UpdatePropertyValue)
        });
    }
    error
}

fn map_alipay_add(error: ServiceErrorResponse) -> ServiceErrorResponse {
    if error.is("InvalidAlipayAccount") {
        field(error, alipay::INVALID_ACCOUNT, alipay::TARGET_ACCOUNT)
    } else if error.is("UserMobileNotMatch") {
        field(error, alipay::USER_MOBILE_NOT_MATCH, alipay::TARGET_PHONE)
    } else if error.is("UserCertNoMatch") {
        field(error, alipay::USER_CERT_NO_MATCH, alipay::TARGET_LAST_FIVE_CERT_NO)
    } else {
        generic(error)
    }
}

fn map_non_sim_add(error: ServiceErrorResponse, partner: &str) -> ServiceErrorResponse {
    if error.is("MOAccountNotFound") || error.is("RiskRejected") {
        field(error, non_sim::MO_ACCOUNT_NOT_FOUND, non_sim::TARGET_PHONE)
    } else if error.is("PaymentInstrumentAddAlready") && partner.eq_ignore_ascii_case(XBOX_SETTINGS_PARTNER) {
        field(error, non_sim::PI_ADDED_ALREADY, non_sim::TARGET_PHONE)
    } else if error.is("RejectedByProvider") {
        field(error, non_sim::REJECTED_BY_PROVIDER, non_sim::TARGET_PHONE)
    } else {
        generic(error)
    }
}

/// Map a PIMS update-PI failure.
pub fn map_update_error(status: u16, error: ServiceErrorResponse, kind: PaymentMethodKind) -> AppError {
    let mapped = if kind.is_credit_card() {
        map_credit_card_common(error)
    } else {
        generic(error)
    };
    AppError::with_status(status, mapped)
}

/// Map a PIMS resume or validate-PICV failure. Direct-debit `InvalidAmount`
/// gets its PICV challenge attached by the caller.
pub fn map_resume_error(error: ServiceErrorResponse, kind: PaymentMethodKind) -> ServiceErrorResponse {
    match kind {
        PaymentMethodKind::Ach | PaymentMethodKind::Sepa => {
            if error.is("InvalidAmount") {
                field(error, messages::direct_debit::INVALID_AMOUNT, messages::direct_debit::TARGET_AMOUNT)
            } else {
                generic(error)
            }
        }
        PaymentMethodKind::UnionPayCredit | PaymentMethodKind::UnionPayDebit => map_cup_resume(error, kind),
        PaymentMethodKind::Alipay => {
            if error.is("InvalidChallengeCode") {
                field(error, alipay::INVALID_CHALLENGE_CODE, alipay::TARGET_SMS)
            } else if error.is("ChallengeCodeExpired") {
                field(error, alipay::CHALLENGE_CODE_EXPIRED, alipay::TARGET_SMS)
            } else {
                generic(error)
            }
        }
        PaymentMethodKind::NonSim => {
            if error.is("InvalidChallengeCode") {
                field(error, non_sim::INVALID_CHALLENGE_CODE, non_sim::TARGET_SMS)
            } else {
                generic(error)
            }
        }
        _ => generic(error),
    }
}

fn map_cup_resume(error: ServiceErrorResponse, kind: PaymentMethodKind) -> ServiceErrorResponse {
    if error.is("ValidationFailed") || error.is("InvalidCvv") {
        return if kind == PaymentMethodKind::UnionPayCredit {
            error.into_field_error(cup::INVALID_PHONE_OR_CVV, "cvvToken,phone")
        } else {
            field(error, cup::INVALID_PHONE_NUMBER, cup::TARGET_PHONE)
        };
    }
    if error.is("InvalidChallengeCode") {
        return field(error, cup::INVALID_SMS_CODE, cup::TARGET_SMS);
    }
    if error.is("ChallengeCodeExpired") {
        return field(error, cup::SMS_CODE_EXPIRED, cup::TARGET_SMS);
    }
    if error.is("TooManyOperations") {
        let mut error = error;
        error.message = cup::TOO_MANY_SMS_REQUESTS.to_string();
        return error;
    }
    generic(error)
}

/// Replace and remove: always the generic message, original status.
pub fn map_generic(status: u16, error: ServiceErrorResponse) -> AppError {
    AppError::with_status(status, generic(error))
}
