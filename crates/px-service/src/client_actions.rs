//! # Client Actions for PI State
//!
//! Decides what the caller must do next with a PI returned from PIMS: enter
//! an SMS code, scan a QR code, follow a redirect, confirm micro-deposits
//! or check a 3DS status. The decision depends on the payment family, the
//! PI status and `pendingOn`, the partner, the PSS redirection pattern and
//! whether the PI was just added or only read.

use axum::http::StatusCode;
use px_core::partner::{is_inline_partner, is_wallet_partner, is_xbox_native_partner, is_xbox_partner};
use px_core::{
    ClientAction, ClientActionType, ErrorCode, PaymentExperienceSetting, PaymentInstrument,
    PaymentInstrumentStatus, PaymentMethodKind, RedirectionPattern, ServiceErrorResponse,
};
use serde_json::{json, Value};

use crate::error::{AppError, SERVICE_NAME};
use crate::pidl_factory::{self as pidl, qr_code, static_pidl, PidlLinks};

pub const PENDING_ON_SMS: &str = "sms";
pub const PENDING_ON_NOTIFICATION: &str = "notification";
pub const PENDING_ON_PICV: &str = "picv";
pub const PENDING_ON_REDIRECT: &str = "redirect";

pub const SCENARIO_PAYPAL_QR_CODE: &str = "paypalQrCode";
pub const SCENARIO_VENMO_QR_CODE: &str = "venmoQrCode";
pub const SCENARIO_GENERIC_QR_CODE: &str = "genericQrCode";

const INDIA: &str = "in";
const PARTNER_CART: &str = "cart";
/// Partners that confirm SEPA micro-deposits outside the PIDL flow.
const SEPA_PICV_EXEMPT_PARTNERS: &[&str] = &["azure", "azuremanage"];

/// Which operation produced the PI. `Resume` carries no request type:
/// only the add and get branches of each family are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    AddPi,
    GetPi,
    Resume,
}

/// Request-level inputs to the client-action decision.
#[derive(Debug, Clone, Copy)]
pub struct ClientActionContext<'a> {
    pub links: PidlLinks<'a>,
    pub partner: &'a str,
    pub country: &'a str,
    pub scenario: Option<&'a str>,
    pub setting: Option<&'a PaymentExperienceSetting>,
    pub request_type: RequestType,
}

impl ClientActionContext<'_> {
    fn has_scenario(&self, scenario: &str) -> bool {
        self.scenario
            .map(|s| s.split(',').any(|s| s.trim().eq_ignore_ascii_case(scenario)))
            .unwrap_or(false)
    }

    fn is_add(&self) -> bool {
        self.request_type == RequestType::AddPi
    }

    fn is_get(&self) -> bool {
        self.request_type == RequestType::GetPi
    }

    fn redirection_pattern(&self) -> Option<RedirectionPattern> {
        self.setting.and_then(|s| s.redirection_pattern)
    }
}

fn integration_error(code: &str, message: String) -> AppError {
    AppError::downstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        ServiceErrorResponse::new(code, message).with_source(SERVICE_NAME),
    )
}

fn unexpected_pending_on(pi: &PaymentInstrument) -> AppError {
    integration_error(
        ErrorCode::ServiceError.as_str(),
        format!(
            "PI {} of type {} is pending on unsupported value {:?}",
            pi.id,
            pi.method_type(),
            pi.details.pending_on
        ),
    )
}

fn pending_on(pi: &PaymentInstrument) -> &str {
    pi.details.pending_on.as_deref().unwrap_or_default()
}

/// Redirect context carrying the PI coordinates the redirection service
/// needs to resume the flow.
fn redirection_link(pi: &PaymentInstrument, url: &str) -> Value {
    json!({
        "baseUrl": url,
        "ruParameters": {
            "id": pi.id,
            "family": pi.family(),
            "type": pi.method_type(),
            "pendingOn": pi.details.pending_on,
            "picvRequired": pi.details.picv_required.unwrap_or(false),
        }
    })
}

fn redirect(context: Value) -> ClientAction {
    ClientAction {
        context: Some(context),
        ..ClientAction::new(ClientActionType::Redirect)
    }
}

/// Attach the client action for `pi`'s state, replacing any previous one.
pub fn add_client_action(
    pi: &mut PaymentInstrument,
    ctx: &ClientActionContext<'_>,
) -> Result<(), AppError> {
    pi.client_action = client_action_for(pi, ctx)?;
    Ok(())
}

pub fn client_action_for(
    pi: &PaymentInstrument,
    ctx: &ClientActionContext<'_>,
) -> Result<Option<ClientAction>, AppError> {
    let kind = pi.kind();
    let sepa = kind == PaymentMethodKind::Sepa;

    if is_wallet_partner(ctx.partner) || (!pi.is_pending() && !sepa) {
        return Ok(None);
    }
    if sepa && pi.status == PaymentInstrumentStatus::Active && pi.details.picv_details.is_none() {
        return Ok(None);
    }

    if ctx.is_add() {
        if let (Some(pattern), Some(url)) = (ctx.redirection_pattern(), pi.details.redirect_url.as_deref()) {
            if is_pattern_redirect_pi(pi, ctx) && pi.is_pending() {
                return Ok(Some(pattern_action(pi, ctx, pattern, url)));
            }
        }
    }

    match kind {
        PaymentMethodKind::NonSim
        | PaymentMethodKind::UnionPayCredit
        | PaymentMethodKind::UnionPayDebit
        | PaymentMethodKind::Alipay => sms_or_notification(pi, ctx).map(Some),
        PaymentMethodKind::PayPal => Ok(paypal(pi, ctx)),
        PaymentMethodKind::GenericRedirect => Ok(generic_redirect(pi, ctx)),
        PaymentMethodKind::Ach => ach(pi, ctx),
        PaymentMethodKind::Sepa => sepa_action(pi, ctx),
        PaymentMethodKind::CreditCard if is_india_three_ds(pi, ctx) => Ok(Some(india_three_ds(pi, ctx))),
        _ => Ok(None),
    }
}

fn is_india_three_ds(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> bool {
    ctx.country.eq_ignore_ascii_case(INDIA)
        && (pi.details.redirect_url.is_some() || pi.details.session_query_url.is_some())
}

/// PIs whose presentation follows the PSS redirection pattern.
fn is_pattern_redirect_pi(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> bool {
    match pi.kind() {
        PaymentMethodKind::PayPal | PaymentMethodKind::GenericRedirect | PaymentMethodKind::Sepa => true,
        PaymentMethodKind::CreditCard => is_india_three_ds(pi, ctx),
        _ => false,
    }
}

fn qr_code_prefix(pi: &PaymentInstrument) -> &'static str {
    match pi.kind() {
        PaymentMethodKind::PayPal => qr_code::PAYPAL,
        PaymentMethodKind::CreditCard => qr_code::THREE_DS_ONE,
        _ if pi.method_type().eq_ignore_ascii_case("venmo") => qr_code::VENMO,
        _ => qr_code::GENERIC,
    }
}

fn redirect_static_id(pi: &PaymentInstrument) -> &'static str {
    match pi.kind() {
        PaymentMethodKind::PayPal => static_pidl::PAYPAL_REDIRECT,
        PaymentMethodKind::Sepa => static_pidl::SEPA_PICV,
        _ => static_pidl::GENERIC_REDIRECT,
    }
}

fn redirect_context(pi: &PaymentInstrument, url: &str) -> Value {
    match pi.kind() {
        PaymentMethodKind::GenericRedirect => Value::String(url.to_string()),
        _ => redirection_link(pi, url),
    }
}

fn pattern_action(
    pi: &PaymentInstrument,
    ctx: &ClientActionContext<'_>,
    pattern: RedirectionPattern,
    url: &str,
) -> ClientAction {
    match pattern {
        RedirectionPattern::QrCode => {
            ClientAction::pidl(vec![pidl::qr_code_challenge(&ctx.links, qr_code_prefix(pi), pi, url)])
        }
        RedirectionPattern::IFrame => ClientAction::pidl(vec![pidl::iframe_challenge(&ctx.links, pi, url)]),
        RedirectionPattern::Inline => redirect(redirect_context(pi, url)),
        RedirectionPattern::FullPage => redirect(redirect_context(pi, url)).with_redirect_pidl(vec![
            pidl::redirect_static(&ctx.links, redirect_static_id(pi), pi, url),
        ]),
    }
}

/// Redirect, with a status page for partners that keep the original window.
fn redirect_with_status_page(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>, url: &str) -> ClientAction {
    let action = redirect(redirect_context(pi, url));
    if is_inline_partner(ctx.partner) {
        action
    } else {
        action.with_redirect_pidl(vec![pidl::redirect_static(&ctx.links, redirect_static_id(pi), pi, url)])
    }
}

fn sms_or_notification(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> Result<ClientAction, AppError> {
    let pending_on = pending_on(pi);
    if pending_on.eq_ignore_ascii_case(PENDING_ON_SMS) {
        return Ok(ClientAction::pidl(vec![pidl::sms_challenge(&ctx.links, pi)]));
    }
    if pi.kind() == PaymentMethodKind::Alipay && pending_on.eq_ignore_ascii_case(PENDING_ON_NOTIFICATION) {
        let url = pi.details.redirect_url.as_deref().unwrap_or_default();
        return Ok(ClientAction::pidl(vec![pidl::qr_code_challenge(
            &ctx.links,
            qr_code::ALIPAY,
            pi,
            url,
        )]));
    }
    Err(unexpected_pending_on(pi))
}

fn paypal(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> Option<ClientAction> {
    if ctx.is_get() {
        return Some(ClientAction::pidl(vec![pidl::retry_static(
            &ctx.links,
            static_pidl::PAYPAL_RETRY,
            pi,
        )]));
    }
    let url = pi.details.redirect_url.as_deref()?;
    if ctx.has_scenario(SCENARIO_PAYPAL_QR_CODE) || is_xbox_native_partner(ctx.partner) {
        return Some(ClientAction::pidl(vec![pidl::qr_code_challenge(
            &ctx.links,
            qr_code::PAYPAL,
            pi,
            url,
        )]));
    }
    Some(redirect_with_status_page(pi, ctx, url))
}

fn generic_redirect(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> Option<ClientAction> {
    if ctx.is_get() {
        return Some(ClientAction::pidl(vec![pidl::retry_static(
            &ctx.links,
            static_pidl::GENERIC_POLLING,
            pi,
        )]));
    }
    if !ctx.is_add() {
        return None;
    }
    let url = pi.details.redirect_url.as_deref()?;
    let qr = ctx.has_scenario(SCENARIO_GENERIC_QR_CODE)
        || ctx.has_scenario(SCENARIO_VENMO_QR_CODE)
        || is_xbox_native_partner(ctx.partner);
    if qr {
        return Some(ClientAction::pidl(vec![pidl::qr_code_challenge(
            &ctx.links,
            qr_code_prefix(pi),
            pi,
            url,
        )]));
    }
    Some(redirect_with_status_page(pi, ctx, url))
}

fn ach(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> Result<Option<ClientAction>, AppError> {
    if !pending_on(pi).eq_ignore_ascii_case(PENDING_ON_PICV) {
        return Err(unexpected_pending_on(pi));
    }
    match ctx.request_type {
        RequestType::GetPi => {
            let remaining = pi.details.picv_details.as_ref().and_then(|d| d.remaining_attempts);
            Ok(Some(ClientAction::pidl(vec![pidl::picv_challenge(
                &ctx.links, "ach", pi, remaining,
            )])))
        }
        RequestType::AddPi if ctx.partner.eq_ignore_ascii_case(PARTNER_CART) => Ok(None),
        RequestType::AddPi => Ok(Some(ClientAction::pidl(vec![pidl::ach_picv_static(pi)]))),
        RequestType::Resume => Err(integration_error(
            ErrorCode::ServiceError.as_str(),
            format!("ACH PI {} is still pending on PICV after a resume", pi.id),
        )),
    }
}

fn sepa_action(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> Result<Option<ClientAction>, AppError> {
    if pi.is_pending() {
        return Ok(match pi.details.redirect_url.as_deref() {
            Some(url) if pending_on(pi).eq_ignore_ascii_case(PENDING_ON_REDIRECT) => {
                Some(redirect_with_status_page(pi, ctx, url))
            }
            _ => None,
        });
    }

    let exempt = SEPA_PICV_EXEMPT_PARTNERS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(ctx.partner));
    let in_progress = pi
        .details
        .picv_details
        .as_ref()
        .filter(|d| d.is_in_progress());
    match in_progress {
        Some(details) if pi.status == PaymentInstrumentStatus::Active && !exempt => {
            let Some(remaining) = details.remaining_attempts else {
                return Err(integration_error(
                    ErrorCode::InvalidPicvDetailsPayload.as_str(),
                    format!("PI {} has PICV in progress without remainingAttempts", pi.id),
                ));
            };
            Ok(Some(ClientAction::pidl(vec![pidl::picv_challenge(
                &ctx.links,
                "sepa",
                pi,
                Some(remaining),
            )])))
        }
        _ => Ok(None),
    }
}

fn india_three_ds(pi: &PaymentInstrument, ctx: &ClientActionContext<'_>) -> ClientAction {
    let url = pi.details.redirect_url.as_deref().unwrap_or_default();
    if is_inline_partner(ctx.partner) {
        return redirect(redirection_link(pi, url));
    }
    if ctx.is_get() {
        let session = pi.details.session_query_url.as_deref().unwrap_or_default();
        return ClientAction::pidl(vec![pidl::three_ds_status_check(&ctx.links, pi, session)]);
    }
    if !ctx.is_add() {
        return redirect(redirection_link(pi, url));
    }
    let pidl = if is_xbox_partner(ctx.partner) {
        pidl::qr_code_challenge(&ctx.links, qr_code::THREE_DS_ONE, pi, url)
    } else if pi.details.is_full_page_redirect == Some(false) {
        pidl::iframe_challenge(&ctx.links, pi, url)
    } else {
        pidl::three_ds_redirect_and_status_check(&ctx.links, pi, url)
    };
    ClientAction::pidl(vec![pidl])
}

#[cfg(test)]
mod tests {
    use super::*;
    use px_core::{PaymentMethod, PicvDetails};

    const LINKS: PidlLinks<'static> = PidlLinks {
        base_url: "https://pidl.test",
        account_id: "Account001",
        partner: "webblends",
        language: "en-US",
        country: "us",
    };

    fn ctx(partner: &'static str, request_type: RequestType) -> ClientActionContext<'static> {
        ClientActionContext {
            links: LINKS,
            partner,
            country: "us",
            scenario: None,
            setting: None,
            request_type,
        }
    }

    fn pi(family: &str, kind: &str, status: PaymentInstrumentStatus) -> PaymentInstrument {
        PaymentInstrument {
            id: "pi-1".into(),
            account_id: "Account001".into(),
            payment_method: PaymentMethod::new(family, kind),
            status,
            ..Default::default()
        }
    }

    fn pending(family: &str, kind: &str, pending_on: &str) -> PaymentInstrument {
        let mut pi = pi(family, kind, PaymentInstrumentStatus::Pending);
        pi.details.pending_on = Some(pending_on.into());
        pi
    }

    fn pidl_id(action: &ClientAction) -> String {
        let pidls = action.pidl_context().expect("pidl action");
        pidls[0].identity_value("id").unwrap().to_string()
    }

    #[test]
    fn active_card_and_wallet_partner_get_nothing() {
        let card = pi("credit_card", "visa", PaymentInstrumentStatus::Active);
        assert!(client_action_for(&card, &ctx("webblends", RequestType::AddPi)).unwrap().is_none());

        let mut paypal = pending("ewallet", "paypal", "redirect");
        paypal.details.redirect_url = Some("https://paypal.example/r".into());
        assert!(client_action_for(&paypal, &ctx("wallet", RequestType::AddPi)).unwrap().is_none());
    }

    #[test]
    fn paypal_add_redirects_with_status_page() {
        let mut paypal = pending("ewallet", "paypal", "redirect");
        paypal.details.redirect_url = Some("https://paypal.example/r".into());
        let action = client_action_for(&paypal, &ctx("webblends", RequestType::AddPi))
            .unwrap()
            .unwrap();
        assert_eq!(action.action_type, ClientActionType::Redirect);
        assert_eq!(action.context.as_ref().unwrap()["baseUrl"], "https://paypal.example/r");
        let redirect_pidl = action.redirect_pidl.unwrap();
        assert_eq!(redirect_pidl[0].identity_value("id"), Some(static_pidl::PAYPAL_REDIRECT));

        let inline = client_action_for(&paypal, &ctx("cart", RequestType::AddPi)).unwrap().unwrap();
        assert!(inline.redirect_pidl.is_none());
    }

    #[test]
    fn paypal_qr_code_scenario_and_get() {
        let mut paypal = pending("ewallet", "paypal", "redirect");
        paypal.details.redirect_url = Some("https://paypal.example/r".into());
        let mut c = ctx("webblends", RequestType::AddPi);
        c.scenario = Some("paypalQrCode");
        let action = client_action_for(&paypal, &c).unwrap().unwrap();
        assert_eq!(pidl_id(&action), qr_code::PAYPAL);

        let get = client_action_for(&paypal, &ctx("webblends", RequestType::GetPi)).unwrap().unwrap();
        assert_eq!(pidl_id(&get), static_pidl::PAYPAL_RETRY);
    }

    #[test]
    fn redirection_pattern_drives_add() {
        let mut venmo = pending("ewallet", "venmo", "redirect");
        venmo.details.redirect_url = Some("https://venmo.example/r".into());
        let setting = PaymentExperienceSetting {
            redirection_pattern: Some(RedirectionPattern::QrCode),
            ..Default::default()
        };
        let mut c = ctx("webblends", RequestType::AddPi);
        c.setting = Some(&setting);
        let action = client_action_for(&venmo, &c).unwrap().unwrap();
        assert_eq!(pidl_id(&action), qr_code::VENMO);
    }

    #[test]
    fn generic_redirect_uses_plain_url() {
        let mut psc = pending("online_bank_transfer", "paysafecard", "redirect");
        psc.details.redirect_url = Some("https://psc.example/r".into());
        let action = client_action_for(&psc, &ctx("webblends", RequestType::AddPi)).unwrap().unwrap();
        assert_eq!(action.context, Some(json!("https://psc.example/r")));
        let get = client_action_for(&psc, &ctx("webblends", RequestType::GetPi)).unwrap().unwrap();
        assert_eq!(pidl_id(&get), static_pidl::GENERIC_POLLING);
    }

    #[test]
    fn sms_families() {
        let nonsim = pending("mobile_billing_non_sim", "att", "sms");
        let action = client_action_for(&nonsim, &ctx("webblends", RequestType::AddPi)).unwrap().unwrap();
        assert_eq!(pidl_id(&action), "smsChallenge");

        let mut alipay = pending("ewallet", "alipay_billing_agreement", "notification");
        alipay.details.redirect_url = Some("https://alipay.example/qr".into());
        let action = client_action_for(&alipay, &ctx("webblends", RequestType::AddPi)).unwrap().unwrap();
        assert_eq!(pidl_id(&action), qr_code::ALIPAY);

        let cup = pending("credit_card", "unionpay_debitcard", "redirect");
        let err = client_action_for(&cup, &ctx("webblends", RequestType::AddPi)).unwrap_err();
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn ach_static_on_add_and_challenge_on_get() {
        let ach = pending("direct_debit", "ach", "picv");
        let add = client_action_for(&ach, &ctx("webblends", RequestType::AddPi)).unwrap().unwrap();
        assert_eq!(pidl_id(&add), static_pidl::ACH_PICV);
        assert!(client_action_for(&ach, &ctx("cart", RequestType::AddPi)).unwrap().is_none());
        let get = client_action_for(&ach, &ctx("webblends", RequestType::GetPi)).unwrap().unwrap();
        assert_eq!(pidl_id(&get), "achPicvChallenge");
    }

    #[test]
    fn resume_skips_add_and_get_branches() {
        let ach = pending("direct_debit", "ach", "picv");
        let err = client_action_for(&ach, &ctx("webblends", RequestType::Resume)).unwrap_err();
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);

        let mut paypal = pending("ewallet", "paypal", "redirect");
        paypal.details.redirect_url = Some("https://paypal.example/r".into());
        let action = client_action_for(&paypal, &ctx("webblends", RequestType::Resume))
            .unwrap()
            .unwrap();
        assert_eq!(action.action_type, ClientActionType::Redirect);

        let mut psc = pending("online_bank_transfer", "paysafecard", "redirect");
        psc.details.redirect_url = Some("https://psc.example/r".into());
        assert!(client_action_for(&psc, &ctx("webblends", RequestType::Resume)).unwrap().is_none());
    }

    #[test]
    fn sepa_picv_challenge_needs_remaining_attempts() {
        let mut sepa = pi("direct_debit", "sepa", PaymentInstrumentStatus::Active);
        assert!(client_action_for(&sepa, &ctx("webblends", RequestType::GetPi)).unwrap().is_none());

        sepa.details.picv_details = Some(PicvDetails {
            status: "inProgress".into(),
            remaining_attempts: Some(3),
        });
        let action = client_action_for(&sepa, &ctx("webblends", RequestType::GetPi)).unwrap().unwrap();
        assert_eq!(pidl_id(&action), "sepaPicvChallenge");
        assert!(client_action_for(&sepa, &ctx("azure", RequestType::GetPi)).unwrap().is_none());

        sepa.details.picv_details = Some(PicvDetails {
            status: "inProgress".into(),
            remaining_attempts: None,
        });
        let err = client_action_for(&sepa, &ctx("webblends", RequestType::GetPi)).unwrap_err();
        assert_eq!(err.status_and_code(), (StatusCode::INTERNAL_SERVER_ERROR, "InvalidPicvDetailsPayload"));
    }

    #[test]
    fn sepa_pending_redirect() {
        let mut sepa = pending("direct_debit", "sepa", "redirect");
        sepa.details.redirect_url = Some("https://bank.example/picv".into());
        let action = client_action_for(&sepa, &ctx("webblends", RequestType::AddPi)).unwrap().unwrap();
        assert_eq!(action.action_type, ClientActionType::Redirect);
        assert_eq!(action.context.as_ref().unwrap()["ruParameters"]["picvRequired"], false);

        sepa.details.picv_required = Some(true);
        let action = client_action_for(&sepa, &ctx("webblends", RequestType::AddPi)).unwrap().unwrap();
        assert_eq!(action.context.as_ref().unwrap()["ruParameters"]["picvRequired"], true);
        assert_eq!(
            action.redirect_pidl.unwrap()[0].identity_value("id"),
            Some(static_pidl::SEPA_PICV)
        );
    }

    #[test]
    fn india_cards_by_partner_and_request() {
        let mut card = pending("credit_card", "visa", "3ds");
        card.details.redirect_url = Some("https://bank.example/3ds".into());
        card.details.session_query_url = Some("sessions/s-1".into());

        let mut c = ctx("webblends", RequestType::AddPi);
        c.country = "in";
        let add = client_action_for(&card, &c).unwrap().unwrap();
        assert_eq!(pidl_id(&add), "cc3DSRedirectAndStatusCheck");

        c.partner = "xbox";
        assert_eq!(pidl_id(&client_action_for(&card, &c).unwrap().unwrap()), qr_code::THREE_DS_ONE);

        c.partner = "webblends";
        card.details.is_full_page_redirect = Some(false);
        assert_eq!(pidl_id(&client_action_for(&card, &c).unwrap().unwrap()), "cc3DSIframe");

        c.request_type = RequestType::GetPi;
        assert_eq!(pidl_id(&client_action_for(&card, &c).unwrap().unwrap()), "cc3DSStatusCheck");

        c.request_type = RequestType::Resume;
        let resumed = client_action_for(&card, &c).unwrap().unwrap();
        assert_eq!(resumed.action_type, ClientActionType::Redirect);

        c.request_type = RequestType::GetPi;
        c.partner = "azure";
        let inline = client_action_for(&card, &c).unwrap().unwrap();
        assert_eq!(inline.action_type, ClientActionType::Redirect);

        c.country = "us";
        c.partner = "webblends";
        assert!(client_action_for(&card, &c).unwrap().is_none());
    }
}
