//! # PIDL Construction
//!
//! Builds the challenge, status-check and confirmation PIDLs carried by
//! client actions. Display-hint ids are part of the client contract: the
//! PIDL SDK and partner test suites look hints up by id, so the ids here
//! must stay stable.
//!
//! Action vocabulary:
//!
//! | type          | context                                  |
//! |---------------|------------------------------------------|
//! | `redirect`    | `{ baseUrl }`                            |
//! | `poll`        | `{ href, method: "GET" }`                |
//! | `submit`      | `{ href, method: "POST", payload? }`     |
//! | `success`     | none                                     |
//! | `closeModalDialog` | none                                |

use px_core::pidl::qr_code_source;
use px_core::{messages, ClientAction, DisplayHint, PaymentInstrument, PidlAction, PidlResource};
use serde_json::{json, Value};
use url::form_urlencoded;

pub const DESCRIPTION_CHALLENGE: &str = "challenge";
pub const DESCRIPTION_STATIC: &str = "staticPidl";
pub const DESCRIPTION_ADDRESS: &str = "address";
pub const DESCRIPTION_REDEEM: &str = "redeem";
pub const DESCRIPTION_PAYMENT_METHOD: &str = "paymentMethod";

/// QR-code challenge flavors, used as the PIDL id and display-hint prefix.
pub mod qr_code {
    pub const PAYPAL: &str = "paypalQrCode";
    pub const VENMO: &str = "venmoQrCode";
    pub const GENERIC: &str = "genericQrCode";
    pub const ALIPAY: &str = "alipayQrCode";
    pub const THREE_DS_ONE: &str = "threeDSOneQrCode";
    pub const XBOX_CO_BRANDED_CARD: &str = "xboxCoBrandedCard";
}

/// Static page ids.
pub mod static_pidl {
    pub const PAYPAL_REDIRECT: &str = "paypalRedirectStatic";
    pub const PAYPAL_RETRY: &str = "paypalRetryStatic";
    pub const GENERIC_REDIRECT: &str = "genericRedirectStatic";
    pub const GENERIC_POLLING: &str = "genericPollingStatic";
    pub const SEPA_PICV: &str = "sepaPicvStatic";
    pub const ACH_PICV: &str = "achPicvStatic";
}

/// Request coordinates used to build the poll and submit URLs embedded in
/// PIDL actions.
#[derive(Debug, Clone, Copy)]
pub struct PidlLinks<'a> {
    pub base_url: &'a str,
    pub account_id: &'a str,
    pub partner: &'a str,
    pub language: &'a str,
    pub country: &'a str,
}

impl PidlLinks<'_> {
    fn url(&self, path: &str, extra: &[(&str, &str)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("partner", self.partner);
        query.append_pair("language", self.language);
        if !self.country.is_empty() {
            query.append_pair("country", self.country);
        }
        for (k, v) in extra {
            query.append_pair(k, v);
        }
        format!("{}/v7.0/{path}?{}", self.base_url, query.finish())
    }

    /// `GET` URL of one PI.
    pub fn instrument(&self, piid: &str) -> String {
        self.url(&format!("{}/paymentInstrumentsEx/{piid}", self.account_id), &[])
    }

    /// `GET` URL of one PI that polls its 3DS session.
    pub fn session_status(&self, piid: &str, session_query_url: &str) -> String {
        self.url(
            &format!("{}/paymentInstrumentsEx/{piid}", self.account_id),
            &[
                ("sessionQueryUrl", session_query_url),
                ("scenario", "threedsonepolling"),
            ],
        )
    }

    pub fn resume(&self, piid: &str) -> String {
        self.url(&format!("{}/paymentInstrumentsEx/{piid}/resume", self.account_id), &[])
    }

    pub fn add(&self) -> String {
        self.url(&format!("{}/paymentInstrumentsEx", self.account_id), &[])
    }

    pub fn addresses(&self) -> String {
        self.url(&format!("{}/addresses", self.account_id), &[])
    }

    pub fn challenge_status(&self, session_id: &str) -> String {
        self.url(&format!("challenge/{session_id}/status"), &[])
    }
}

fn redirect_action(url: &str) -> PidlAction {
    PidlAction::new("redirect").with_context(json!({ "baseUrl": url }))
}

fn poll_action(href: String) -> PidlAction {
    PidlAction::new("poll").with_context(json!({ "href": href, "method": "GET" }))
}

fn submit_action(href: String, payload: Option<Value>) -> PidlAction {
    let mut context = json!({ "href": href, "method": "POST" });
    if let Some(payload) = payload {
        context["payload"] = payload;
    }
    PidlAction::new("submit").with_context(context).default_action()
}

/// Inserts the QR image of `url` at `at`. A URL too long to encode leaves
/// the page with its text and button only.
fn with_qr_image(mut members: Vec<DisplayHint>, at: usize, id: String, url: &str) -> Vec<DisplayHint> {
    match qr_code_source(url) {
        Ok(source) => members.insert(at, DisplayHint::image(id, source)),
        Err(err) => tracing::warn!(error = %err, "QR image omitted"),
    }
    members
}

fn pi_resource(id: &str, pi: &PaymentInstrument) -> PidlResource {
    PidlResource::new(DESCRIPTION_CHALLENGE, id)
        .with_identity("resource_id", pi.id.as_str())
        .with_data_property("piid", json!({ "propertyType": "clientData", "defaultValue": pi.id }))
}

/// QR-code challenge: a first page with the code, the plain URL and a
/// button that opens it, then a second page whose button polls the PI.
pub fn qr_code_challenge(
    links: &PidlLinks<'_>,
    prefix: &str,
    pi: &PaymentInstrument,
    redirect_url: &str,
) -> PidlResource {
    pi_resource(prefix, pi).with_pages(vec![
        DisplayHint::page(
            format!("{prefix}ChallengePage"),
            with_qr_image(
                vec![
                    DisplayHint::text(format!("{prefix}Heading"), "Scan the code to continue"),
                    DisplayHint::text(format!("{prefix}URLText"), redirect_url),
                    DisplayHint::button(
                        format!("{prefix}RedirectButton"),
                        "Open in browser",
                        redirect_action(redirect_url),
                    ),
                ],
                1,
                format!("{prefix}Image"),
                redirect_url,
            ),
        ),
        DisplayHint::page(
            format!("{prefix}ChallengePage2"),
            vec![
                DisplayHint::text(format!("{prefix}WaitingText"), "Finish in your browser, then continue here."),
                DisplayHint::button(
                    format!("{prefix}PollButton"),
                    "Continue",
                    poll_action(links.instrument(&pi.id)).default_action(),
                ),
            ],
        ),
    ])
}

/// SMS code entry for Non-SIM, China UnionPay and Alipay.
pub fn sms_challenge(links: &PidlLinks<'_>, pi: &PaymentInstrument) -> PidlResource {
    pi_resource("smsChallenge", pi)
        .with_pages(vec![DisplayHint::page(
            "smsChallengePage",
            vec![
                DisplayHint::text("smsChallengeText", "Enter the code we sent to your phone."),
                DisplayHint::property("smsCode", "pin"),
                DisplayHint::button(
                    "verifyCodeButton",
                    "Verify",
                    submit_action(links.resume(&pi.id), None),
                ),
            ],
        )])
        .with_data_property("pin", json!({ "propertyType": "userData", "isOptional": false }))
}

/// 3DS inside an iframe, followed by a status check.
pub fn iframe_challenge(links: &PidlLinks<'_>, pi: &PaymentInstrument, url: &str) -> PidlResource {
    let session = pi.details.session_query_url.as_deref().unwrap_or_default();
    pi_resource("cc3DSIframe", pi).with_pages(vec![
        DisplayHint::page("IFramePage", vec![DisplayHint::iframe("threeDSIframe", url)]),
        status_check_page(links, &pi.id, session),
    ])
}

fn status_check_page(links: &PidlLinks<'_>, piid: &str, session_query_url: &str) -> DisplayHint {
    let poll = if session_query_url.is_empty() {
        links.instrument(piid)
    } else {
        links.session_status(piid, session_query_url)
    };
    DisplayHint::page(
        "cc3DSStatusCheckPage",
        vec![
            DisplayHint::text("cc3DSStatusCheckText", "Did you finish verifying with your bank?"),
            DisplayHint::button("cc3DSYesButton", "Yes, continue", poll_action(poll).default_action()),
        ],
    )
}

/// 3DS for Indian cards on add: send the user to the bank, then poll.
pub fn three_ds_redirect_and_status_check(
    links: &PidlLinks<'_>,
    pi: &PaymentInstrument,
    url: &str,
) -> PidlResource {
    let session = pi.details.session_query_url.as_deref().unwrap_or_default();
    let mut status_page = status_check_page(links, &pi.id, session);
    if let DisplayHint::Page { members, .. } = &mut status_page {
        members.push(DisplayHint::button("cc3DSRetryButton", "Try again", redirect_action(url)));
    }
    pi_resource("cc3DSRedirectAndStatusCheck", pi).with_pages(vec![
        DisplayHint::page(
            "cc3DSRedirectPage",
            vec![
                DisplayHint::text("cc3DSRedirectText", "Your bank needs to verify this card."),
                DisplayHint::button("goToBankButton", "Go to your bank", redirect_action(url)),
            ],
        ),
        status_page,
    ])
}

/// 3DS status check on get, polling `session_query_url`.
pub fn three_ds_status_check(
    links: &PidlLinks<'_>,
    pi: &PaymentInstrument,
    session_query_url: &str,
) -> PidlResource {
    pi_resource("cc3DSStatusCheck", pi)
        .with_pages(vec![status_check_page(links, &pi.id, session_query_url)])
}

/// Shown in the original tab while the user completes a redirect elsewhere.
pub fn redirect_static(links: &PidlLinks<'_>, id: &str, pi: &PaymentInstrument, url: &str) -> PidlResource {
    PidlResource::new(DESCRIPTION_STATIC, id)
        .with_identity("resource_id", pi.id.as_str())
        .with_pages(vec![DisplayHint::page(
            format!("{id}Page"),
            vec![
                DisplayHint::text(format!("{id}Text"), "Continue in the new window."),
                DisplayHint::button(format!("{id}RedirectButton"), "Open again", redirect_action(url)),
                DisplayHint::button(
                    format!("{id}YesButton"),
                    "I'm done",
                    poll_action(links.instrument(&pi.id)).default_action(),
                ),
            ],
        )])
}

/// Shown on get while a redirect PI is still pending.
pub fn retry_static(links: &PidlLinks<'_>, id: &str, pi: &PaymentInstrument) -> PidlResource {
    PidlResource::new(DESCRIPTION_STATIC, id)
        .with_identity("resource_id", pi.id.as_str())
        .with_pages(vec![DisplayHint::page(
            format!("{id}Page"),
            vec![
                DisplayHint::text(format!("{id}Text"), "We're still waiting for confirmation."),
                DisplayHint::button(
                    format!("{id}RetryButton"),
                    "Try again",
                    poll_action(links.instrument(&pi.id)).default_action(),
                ),
            ],
        )])
}

/// Micro-deposit amount entry. `scheme` is `ach` or `sepa`.
pub fn picv_challenge(
    links: &PidlLinks<'_>,
    scheme: &str,
    pi: &PaymentInstrument,
    remaining_attempts: Option<u32>,
) -> PidlResource {
    let id = format!("{scheme}PicvChallenge");
    let mut members = vec![
        DisplayHint::text(format!("{id}Text"), "Enter the amount we deposited in your account."),
        DisplayHint::property("picvAmount", "amount"),
    ];
    if let Some(remaining) = remaining_attempts {
        members.push(DisplayHint::text(
            "remainingAttemptsText",
            format!("{remaining} attempts remaining"),
        ));
    }
    members.push(DisplayHint::button(
        "verifyPicvButton",
        "Verify",
        submit_action(links.resume(&pi.id), None),
    ));

    pi_resource(&id, pi)
        .with_pages(vec![DisplayHint::page(format!("{id}Page"), members)])
        .with_data_property("amount", json!({ "propertyType": "userData", "isOptional": false }))
}

/// ACH added: tell the user to wait for the micro-deposits.
pub fn ach_picv_static(pi: &PaymentInstrument) -> PidlResource {
    PidlResource::new(DESCRIPTION_STATIC, static_pidl::ACH_PICV)
        .with_identity("resource_id", pi.id.as_str())
        .with_pages(vec![DisplayHint::page(
            "achPicvStaticPage",
            vec![
                DisplayHint::text(
                    "achPicvStaticText",
                    "We'll make two small deposits to your account in the next few days.",
                ),
                DisplayHint::button("okButton", "OK", PidlAction::new("success").default_action()),
            ],
        )])
}

/// Secondary billing-address form for accounts with no default address.
pub fn billing_address(links: &PidlLinks<'_>) -> PidlResource {
    let fields = ["address_line1", "address_line2", "city", "region", "postal_code", "country"];
    let mut members: Vec<DisplayHint> = fields
        .iter()
        .map(|f| DisplayHint::property(format!("{f}Property"), *f))
        .collect();
    members.push(DisplayHint::button(
        "saveButton",
        "Save",
        submit_action(links.addresses(), None),
    ));

    let mut pidl = PidlResource::new(DESCRIPTION_ADDRESS, "billing")
        .with_identity("country", links.country)
        .with_pages(vec![DisplayHint::page("billingAddressPage", members)]);
    for f in fields {
        let optional = f == "address_line2";
        pidl = pidl.with_data_property(f, json!({ "propertyType": "userData", "isOptional": optional }));
    }
    pidl.with_data_property(
        "country",
        json!({ "propertyType": "userData", "isOptional": false, "defaultValue": links.country }),
    )
}

/// Remove refused because subscriptions still use the PI.
pub fn subscription_message() -> PidlResource {
    PidlResource::new(DESCRIPTION_STATIC, "deletionSubscriptionError").with_pages(vec![
        DisplayHint::page(
            "deletionSubscriptionErrorPage",
            vec![
                DisplayHint::text("deletionSubscriptionErrorText", messages::SUBSCRIPTION_NOT_CANCELED),
                DisplayHint::button("okButton", "OK", PidlAction::new("closeModalDialog").default_action()),
            ],
        ),
    ])
}

/// Confirm page for a valid CSV token. Submitting posts the token back with
/// `actionType=redeem`.
pub fn confirm_redeem(links: &PidlLinks<'_>, token: &str, amount_text: &str) -> PidlResource {
    PidlResource::new(DESCRIPTION_REDEEM, "csvToken")
        .with_pages(vec![DisplayHint::page(
            "confirmRedeemPage",
            vec![
                DisplayHint::text("redeemAmountText", format!("{amount_text} will be added to your account.")),
                DisplayHint::text("redeemTokenText", token.to_uppercase()),
                DisplayHint::button(
                    "redeemSubmitButton",
                    "Redeem",
                    submit_action(
                        links.add(),
                        Some(json!({
                            "paymentMethodFamily": "ewallet",
                            "paymentMethodType": "stored_value",
                            "tokenIdentifierValue": token,
                            "actionType": "redeem",
                        })),
                    ),
                ),
            ],
        )])
        .with_data_property("paymentMethodFamily", json!({ "propertyType": "clientData", "defaultValue": "ewallet" }))
        .with_data_property("paymentMethodType", json!({ "propertyType": "clientData", "defaultValue": "stored_value" }))
        .with_data_property("tokenIdentifierValue", json!({ "propertyType": "clientData", "defaultValue": token }))
        .with_data_property("actionType", json!({ "propertyType": "clientData", "defaultValue": "redeem" }))
}

/// BitPay funding: one button that opens the payment page.
pub fn fund_redirect(url: &str) -> PidlResource {
    PidlResource::new(DESCRIPTION_STATIC, "bitpayRedirect").with_pages(vec![DisplayHint::page(
        "bitpayRedirectPage",
        vec![
            DisplayHint::text("bitpayRedirectText", "Continue to BitPay to add funds."),
            DisplayHint::button("bitpayRedirectButton", "Continue", redirect_action(url).default_action()),
        ],
    )])
}

/// Issuer application hand-off.
pub fn redirect_pidl(url: &str) -> PidlResource {
    PidlResource::new(DESCRIPTION_STATIC, "cobrandedCardRedirect").with_pages(vec![DisplayHint::page(
        "cobrandedCardRedirectPage",
        vec![
            DisplayHint::text("cobrandedCardRedirectText", "Continue to apply for the card."),
            DisplayHint::button("cobrandedCardRedirectButton", "Continue", redirect_action(url).default_action()),
        ],
    )])
}

/// Issuer application for consoles: QR code of the application URL.
pub fn co_branded_card_qr_code(url: &str, session_id: &str) -> PidlResource {
    let prefix = qr_code::XBOX_CO_BRANDED_CARD;
    PidlResource::new(DESCRIPTION_CHALLENGE, prefix)
        .with_identity("session_id", session_id)
        .with_pages(vec![DisplayHint::page(
            format!("{prefix}ChallengePage"),
            with_qr_image(vec![DisplayHint::text(format!("{prefix}URLText"), url)], 0, format!("{prefix}Image"), url),
        )])
}

/// Fraud challenge shown before a card add.
pub fn px_challenge(links: &PidlLinks<'_>, session_id: &str) -> PidlResource {
    PidlResource::new(DESCRIPTION_CHALLENGE, "pxChallenge")
        .with_identity("session_id", session_id)
        .with_pages(vec![DisplayHint::page(
            "pxChallengePage",
            vec![
                DisplayHint::Iframe {
                    display_id: "pxChallengeIframe".to_string(),
                    source_url: None,
                    display_content: Some(session_id.to_string()),
                },
                DisplayHint::button(
                    "pxChallengeContinueButton",
                    "Continue",
                    poll_action(links.challenge_status(session_id)).default_action(),
                ),
            ],
        )])
        .with_data_property(
            "pxChallengeSessionId",
            json!({ "propertyType": "clientData", "defaultValue": session_id }),
        )
}

/// A resource whose only content is a client action, the response shape of
/// flows that answer with an action instead of a PI.
pub fn client_action_resource(action: ClientAction) -> PidlResource {
    PidlResource {
        client_action: serde_json::to_value(action).ok(),
        ..Default::default()
    }
}

/// Select-instance PIDL returned with the PI list.
pub fn select_instance(pis: &[PaymentInstrument], partner: &str, language: &str, country: &str) -> PidlResource {
    let options: Vec<Value> = pis
        .iter()
        .map(|pi| {
            json!({
                "id": pi.id,
                "family": pi.family(),
                "type": pi.method_type(),
                "status": pi.status.as_str(),
            })
        })
        .collect();
    PidlResource::new(DESCRIPTION_PAYMENT_METHOD, "selectinstance")
        .with_identity("partner", partner)
        .with_identity("language", language)
        .with_identity("country", country)
        .with_pages(vec![DisplayHint::page(
            "paymentInstrumentSelectPage",
            vec![DisplayHint::property("paymentInstrumentSelect", "id")],
        )])
        .with_data_property(
            "id",
            json!({ "propertyType": "userData", "possibleValues": options }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use px_core::PaymentMethod;

    fn links() -> PidlLinks<'static> {
        PidlLinks {
            base_url: "https://pidl.test",
            account_id: "Account001",
            partner: "webblends",
            language: "en-US",
            country: "us",
        }
    }

    fn pi(id: &str) -> PaymentInstrument {
        PaymentInstrument {
            id: id.to_string(),
            payment_method: PaymentMethod::new("ewallet", "paypal"),
            ..Default::default()
        }
    }

    fn action_context<'a>(pidl: &'a PidlResource, id: &str) -> &'a Value {
        match pidl.find_display_hint(id) {
            Some(DisplayHint::Button { pidl_action: Some(action), .. }) => action.context.as_ref().unwrap(),
            other => panic!("no button {id}: {other:?}"),
        }
    }

    #[test]
    fn links_carry_partner_context() {
        let url = links().instrument("pi-1");
        assert_eq!(
            url,
            "https://pidl.test/v7.0/Account001/paymentInstrumentsEx/pi-1?partner=webblends&language=en-US&country=us"
        );
        let polling = links().session_status("pi-1", "sessions/abc");
        assert!(polling.contains("sessionQueryUrl=sessions%2Fabc"));
        assert!(polling.contains("scenario=threedsonepolling"));
    }

    #[test]
    fn qr_code_pages_and_ids() {
        let pidl = qr_code_challenge(&links(), qr_code::PAYPAL, &pi("pi-1"), "https://pay.example/r/1");
        assert_eq!(pidl.identity_value("id"), Some("paypalQrCode"));
        assert_eq!(pidl.display_description.as_ref().unwrap().len(), 2);
        match pidl.find_display_hint("paypalQrCodeImage") {
            Some(DisplayHint::Image { source_url, .. }) => {
                assert_eq!(source_url, &qr_code_source("https://pay.example/r/1").unwrap())
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            action_context(&pidl, "paypalQrCodeRedirectButton")["baseUrl"],
            "https://pay.example/r/1"
        );
        assert!(action_context(&pidl, "paypalQrCodePollButton")["href"]
            .as_str()
            .unwrap()
            .contains("/paymentInstrumentsEx/pi-1"));
    }

    #[test]
    fn oversized_qr_url_keeps_text_and_button() {
        let url = format!("https://pay.example/{}", "r".repeat(8000));
        let pidl = qr_code_challenge(&links(), qr_code::PAYPAL, &pi("pi-1"), &url);
        assert!(pidl.find_display_hint("paypalQrCodeImage").is_none());
        assert!(pidl.find_display_hint("paypalQrCodeURLText").is_some());
        assert!(pidl.find_display_hint("paypalQrCodeRedirectButton").is_some());
    }

    #[test]
    fn three_ds_status_check_polls_session() {
        let pidl = three_ds_status_check(&links(), &pi("pi-3"), "sessions/s-1");
        let href = action_context(&pidl, "cc3DSYesButton")["href"].as_str().unwrap().to_string();
        assert!(href.contains("sessionQueryUrl=sessions%2Fs-1"));
    }

    #[test]
    fn redirect_and_status_check_has_both_pages() {
        let pidl = three_ds_redirect_and_status_check(&links(), &pi("pi-2"), "https://bank.example/3ds");
        assert!(pidl.find_display_hint("goToBankButton").is_some());
        assert!(pidl.find_display_hint("cc3DSYesButton").is_some());
        assert!(pidl.find_display_hint("cc3DSRetryButton").is_some());
    }

    #[test]
    fn picv_challenge_shows_remaining_attempts() {
        let pidl = picv_challenge(&links(), "sepa", &pi("pi-4"), Some(2));
        assert_eq!(pidl.identity_value("id"), Some("sepaPicvChallenge"));
        match pidl.find_display_hint("remainingAttemptsText") {
            Some(DisplayHint::Text { display_content, .. }) => assert!(display_content.starts_with('2')),
            other => panic!("unexpected {other:?}"),
        }
        assert!(pidl.data_description.as_ref().unwrap().contains_key("amount"));
    }

    #[test]
    fn confirm_redeem_upper_cases_token() {
        let pidl = confirm_redeem(&links(), "abcde-fghij", "$25.00");
        match pidl.find_display_hint("redeemTokenText") {
            Some(DisplayHint::Text { display_content, .. }) => assert_eq!(display_content, "ABCDE-FGHIJ"),
            other => panic!("unexpected {other:?}"),
        }
        let data = pidl.data_description.as_ref().unwrap();
        assert_eq!(data["actionType"]["defaultValue"], "redeem");
        assert_eq!(data["tokenIdentifierValue"]["defaultValue"], "abcde-fghij");
        let submit = action_context(&pidl, "redeemSubmitButton");
        assert_eq!(submit["method"], "POST");
        assert_eq!(submit["payload"]["actionType"], "redeem");
    }

    #[test]
    fn subscription_message_has_ok_button() {
        let pidl = subscription_message();
        match pidl.find_display_hint("deletionSubscriptionErrorText") {
            Some(DisplayHint::Text { display_content, .. }) => {
                assert_eq!(display_content, messages::SUBSCRIPTION_NOT_CANCELED)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(pidl.find_display_hint("okButton").is_some());
    }

    #[test]
    fn billing_address_defaults_country() {
        let pidl = billing_address(&links());
        assert_eq!(pidl.identity_value("description_type"), Some(DESCRIPTION_ADDRESS));
        assert_eq!(pidl.data_description.unwrap()["country"]["defaultValue"], "us");
    }

    #[test]
    fn select_instance_lists_every_pi() {
        let pidl = select_instance(&[pi("a"), pi("b")], "webblends", "en-US", "us");
        assert_eq!(pidl.identity_value("partner"), Some("webblends"));
        let data = pidl.data_description.unwrap();
        assert_eq!(data["id"]["possibleValues"].as_array().unwrap().len(), 2);
    }
}
