// SPDX-License-Identifier: BUSL-1.1
//! Add flows: 3DS, mapped PIMS failures, the PX challenge, prerequisites
//! and the stored-value token flow.

mod common;

use axum::http::StatusCode;
use common::{hint_image, hint_text, pis, TestFixture};
use px_core::pidl::qr_code_source;
use serde_json::{json, Value};

fn csv_token(token: &str, action: &str) -> Value {
    json!({
        "paymentMethodFamily": "ewallet",
        "paymentMethodType": "stored_value",
        "tokenIdentifierValue": token,
        "actionType": action,
    })
}

fn card() -> Value {
    json!({
        "paymentMethodFamily": "credit_card",
        "paymentMethodType": "visa",
        "details": { "accountHolderName": "Test User" }
    })
}

#[tokio::test]
async fn india_three_ds_full_page_redirect() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=in"), card())
        .scenarios(&["px-service-3ds1-test-emulator"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["id"], "Account001-3ds1-Visa");
    assert_eq!(resp.first_pidl_id(), "cc3DSRedirectAndStatusCheck");
}

#[tokio::test]
async fn india_three_ds_iframe_when_not_full_page() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=in"), card())
        .scenarios(&["px-service-3ds1-show-iframe"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.first_pidl_id(), "cc3DSIframe");
}

#[tokio::test]
async fn india_three_ds_is_a_qr_code_on_consoles() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=xbox&country=in"), card())
        .header("x-ms-deviceinfo", r#"ipAddress="203.0.113.7",userAgent="Xbox/10.0""#)
        .scenarios(&["px-service-3ds1-test-emulator"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.first_pidl_id(), "threeDSOneQrCode");
    let pidl = resp.first_pidl();
    let url = hint_text(&pidl, "threeDSOneQrCodeURLText");
    assert_eq!(hint_image(&pidl, "threeDSOneQrCodeImage"), qr_code_source(url).unwrap());

    // Consoles always send risk data to PIMS.
    let adds = fx.emulators().pims().requests_matching("/Account001/paymentInstruments$");
    let body = adds.last().and_then(|r| r.body.clone()).unwrap();
    assert_eq!(body["riskData"]["ipAddress"], "203.0.113.7");
}

#[tokio::test]
async fn invalid_cvv_targets_the_cvv_field() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), card())
        .scenarios(&["px.pims.cc.add.invalidcvv"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);
    assert_eq!(resp.json["ErrorCode"], "InvalidCvv");
    assert_eq!(resp.json["Details"][0]["Target"], "cvvToken");
}

#[tokio::test]
async fn challenge_required_shows_the_px_challenge() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), card())
        .scenarios(&["px.pims.cc.add.challengerequired"])
        .flights("PXChallengeSwitch")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.first_pidl_id(), "pxChallenge");
    assert_eq!(
        fx.emulators()
            .service(px_emulators::EmulatedService::ChallengeManagement)
            .requests()
            .len(),
        1
    );
}

#[tokio::test]
async fn guest_challenge_required_is_a_generic_error() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), card())
        .header("x-ms-customer-type", "anonymous")
        .scenarios(&["px.pims.cc.add.challengerequired"])
        .flights("PXChallengeSwitch")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);
    assert_eq!(resp.json["ErrorCode"], "ChallengeRequired");
    assert_eq!(resp.json["Message"], px_core::messages::GENERIC);
    assert!(fx
        .emulators()
        .service(px_emulators::EmulatedService::ChallengeManagement)
        .requests()
        .is_empty());
}

#[tokio::test]
async fn completed_challenge_session_is_sent_as_evidence() {
    let fx = TestFixture::start().await;
    let mut body = card();
    body["pxChallengeSessionId"] = json!("challenge-session-001");

    let resp = fx
        .post(&pis("?partner=webblends&country=us"), body)
        .flights("PXChallengeSwitch,PXEnableChallenge")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["status"], "active");

    let adds = fx.emulators().pims().requests_matching("/Account001/paymentInstruments$");
    let sent = adds.last().and_then(|r| r.body.clone()).unwrap();
    assert_eq!(
        sent["details"]["challengeEvidence"]["challengeSessionId"],
        "challenge-session-001"
    );
    assert!(sent.get("pxChallengeSessionId").is_none());
}

#[tokio::test]
async fn incomplete_challenge_session_asks_again() {
    let fx = TestFixture::start().await;
    let mut body = card();
    body["pxChallengeSessionId"] = json!("challenge-session-001");

    let resp = fx
        .post(&pis("?partner=webblends&country=us"), body)
        .scenarios(&["px.challengemanagement.incomplete"])
        .flights("PXChallengeSwitch,PXEnableChallenge")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.first_pidl_id(), "pxChallenge");
    assert!(fx.emulators().pims().requests_matching("/paymentInstruments$").is_empty());
}

#[tokio::test]
async fn direct_debit_adds_carry_picv_actions() {
    let fx = TestFixture::start().await;

    let sepa = fx
        .post(
            &pis("?partner=webblends&country=de"),
            json!({ "paymentMethodFamily": "direct_debit", "paymentMethodType": "sepa" }),
        )
        .send()
        .await;
    assert_eq!(sepa.status, StatusCode::OK, "{}", sepa.text);
    assert_eq!(sepa.first_pidl_id(), "sepaPicvChallenge");

    let ach = fx
        .post(
            &pis("?partner=webblends&country=us"),
            json!({ "paymentMethodFamily": "direct_debit", "paymentMethodType": "ach" }),
        )
        .send()
        .await;
    assert_eq!(ach.status, StatusCode::OK, "{}", ach.text);
    assert_eq!(ach.first_pidl_id(), "achPicvStatic");
}

#[tokio::test]
async fn missing_family_is_rejected_before_pims() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), json!({ "paymentMethodType": "visa" }))
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(fx.emulators().pims().requests().is_empty());
}

#[tokio::test]
async fn complete_prerequisites_asks_for_a_billing_address() {
    let fx = TestFixture::start().await;
    fx.emulators().accounts().arrange(json!({
        "items": [{ "id": "Account001-profile", "type": "consumer" }]
    }));

    let resp = fx
        .post(
            &pis("?partner=webblends&country=us&completePrerequisites=true"),
            card(),
        )
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.first_pidl_id(), "billing");
    assert_eq!(resp.client_action()["context"][0]["identity"]["description_type"], "address");
}

#[tokio::test]
async fn complete_prerequisites_with_an_address_adds_nothing() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            &pis("?partner=webblends&country=us&completePrerequisites=true"),
            card(),
        )
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert!(resp.json.get("clientAction").map_or(true, |a| a.is_null()));
}

#[tokio::test]
async fn stored_value_token_validate_then_redeem() {
    let fx = TestFixture::start().await;
    let token = |action: &str| {
        json!({
            "paymentMethodFamily": "ewallet",
            "paymentMethodType": "stored_value",
            "tokenIdentifierValue": "ABCDE-12345-FGHIJ-67890-KLMNO",
            "actionType": action,
        })
    };

    let validated = fx
        .post(&pis("?partner=webblends&country=us"), token("validate"))
        .flights("PXEnableRedeemCSVFlow")
        .send()
        .await;
    assert_eq!(validated.status, StatusCode::OK, "{}", validated.text);
    assert_eq!(validated.first_pidl_id(), "csvToken");

    let redeemed = fx
        .post(&pis("?partner=webblends&country=us"), token("redeem"))
        .flights("PXEnableRedeemCSVFlow")
        .send()
        .await;
    assert_eq!(redeemed.status, StatusCode::OK, "{}", redeemed.text);
    let context = &redeemed.client_action()["context"];
    assert_eq!(context["redeemResult"]["isSuccess"], true);
    assert_eq!(context["csvPI"]["id"], "Account001-Pi004-StoredValue");
}

#[tokio::test]
async fn expired_stored_value_token_is_rejected() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            &pis("?partner=webblends&country=us"),
            json!({
                "paymentMethodFamily": "ewallet",
                "paymentMethodType": "stored_value",
                "tokenIdentifierValue": "EXPRD-00000",
                "actionType": "validate",
            }),
        )
        .scenarios(&["px.tokenpolicy.csv.expired"])
        .flights("PXEnableRedeemCSVFlow")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);
    assert_eq!(resp.json["ErrorCode"], "TokenExpired");
    assert_eq!(resp.json["InnerError"]["Source"], "TokenPolicyService");
}

#[tokio::test]
async fn unknown_stored_value_token_is_not_found() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), csv_token("NOTFD-00000", "validate"))
        .scenarios(&["px.tokenpolicy.csv.notfound"])
        .flights("PXEnableRedeemCSVFlow")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);
    assert_eq!(resp.json["ErrorCode"], "TokenNotFound");
    assert_eq!(resp.json["InnerError"]["Source"], "TokenPolicyService");
}

#[tokio::test]
async fn disabled_redeem_flow_cannot_validate() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), csv_token("ABCDE-12345", "validate"))
        .flights("PXEnableRedeemCSVFlow,PXDisableRedeemCSVFlow")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);
    assert_eq!(resp.json["ErrorCode"], "CouldNotValidate");
    assert_eq!(resp.json["InnerError"]["Source"], "TokenPolicyService");
    assert!(fx
        .emulators()
        .service(px_emulators::EmulatedService::TokenPolicy)
        .requests()
        .is_empty());
}

#[tokio::test]
async fn unknown_stored_value_action_is_invalid() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), csv_token("ABCDE-12345", "refund"))
        .flights("PXEnableRedeemCSVFlow")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);
    assert_eq!(resp.json["ErrorCode"], "InvalidRequestData");
    assert_eq!(resp.json["Message"], "action is invalid");
}

#[tokio::test]
async fn rate_limited_card_add_never_reaches_pims() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(&pis("?partner=webblends&country=us"), card())
        .flights("PXRateLimitPerAccount")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);
    assert_eq!(resp.json["ErrorCode"], "ValidationFailed");
    assert_eq!(resp.json["InnerError"]["Source"], "PIMS");
    assert!(fx.emulators().pims().requests().is_empty());
}

#[tokio::test]
async fn paypal_add_on_consoles_is_a_qr_code() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            &pis("?partner=storify&country=us"),
            json!({ "paymentMethodFamily": "ewallet", "paymentMethodType": "paypal" }),
        )
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["status"], "pending");
    assert_eq!(resp.first_pidl_id(), "paypalQrCode");

    let pidl = resp.first_pidl();
    let url = hint_text(&pidl, "paypalQrCodeURLText");
    assert!(url.starts_with("https://pay.example/redirect/"), "{url}");
    assert_eq!(hint_image(&pidl, "paypalQrCodeImage"), qr_code_source(url).unwrap());
    assert!(hint_image(&pidl, "paypalQrCodeImage").starts_with("data:image/png;base64,"));
}
