// SPDX-License-Identifier: BUSL-1.1
//! Unauthenticated surfaces: second-screen add, co-branded card apply, the
//! 3DS return page, and the probes.

mod common;

use axum::http::StatusCode;
use common::{TestFixture, ACCOUNT};
use serde_json::json;

const MSA_PROFILE: &str = r#"PUID="1234""#;

#[tokio::test]
async fn second_screen_add_uses_the_body_account() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            "/v7.0/paymentInstrumentsEx/create?scenario=secondScreenAddPi&partner=webblends&country=us",
            json!({
                "accountId": ACCOUNT,
                "paymentMethodFamily": "credit_card",
                "paymentMethodType": "visa"
            }),
        )
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["accountId"], ACCOUNT);
    assert_eq!(
        fx.emulators()
            .pims()
            .requests_matching("/Account001/paymentInstruments$")
            .len(),
        1
    );
}

#[tokio::test]
async fn create_without_the_scenario_is_rejected() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            "/v7.0/paymentInstrumentsEx/create?partner=webblends",
            json!({ "accountId": ACCOUNT, "paymentMethodFamily": "credit_card" }),
        )
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(fx.emulators().pims().requests().is_empty());
}

#[tokio::test]
async fn apply_redirects_to_the_issuer() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            "/v7.0/paymentInstrumentsEx/apply?partner=webblends&country=us",
            json!({ "cardProduct": "XboxCreditCard", "channel": "web", "referrerId": "ref-1" }),
        )
        .header("x-ms-msaprofile", MSA_PROFILE)
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["identity"]["id"], "cobrandedCardRedirect");
    assert!(resp.text.contains("https://issuer.example/apply/1234"));
}

#[tokio::test]
async fn apply_retries_a_bad_session_once() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            "/v7.0/paymentInstrumentsEx/apply?partner=webblends&country=us&sessionId=s-1",
            json!({ "cardProduct": "XboxCreditCard" }),
        )
        .header("x-ms-msaprofile", MSA_PROFILE)
        .scenarios(&["px.issuer.apply.badsessionstate"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{}", resp.text);

    let issuer = fx
        .emulators()
        .service(px_emulators::EmulatedService::Issuer)
        .requests();
    assert_eq!(issuer.len(), 2);
    assert_eq!(issuer[0].body_str("sessionId"), Some("s-1"));
    assert_ne!(issuer[1].body_str("sessionId"), Some("s-1"));
}

#[tokio::test]
async fn apply_on_consoles_is_a_qr_code_without_the_issuer() {
    let fx = TestFixture::start().await;
    let resp = fx
        .post(
            "/v7.0/paymentInstrumentsEx/apply?partner=xboxsettings&country=us&sessionId=s-9",
            json!({ "channel": "console" }),
        )
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["identity"]["id"], "xboxCoBrandedCard");
    assert_eq!(resp.json["identity"]["session_id"], "s-9");
    assert!(fx
        .emulators()
        .service(px_emulators::EmulatedService::Issuer)
        .requests()
        .is_empty());
}

#[tokio::test]
async fn resume_anonymous_posts_the_status_check() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get("/v7.0/paymentInstrumentsEx/Account001-3ds1-Visa/resumeAnonymous?isSuccessful=true&sessionQueryUrl=sessions/3ds1-session-001")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.content_type.starts_with("text/html"));
    assert!(resp.text.contains("window.parent.postMessage"));
    assert!(resp.text.contains("cc3DSStatusCheck"));
}

#[tokio::test]
async fn failed_resume_anonymous_posts_a_failure() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get("/v7.0/paymentInstrumentsEx/Account001-3ds1-Visa/resumeAnonymous?isSuccessful=false")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.text.contains("ThreeDSOneResumeAddPiFailed"));
}

#[tokio::test]
async fn probe_and_health_answer() {
    let fx = TestFixture::start().await;

    let probe = fx.get("/v7.0/probe").send().await;
    assert_eq!(probe.status, StatusCode::OK);

    let ready = fx.get("/health/readiness").send().await;
    assert_eq!(ready.status, StatusCode::OK, "{}", ready.text);

    let metrics = fx.get("/metrics").send().await;
    assert_eq!(metrics.status, StatusCode::OK);
    assert!(metrics.text.contains("px_http_requests_total"));
}
