// SPDX-License-Identifier: BUSL-1.1
//! List and get against the emulated PIMS seed data.

mod common;

use axum::http::StatusCode;
use common::{find, hint_image, hint_text, pi, pis, TestFixture};
use px_core::pidl::qr_code_source;
use serde_json::json;

#[tokio::test]
async fn default_list_returns_active_instruments_with_client_actions() {
    let fx = TestFixture::start().await;
    let resp = fx.get(&pis("?partner=webblends&country=us")).send().await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);

    let list = &resp.json;
    let sepa = find(list, "Account001-Pi006-Sepa");
    assert_eq!(sepa["clientAction"]["type"], "Pidl");
    assert_eq!(sepa["clientAction"]["context"][0]["identity"]["id"], "sepaPicvChallenge");

    let visa = find(list, "Account001-Pi001-Visa");
    assert!(visa.get("clientAction").map_or(true, |a| a.is_null()));

    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|pi| pi["id"].as_str())
        .collect();
    assert!(!ids.contains(&"Account001-Pi011-Declined"));
    assert!(!ids.contains(&"Account002-Pi001-Amex"));

    let listed = fx.emulators().pims().requests_matching("/Account001/paymentInstruments");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].query_values("status"), vec!["active"]);
}

#[tokio::test]
async fn pending_list_carries_challenges_per_method() {
    let fx = TestFixture::start().await;
    let resp = fx.get(&pis("?partner=webblends&country=us&status=pending")).send().await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);

    let pidl_id = |id: &str| {
        find(&resp.json, id)["clientAction"]["context"][0]["identity"]["id"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    };
    assert_eq!(pidl_id("Account001-Pi005-Ach"), "achPicvChallenge");
    assert_eq!(pidl_id("Account001-Pi007-Alipay"), "alipayQrCode");
    assert_eq!(pidl_id("Account001-Pi008-NonSim"), "smsChallenge");
    assert_eq!(pidl_id("Account001-Pi010-PayPalPending"), "paypalRetryStatic");
}

#[tokio::test]
async fn pending_alipay_get_renders_its_qr_code() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get(&pi("Account001-Pi007-Alipay", "?partner=webblends&country=cn"))
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.first_pidl_id(), "alipayQrCode");

    let pidl = resp.first_pidl();
    let url = hint_text(&pidl, "alipayQrCodeURLText");
    assert_eq!(url, "https://alipay.example/qr/Account001-Pi007-Alipay");
    assert_eq!(hint_image(&pidl, "alipayQrCodeImage"), qr_code_source(url).unwrap());
}

#[tokio::test]
async fn include_pidl_needs_the_flight() {
    let fx = TestFixture::start().await;

    let plain = fx.get(&pis("?partner=webblends&country=us&includePidl=true")).send().await;
    assert!(plain.json.is_array());

    let flighted = fx
        .get(&pis("?partner=webblends&country=us&includePidl=true"))
        .flights("IncludePIDLWithPaymentInstrumentList")
        .send()
        .await;
    assert_eq!(flighted.status, StatusCode::OK, "{}", flighted.text);
    assert!(flighted.json["paymentInstruments"].is_array());
    assert!(flighted.json["pidlInfo"]["selectInstance"].is_array());
}

#[tokio::test]
async fn partner_settings_add_the_new_method_link() {
    let fx = TestFixture::start().await;
    fx.emulators().partner_settings().arrange(json!({
        "selectinstance": {
            "features": { "addNewPaymentMethodOption": { "applicableMarkets": [] } }
        }
    }));

    let resp = fx.get(&pis("?partner=officesmb&country=us")).send().await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    let last = resp.json.as_array().and_then(|l| l.last()).cloned().unwrap();
    assert_eq!(last["id"], "newPaymentMethodLink");

    let settings = fx.emulators().partner_settings().requests_matching("/officesmb");
    assert_eq!(settings.len(), 1);
}

#[tokio::test]
async fn include_pidl_list_has_no_new_method_link() {
    let fx = TestFixture::start().await;
    fx.emulators().partner_settings().arrange(json!({
        "selectinstance": {
            "features": { "addNewPaymentMethodOption": { "applicableMarkets": [] } }
        }
    }));

    let resp = fx
        .get(&pis("?partner=officesmb&country=us&includePidl=true"))
        .flights("IncludePIDLWithPaymentInstrumentList")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    let listed = resp.json["paymentInstruments"].as_array().unwrap();
    assert!(listed.iter().all(|pi| pi["id"] != "newPaymentMethodLink"));
}

#[tokio::test]
async fn list_forwards_operation_and_country() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get(&pis("?partner=officesmb&country=de&operation=selectSingleInstance"))
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);

    let settings = fx.emulators().partner_settings().requests_matching("/officesmb");
    assert_eq!(settings[0].query_values("operation"), vec!["selectSingleInstance"]);
    let listed = fx.emulators().pims().requests_matching("/Account001/paymentInstruments");
    assert_eq!(listed[0].query_values("country"), vec!["de"]);
}

#[tokio::test]
async fn card_art_comes_from_one_token_lookup() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get(&pis("?partner=webblends&country=us&deviceId=device-42"))
        .flights("ListModernPIsWithCardArt")
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);

    let visa = find(&resp.json, "Account001-Pi001-Visa");
    assert_eq!(
        visa["paymentMethod"]["display"]["cardArt"]["mediumImageUrl"],
        "https://static.pay.example/cardart/ntk-001.png"
    );
    let mc = find(&resp.json, "Account001-Pi002-MC");
    assert!(mc["paymentMethod"]["display"].get("cardArt").is_none());

    let lookups = fx
        .emulators()
        .service(px_emulators::EmulatedService::NetworkTokenization)
        .requests();
    assert_eq!(lookups.len(), 1);
    assert_eq!(lookups[0].query_values("deviceId"), vec!["device-42"]);
}

#[tokio::test]
async fn unknown_instrument_is_not_found() {
    let fx = TestFixture::start().await;
    let resp = fx.get(&pi("Account002-Pi001-Amex", "")).send().await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json["ErrorCode"], "PaymentInstrumentNotFound");
    assert_eq!(resp.json["InnerError"]["ErrorCode"], "AccountPINotFound");
}

#[tokio::test]
async fn successful_session_reads_the_session_instrument() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get(&pi("Account001-3ds1-Visa", "?sessionQueryUrl=sessions/3ds1-session-001"))
        .scenarios(&["px.pims.3ds.session.success"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["id"], "Account001-Pi001-Visa");
    assert_eq!(resp.json["status"], "active");
}

#[tokio::test]
async fn failed_session_is_an_error_without_polling() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get(&pi("Account001-Pi001-Visa", "?sessionQueryUrl=sessions/3ds1-session-001"))
        .scenarios(&["px.pims.3ds.session.failed"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["ErrorCode"], "PimsSessionFailed");
}

#[tokio::test]
async fn expired_session_is_an_error_without_polling() {
    let fx = TestFixture::start().await;
    let resp = fx
        .get(&pi("Account001-Pi001-Visa", "?sessionQueryUrl=sessions/3ds1-session-001"))
        .scenarios(&["px.pims.3ds.session.expired"])
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["ErrorCode"], "PimsSessionExpired");
}

#[tokio::test]
async fn polling_maps_session_state_onto_the_instrument() {
    let fx = TestFixture::start().await;
    let uri = pi(
        "Account001-Pi001-Visa",
        "?sessionQueryUrl=sessions/3ds1-session-001&scenario=threedsonepolling",
    );

    let failed = fx.get(&uri).scenarios(&["px.pims.3ds.session.failed"]).send().await;
    assert_eq!(failed.status, StatusCode::OK, "{}", failed.text);
    assert_eq!(failed.json["status"], "declined");
    assert!(failed.json.get("clientAction").map_or(true, |a| a.is_null()));

    let pending = fx.get(&uri).scenarios(&["px.pims.3ds.session.inprogress"]).send().await;
    assert_eq!(pending.json["status"], "pending");
}

#[tokio::test]
async fn india_card_session_resolves_after_the_bank_step() {
    let fx = TestFixture::start().await;
    let added = fx
        .post(
            &pis("?partner=webblends&country=in"),
            json!({ "paymentMethodFamily": "credit_card", "paymentMethodType": "visa" }),
        )
        .send()
        .await;
    assert_eq!(added.status, StatusCode::OK, "{}", added.text);
    assert_eq!(added.json["status"], "pending");
    let piid = added.json["id"].as_str().unwrap().to_string();
    let session = added.json["details"]["sessionQueryUrl"].as_str().unwrap().to_string();
    let session_id = session.trim_start_matches("sessions/");

    fx.emulators().pims_store().set_session_status(session_id, "Success");
    let resp = fx
        .get(&pi(&piid, &format!("?sessionQueryUrl={session}")))
        .send()
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.json["id"], piid.as_str());
}
