// SPDX-License-Identifier: BUSL-1.1
//! Stateful PIMS emulator.
//!
//! Payment instruments live in a `DashMap` keyed by PI id and seeded with a
//! fixed set for `Account001` and `Account002`. Posting a PI creates a
//! record whose status depends on the payment method: cards are active,
//! redirect methods are pending with a redirect URL, SEPA is active with a
//! PICV in progress, ACH is pending on PICV, and SMS methods are pending on
//! `sms`. Indian cards go pending on 3DS with a polling session.

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use px_core::payment_instrument::{PaymentMethodDisplay, PicvDetails};
use px_core::{
    PaymentInstrument, PaymentInstrumentDetails, PaymentInstrumentStatus, PaymentMethod,
    PaymentMethodKind,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::DefaultProvider;
use crate::mock_service::{EmulatedResponse, RecordedRequest};

pub const ACCOUNT_001: &str = "Account001";
pub const ACCOUNT_002: &str = "Account002";

const PI_NOT_FOUND_MESSAGE: &str = "The account and payment instrument pair can not be found.";

pub struct PimsProvider {
    instruments: DashMap<String, PaymentInstrument>,
    sessions: DashMap<String, Value>,
    required_challenge: RwLock<Vec<String>>,
}

impl Default for PimsProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn canned(
    account: &str,
    id: &str,
    family: &str,
    method_type: &str,
    status: PaymentInstrumentStatus,
    details: PaymentInstrumentDetails,
) -> PaymentInstrument {
    let mut method = PaymentMethod::new(family, method_type);
    method.display = Some(PaymentMethodDisplay {
        name: Some(method_type.to_string()),
        logo: Some(format!("https://static.pay.example/logos/{method_type}.svg")),
        card_art: None,
    });
    PaymentInstrument {
        id: format!("{account}-{id}"),
        account_id: account.to_string(),
        payment_method: method,
        status,
        creation_date_time: Some("2024-01-15T08:00:00Z".to_string()),
        details,
        client_action: None,
    }
}

fn card_details(last_four: &str) -> PaymentInstrumentDetails {
    let mut details = PaymentInstrumentDetails::default();
    details
        .extra
        .insert("lastFourDigits".into(), json!(last_four));
    details
        .extra
        .insert("accountHolderName".into(), json!("Test User"));
    details
}

fn pending_on(reason: &str) -> PaymentInstrumentDetails {
    PaymentInstrumentDetails {
        pending_on: Some(reason.to_string()),
        ..Default::default()
    }
}

fn picv(status: &str) -> Option<PicvDetails> {
    Some(PicvDetails {
        status: status.to_string(),
        remaining_attempts: Some(3),
    })
}

/// The canned PIs every PIMS emulator starts with.
pub fn seed_instruments() -> Vec<PaymentInstrument> {
    use PaymentInstrumentStatus::*;
    let a1 = ACCOUNT_001;
    let mut visa = card_details("1111");
    visa.network_tokens = Some(vec![px_core::payment_instrument::NetworkTokenRef {
        id: "ntk-001".into(),
    }]);

    vec![
        canned(a1, "Pi001-Visa", "credit_card", "visa", Active, visa),
        canned(a1, "Pi002-MC", "credit_card", "mc", Active, card_details("4444")),
        canned(a1, "Pi003-PayPal", "ewallet", "paypal", Active, Default::default()),
        canned(a1, "Pi004-StoredValue", "ewallet", "stored_value", Active, Default::default()),
        canned(
            a1,
            "Pi005-Ach",
            "direct_debit",
            "ach",
            Pending,
            PaymentInstrumentDetails {
                picv_details: picv("inProgress"),
                ..pending_on("picv")
            },
        ),
        canned(
            a1,
            "Pi006-Sepa",
            "direct_debit",
            "sepa",
            Active,
            PaymentInstrumentDetails {
                picv_details: picv("inProgress"),
                ..Default::default()
            },
        ),
        canned(
            a1,
            "Pi007-Alipay",
            "ewallet",
            "alipay_billing_agreement",
            Pending,
            PaymentInstrumentDetails {
                redirect_url: Some("https://alipay.example/qr/Account001-Pi007-Alipay".into()),
                ..pending_on("notification")
            },
        ),
        canned(a1, "Pi008-NonSim", "mobile_billing_non_sim", "vzw-us-nonsim", Pending, pending_on("sms")),
        canned(a1, "Pi009-Cup", "credit_card", "unionpay_creditcard", Pending, pending_on("sms")),
        canned(
            a1,
            "Pi010-PayPalPending",
            "ewallet",
            "paypal",
            Pending,
            PaymentInstrumentDetails {
                redirect_url: Some("https://paypal.example/agreement/Account001-Pi010".into()),
                ..pending_on("agreementUpdate")
            },
        ),
        canned(a1, "Pi011-Declined", "credit_card", "amex", Declined, card_details("0005")),
        canned(ACCOUNT_002, "Pi001-Amex", "credit_card", "amex", Active, card_details("0005")),
    ]
}

impl PimsProvider {
    pub fn new() -> Self {
        let provider = Self {
            instruments: DashMap::new(),
            sessions: DashMap::new(),
            required_challenge: RwLock::new(Vec::new()),
        };
        provider.seed();
        provider
    }

    fn seed(&self) {
        for pi in seed_instruments() {
            self.instruments.insert(pi.id.clone(), pi);
        }
    }

    pub fn insert(&self, pi: PaymentInstrument) {
        self.instruments.insert(pi.id.clone(), pi);
    }

    pub fn instrument(&self, piid: &str) -> Option<PaymentInstrument> {
        self.instruments.get(piid).map(|e| e.value().clone())
    }

    /// Challenges the `extendedView` endpoint reports for every PI.
    pub fn set_required_challenge(&self, challenges: Vec<String>) {
        *self.required_challenge.write() = challenges;
    }

    /// Overwrite the status of a 3DS polling session.
    pub fn set_session_status(&self, session_id: &str, status: &str) {
        let mut session = self
            .sessions
            .get(session_id)
            .map(|s| s.value().clone())
            .unwrap_or_else(|| json!({ "id": session_id }));
        session["status"] = json!(status);
        self.sessions.insert(session_id.to_string(), session);
    }

    fn owned(&self, account_id: &str, piid: &str) -> Option<PaymentInstrument> {
        self.instrument(piid)
            .filter(|pi| pi.account_id.eq_ignore_ascii_case(account_id))
    }

    fn list(&self, account_id: &str, statuses: &[&str]) -> EmulatedResponse {
        let mut pis: Vec<PaymentInstrument> = self
            .instruments
            .iter()
            .filter(|e| e.account_id.eq_ignore_ascii_case(account_id))
            .filter(|e| {
                statuses.is_empty()
                    || statuses
                        .iter()
                        .any(|s| PaymentInstrumentStatus::parse(s) == e.status)
            })
            .map(|e| e.value().clone())
            .collect();
        pis.sort_by(|a, b| a.id.cmp(&b.id));
        to_response(200, &pis)
    }

    fn add(&self, account_id: &str, request: &RecordedRequest) -> EmulatedResponse {
        let family = request.body_str("paymentMethodFamily").unwrap_or_default();
        let method_type = request.body_str("paymentMethodType").unwrap_or_default();
        let country = request.query_value("country").unwrap_or_default();
        let id = format!("{account_id}-{}", Uuid::new_v4().simple());

        let mut details: PaymentInstrumentDetails = request
            .body
            .as_ref()
            .and_then(|b| b.get("details"))
            .and_then(|d| serde_json::from_value(d.clone()).ok())
            .unwrap_or_default();
        let mut status = PaymentInstrumentStatus::Active;

        match PaymentMethodKind::classify(family, method_type) {
            kind if kind.is_credit_card() && country.eq_ignore_ascii_case("in") => {
                let session_id = Uuid::new_v4().to_string();
                self.sessions.insert(
                    session_id.clone(),
                    json!({ "id": session_id, "status": "InProgress", "piid": id }),
                );
                status = PaymentInstrumentStatus::Pending;
                details.pending_on = Some("3ds".into());
                details.redirect_url = Some(format!("https://pay.example/3ds/{id}"));
                details.session_query_url = Some(format!("sessions/{session_id}"));
            }
            PaymentMethodKind::Sepa => {
                details.picv_required = Some(true);
                details.picv_details = picv("inProgress");
            }
            PaymentMethodKind::Ach => {
                status = PaymentInstrumentStatus::Pending;
                details.pending_on = Some("picv".into());
                details.picv_details = picv("inProgress");
            }
            PaymentMethodKind::Alipay => {
                status = PaymentInstrumentStatus::Pending;
                details.pending_on = Some("notification".into());
                details.redirect_url = Some(format!("https://alipay.example/qr/{id}"));
            }
            kind if kind.is_sms_challenge() => {
                status = PaymentInstrumentStatus::Pending;
                details.pending_on = Some("sms".into());
            }
            kind if kind.is_redirect() => {
                status = PaymentInstrumentStatus::Pending;
                details.pending_on = Some("redirect".into());
                details.redirect_url = Some(format!("https://pay.example/redirect/{id}"));
            }
            _ => {}
        }

        let pi = PaymentInstrument {
            id: id.clone(),
            account_id: account_id.to_string(),
            payment_method: PaymentMethod::new(family, method_type),
            status,
            creation_date_time: Some(Utc::now().to_rfc3339()),
            details,
            client_action: None,
        };
        self.insert(pi.clone());
        tracing::debug!(piid = %id, status = %pi.status, "emulated PI created");
        to_response(200, &pi)
    }

    fn act(&self, account_id: &str, piid: &str, action: &str, request: &RecordedRequest) -> EmulatedResponse {
        let Some(mut pi) = self.owned(account_id, piid) else {
            return not_found();
        };
        match action.to_ascii_lowercase().as_str() {
            "update" => {
                if let Some(updates) = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("details"))
                    .and_then(Value::as_object)
                {
                    match merge_details(&pi, updates) {
                        Some(merged) => pi = merged,
                        None => return EmulatedResponse::error(400, "InvalidRequestData", "details could not be merged"),
                    }
                }
            }
            "resume" => {
                pi.status = PaymentInstrumentStatus::Active;
                pi.details.pending_on = None;
            }
            "validatepicv" => {
                pi.status = PaymentInstrumentStatus::Active;
                pi.details.pending_on = None;
                pi.details.picv_details = picv("success");
            }
            "validatecvv" => return EmulatedResponse::no_content(),
            _ => return EmulatedResponse::error(404, "NotFound", "Unknown PIMS operation"),
        }
        self.insert(pi.clone());
        to_response(200, &pi)
    }

    fn extended_view(&self, piid: &str) -> EmulatedResponse {
        let Some(mut pi) = self.instrument(piid) else {
            return not_found();
        };
        let required = self.required_challenge.read().clone();
        if !required.is_empty() {
            pi.details.required_challenge = Some(required);
        }
        to_response(200, &pi)
    }

    fn session(&self, session_id: &str) -> EmulatedResponse {
        match self.sessions.get(session_id) {
            Some(session) => EmulatedResponse::ok(session.value().clone()),
            None => EmulatedResponse::error(404, "SessionNotFound", "The session can not be found."),
        }
    }
}

fn merge_details(pi: &PaymentInstrument, updates: &Map<String, Value>) -> Option<PaymentInstrument> {
    let mut value = serde_json::to_value(pi).ok()?;
    let details = value.get_mut("details")?.as_object_mut()?;
    for (k, v) in updates {
        details.insert(k.clone(), v.clone());
    }
    serde_json::from_value(value).ok()
}

fn to_response<T: serde::Serialize>(status: u16, body: &T) -> EmulatedResponse {
    match serde_json::to_value(body) {
        Ok(v) => EmulatedResponse::json(status, v),
        Err(e) => EmulatedResponse::error(500, "InternalError", &e.to_string()),
    }
}

fn not_found() -> EmulatedResponse {
    let mut resp = EmulatedResponse::error(404, "AccountPINotFound", PI_NOT_FOUND_MESSAGE);
    if let Some(body) = resp.body.as_mut() {
        body["Target"] = json!("accountId");
    }
    resp
}

impl DefaultProvider for PimsProvider {
    fn respond(&self, request: &RecordedRequest) -> EmulatedResponse {
        let segments = request.segments();
        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["v4.0", "paymentInstruments", piid, view]) if view.eq_ignore_ascii_case("extendedView") => {
                self.extended_view(piid)
            }
            ("GET", ["v4.0", "sessions", session_id]) => self.session(session_id),
            ("GET", ["v4.0", account, "paymentInstruments"]) => {
                self.list(account, &request.query_values("status"))
            }
            ("GET", ["v4.0", account, "paymentInstruments", piid]) => match self.owned(account, piid) {
                Some(pi) => to_response(200, &pi),
                None => not_found(),
            },
            ("POST", ["v4.0", account, "paymentInstruments"]) => self.add(account, request),
            ("POST", ["v4.0", account, "paymentInstruments", piid, action]) => {
                self.act(account, piid, action, request)
            }
            _ => EmulatedResponse::error(404, "NotFound", &format!("No PIMS route for {}", request.path)),
        }
    }

    fn reset(&self) {
        self.instruments.clear();
        self.sessions.clear();
        self.required_challenge.write().clear();
        self.seed();
    }
}
