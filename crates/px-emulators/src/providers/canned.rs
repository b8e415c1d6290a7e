// SPDX-License-Identifier: BUSL-1.1
//! Canned defaults for the stateless services.

use serde_json::{json, Value};
use uuid::Uuid;

use super::DefaultProvider;
use crate::mock_service::{EmulatedResponse, RecordedRequest};
use crate::service::EmulatedService;

/// Default token value the token policy emulator echoes when a request
/// carries none.
pub const DEFAULT_TOKEN: &str = "ABCDE-FGHIJ-KLMNO-PQRST-UVWXY";

#[derive(Debug, Clone, Copy)]
pub struct CannedProvider {
    service: EmulatedService,
}

impl CannedProvider {
    pub fn new(service: EmulatedService) -> Self {
        Self { service }
    }
}

fn unrouted(request: &RecordedRequest, service: EmulatedService) -> EmulatedResponse {
    EmulatedResponse::error(
        404,
        "NotFound",
        &format!("No default {service} response for {} {}", request.method, request.path),
    )
}

impl DefaultProvider for CannedProvider {
    fn respond(&self, request: &RecordedRequest) -> EmulatedResponse {
        use EmulatedService::*;
        let segments = request.segments();
        let method = request.method.as_str();

        match (self.service, method, segments.as_slice()) {
            (PartnerSettings, "GET", _) => EmulatedResponse::ok(json!({})),

            (Accounts, "GET", [account, "profiles"]) => EmulatedResponse::ok(json!({
                "items": [{
                    "id": format!("{account}-profile"),
                    "type": request.query_value("type").unwrap_or("consumer"),
                    "first_name": "Test",
                    "last_name": "User",
                    "email_address": "test.user@example.com",
                    "default_address_id": format!("{account}-address-001"),
                }]
            })),

            (TokenPolicy, "POST", ["users", _, "tokenDescriptionRequests"]) => {
                EmulatedResponse::ok(json!({
                    "tokenValue": request.body_str("tokenValue").unwrap_or(DEFAULT_TOKEN),
                    "tokenState": "Active",
                    "policyEvaluation": { "isRedeemable": true, "result": "Redeemable" },
                    "asset": { "value": 25.0, "currency": "USD" },
                    "products": [{
                        "productId": "CFQ7TTC0K5DJ",
                        "skuId": "0001",
                        "availabilityId": "CFQ7TTC0K5DJ0001",
                        "category": "Other"
                    }]
                }))
            }

            (Catalog, "GET", ["v8.0", "products"]) => {
                let products: Vec<Value> = request
                    .query_value("bigIds")
                    .unwrap_or_default()
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .map(|big_id| {
                        let product_id = big_id.split('/').next().unwrap_or(big_id);
                        json!({ "productId": product_id, "productType": "CSV" })
                    })
                    .collect();
                EmulatedResponse::ok(json!({ "products": products }))
            }

            (Purchase, "POST", ["v7.0", "users", _, "orders"]) => EmulatedResponse::ok(json!({
                "orderId": Uuid::new_v4().to_string(),
                "orderState": "purchased",
                "totalAmount": 25.0,
                "currency": "USD"
            })),

            (Orchestration, "POST", ["paymentInstruments", _, action]) => {
                if action.eq_ignore_ascii_case("remove") {
                    EmulatedResponse::no_content()
                } else {
                    EmulatedResponse::ok(json!({}))
                }
            }

            (NetworkTokenization, "GET", ["tokens"]) => EmulatedResponse::ok(json!({
                "tokens": [{
                    "id": "ntk-001",
                    "cardMetadata": {
                        "mediumImageUrl": "https://static.pay.example/cardart/ntk-001.png",
                        "foregroundColor": "FFFFFF"
                    }
                }]
            })),

            (Session, "GET", ["sessions", id]) => EmulatedResponse::ok(json!({
                "id": id,
                "state": "Active",
                "data": {}
            })),
            (Session, "POST", ["sessions"]) => EmulatedResponse::ok(json!({
                "id": Uuid::new_v4().to_string(),
                "state": "Active",
                "data": request.body.clone().unwrap_or_else(|| json!({}))
            })),

            (CommerceAccountData, _, _) => EmulatedResponse::ok(json!({
                "accounts": [{ "id": "Account001", "country": "us", "status": "Active" }]
            })),

            (ChallengeManagement, "POST", ["challengesession"]) => EmulatedResponse::ok(json!({
                "sessionId": Uuid::new_v4().to_string(),
                "status": "Active",
                "challengeType": request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("challengeType"))
                    .cloned()
                    .unwrap_or_else(|| json!("PXChallenge"))
            })),
            (ChallengeManagement, "GET", ["challengesession", id, "status"]) => {
                EmulatedResponse::ok(json!({ "sessionId": id, "status": "Completed" }))
            }

            (FraudDetection, "POST", ["api", "v1", "botcheck"]) => {
                EmulatedResponse::ok(json!({ "recommendation": "Approved" }))
            }

            (Issuer, "POST", ["applications", puid]) => EmulatedResponse::ok(json!({
                "status": "Pending",
                "redirectUrl": format!("https://issuer.example/apply/{puid}"),
                "sessionId": request.body_str("sessionId").unwrap_or_default()
            })),

            (StoredValue, "POST", [_, "funds"]) => {
                let id = Uuid::new_v4().to_string();
                EmulatedResponse::ok(json!({
                    "id": id,
                    "status": "pending",
                    "redirectionUrl": format!("https://bitpay.example/i/{id}")
                }))
            }
            (StoredValue, "GET", [_, "funds", id]) => {
                EmulatedResponse::ok(json!({ "id": id, "status": "completed" }))
            }

            _ => unrouted(request, self.service),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond(service: EmulatedService, request: RecordedRequest) -> EmulatedResponse {
        CannedProvider::new(service).respond(&request)
    }

    #[test]
    fn catalog_answers_each_big_id() {
        let req = RecordedRequest::new("GET", "/v8.0/products").with_query("bigIds", "P1/S1/A1,P2/S2/A2");
        let body = respond(EmulatedService::Catalog, req).body.unwrap();
        assert_eq!(body["products"][1]["productId"], "P2");
        assert_eq!(body["products"][0]["productType"], "CSV");
    }

    #[test]
    fn orchestration_remove_is_no_content() {
        let req = RecordedRequest::new("POST", "/paymentInstruments/pi-1/remove");
        assert_eq!(respond(EmulatedService::Orchestration, req).status, 204);
        let req = RecordedRequest::new("POST", "/paymentInstruments/pi-1/replace");
        assert_eq!(respond(EmulatedService::Orchestration, req).status, 200);
    }

    #[test]
    fn token_policy_echoes_token() {
        let req = RecordedRequest::new("POST", "/users/Account001/tokenDescriptionRequests")
            .with_body(json!({ "tokenValue": "ZZZZZ" }));
        let body = respond(EmulatedService::TokenPolicy, req).body.unwrap();
        assert_eq!(body["tokenValue"], "ZZZZZ");
        assert_eq!(body["policyEvaluation"]["isRedeemable"], true);
    }

    #[test]
    fn unknown_routes_are_404() {
        let req = RecordedRequest::new("DELETE", "/whatever");
        assert_eq!(respond(EmulatedService::Issuer, req).status, 404);
    }
}
