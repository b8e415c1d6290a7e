//! Risk data forwarded to PIMS on add, update and resume.

use px_core::{flights, partner, ClientContext, Flights};
use serde_json::{Map, Value};

/// Copy `ipAddress` and `userAgent` from `x-ms-deviceinfo` into the body's
/// `riskData`. Xbox partners always send both; other partners only under the
/// pass-through flights.
pub fn attach(body: &mut Value, device_info: &ClientContext, partner_name: &str, flights: &Flights) {
    let xbox = partner::is_xbox_partner(partner_name);
    let ip_address = (xbox || flights.is_enabled(flights::PASS_IP_ADDRESS_TO_PIMS))
        .then(|| device_info.ip_address())
        .flatten()
        .and_then(|ip| ip.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    let user_agent = (xbox || flights.is_enabled(flights::PASS_USER_AGENT_TO_PIMS))
        .then(|| device_info.user_agent())
        .flatten()
        .filter(|ua| !ua.is_empty());

    if ip_address.is_none() && user_agent.is_none() {
        return;
    }
    let Some(object) = body.as_object_mut() else {
        return;
    };
    let risk = object
        .entry("riskData")
        .or_insert_with(|| Value::Object(Map::new()));
    if !risk.is_object() {
        *risk = Value::Object(Map::new());
    }
    if let Some(risk) = risk.as_object_mut() {
        if let Some(ip) = ip_address {
            risk.insert("ipAddress".into(), Value::String(ip.to_string()));
        }
        if let Some(ua) = user_agent {
            risk.insert("userAgent".into(), Value::String(ua.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device() -> ClientContext {
        ClientContext::parse(
            "x-ms-deviceinfo",
            r#"ipAddress="203.0.113.7, 10.0.0.1",userAgent="Xbox/10.0""#,
            false,
        )
        .unwrap()
    }

    #[test]
    fn xbox_partner_always_gets_risk_data() {
        let mut body = json!({ "paymentMethodFamily": "credit_card" });
        attach(&mut body, &device(), "xbox", &Flights::default());
        assert_eq!(body["riskData"], json!({ "ipAddress": "203.0.113.7", "userAgent": "Xbox/10.0" }));
    }

    #[test]
    fn other_partners_need_flights() {
        let mut body = json!({});
        attach(&mut body, &device(), "webblends", &Flights::default());
        assert!(body.get("riskData").is_none());

        attach(
            &mut body,
            &device(),
            "webblends",
            &Flights::parse("PXPassIpAddressToPIMSForAddUpdatePI"),
        );
        assert_eq!(body["riskData"], json!({ "ipAddress": "203.0.113.7" }));
    }

    #[test]
    fn existing_risk_data_is_kept() {
        let mut body = json!({ "riskData": { "greenId": "g-1" } });
        attach(&mut body, &device(), "storify", &Flights::default());
        assert_eq!(body["riskData"]["greenId"], "g-1");
        assert_eq!(body["riskData"]["userAgent"], "Xbox/10.0");
    }
}
