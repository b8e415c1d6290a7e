//! # Partners and Partner Settings
//!
//! Partner names drive a few hard-coded behaviors (xbox risk data, inline
//! redirects, wallet suppression). Everything else comes from the
//! PartnerSettings service as a [`PaymentExperienceSetting`] per operation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flights::Flights;

pub const PARTNER_XBOX: &str = "xbox";
pub const PARTNER_AMC_XBOX: &str = "amcxbox";
pub const PARTNER_WALLET: &str = "wallet";
pub const PARTNER_WEBBLENDS: &str = "webblends";

pub const FEATURE_ADD_NEW_PAYMENT_METHOD: &str = "addNewPaymentMethodOption";
pub const FEATURE_REDEEM_GIFT_CARD: &str = "redeemGiftCard";
pub const FEATURE_CONDITIONAL_BILLING_ADDRESS: &str = "enableConditionalFieldsForBillingAddress";
pub const FEATURE_XBOX_NATIVE_STYLING: &str = "xboxNativeStyling";

const XBOX_NATIVE_PARTNERS: &[&str] = &["storify", "xboxsubs", "xboxsettings", "saturn"];

/// Partners whose single window navigates to the redirect URL.
const INLINE_PARTNERS: &[&str] = &[
    "amcweb",
    "appsource",
    "azure",
    "azuresignup",
    "azureibiza",
    "bing",
    "cart",
    "commercialstores",
    "onedrive",
    "payin",
    "setupoffice",
    "oxowebdirect",
    "webblends_inline",
    "webpay",
    "northstarweb",
];

fn contains(list: &[&str], partner: &str) -> bool {
    list.iter().any(|p| p.eq_ignore_ascii_case(partner))
}

pub fn is_xbox_native_partner(partner: &str) -> bool {
    contains(XBOX_NATIVE_PARTNERS, partner)
}

/// Xbox console partners, native or not. These always receive risk data.
pub fn is_xbox_partner(partner: &str) -> bool {
    partner.eq_ignore_ascii_case(PARTNER_XBOX)
        || partner.eq_ignore_ascii_case(PARTNER_AMC_XBOX)
        || is_xbox_native_partner(partner)
}

pub fn is_inline_partner(partner: &str) -> bool {
    contains(INLINE_PARTNERS, partner)
}

pub fn is_wallet_partner(partner: &str) -> bool {
    partner.eq_ignore_ascii_case(PARTNER_WALLET)
}

/// How a redirect-based PI is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectionPattern {
    #[serde(rename = "inline")]
    Inline,
    #[serde(rename = "fullPage")]
    FullPage,
    #[serde(rename = "qrCode")]
    QrCode,
    #[serde(rename = "iFrame", alias = "iframe")]
    IFrame,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    #[serde(default)]
    pub applicable_markets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_customization_detail: Option<serde_json::Value>,
}

/// Settings for one operation of one partner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentExperienceSetting {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub redirection_pattern: Option<RedirectionPattern>,
    #[serde(default)]
    pub features: Option<BTreeMap<String, FeatureConfig>>,
}

/// Settings keyed by operation (`selectinstance`, `add`, ...).
pub type PaymentExperienceSettings = BTreeMap<String, PaymentExperienceSetting>;

impl PaymentExperienceSetting {
    /// A feature is on for `country` when configured and either unrestricted
    /// or listing the country.
    pub fn is_feature_enabled(&self, feature: &str, country: &str) -> bool {
        let Some(config) = self.features.as_ref().and_then(|f| f.get(feature)) else {
            return false;
        };
        config.applicable_markets.is_empty()
            || config
                .applicable_markets
                .iter()
                .any(|m| m.eq_ignore_ascii_case(country))
    }

    /// Features named like flights (`PX...`) are enabled as flights.
    pub fn apply_flights(&self, flights: &mut Flights) {
        if let Some(features) = &self.features {
            for name in features.keys().filter(|n| n.starts_with("PX")) {
                flights.insert(name);
            }
        }
    }
}
