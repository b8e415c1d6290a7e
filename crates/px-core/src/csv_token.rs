//! CSV (stored value / gift card) token validation and redemption results.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CsvTokenStatus {
    #[serde(rename = "ValidCSVToken")]
    ValidCsvToken,
    #[serde(rename = "NonCSVToken")]
    NonCsvToken,
    TokenNotFound,
    TokenAlreadyRedeemed,
    TokenExpired,
    CouldNotValidate,
    Unknown,
}

impl CsvTokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidCsvToken => "ValidCSVToken",
            Self::NonCsvToken => "NonCSVToken",
            Self::TokenNotFound => "TokenNotFound",
            Self::TokenAlreadyRedeemed => "TokenAlreadyRedeemed",
            Self::TokenExpired => "TokenExpired",
            Self::CouldNotValidate => "CouldNotValidate",
            Self::Unknown => "Unknown",
        }
    }

    /// Map a TokenPolicy `policyEvaluation` result for a token that is not
    /// in a redeemable state.
    pub fn from_policy_result(result: &str) -> Self {
        if result.eq_ignore_ascii_case("TokenNotInRedeemableState") {
            Self::TokenAlreadyRedeemed
        } else if result.eq_ignore_ascii_case("TokenExpired") {
            Self::TokenExpired
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for CsvTokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTokenValidationResult {
    pub token_status: CsvTokenStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_currency: Option<String>,
}

impl CsvTokenValidationResult {
    pub fn status(token_status: CsvTokenStatus) -> Self {
        Self {
            token_status,
            token_value: None,
            token_currency: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTokenRedemptionResult {
    pub is_success: bool,
    pub token_status: CsvTokenStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Amount text shown on the confirm-redeem page, e.g. `$25.00` or `25.00 EUR`.
pub fn format_amount(value: f64, currency: &str) -> String {
    let symbol = match currency.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" => Some("$"),
        "GBP" => Some("£"),
        "EUR" => Some("€"),
        "JPY" => Some("¥"),
        _ => None,
    };
    match symbol {
        Some(s) => format!("{s}{value:.2}"),
        None => format!("{value:.2} {}", currency.to_ascii_uppercase()),
    }
}
