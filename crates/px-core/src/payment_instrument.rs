//! # Payment Instrument
//!
//! The payment instrument (PI) record owned by PIMS. The service reads PIs
//! from PIMS, decorates them with a [`ClientAction`] describing the next
//! step the client must take, and returns them.
//!
//! ## Status
//!
//! PIMS reports status in lower case (`active`, `pending`, ...). Older
//! payloads use title case, so deserialization is case-insensitive.
//! Unrecognized values map to [`PaymentInstrumentStatus::Unknown`] rather
//! than failing the whole PI.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::client_action::ClientAction;
use crate::payment_method::PaymentMethodKind;

/// Lifecycle status of a payment instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentInstrumentStatus {
    Active,
    Pending,
    Declined,
    Removed,
    Unknown,
}

impl PaymentInstrumentStatus {
    /// Wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Declined => "declined",
            Self::Removed => "removed",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a status, ignoring case.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "pending" => Self::Pending,
            "declined" => Self::Declined,
            "removed" => Self::Removed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PaymentInstrumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentInstrumentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentInstrumentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Display metadata for a payment method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodDisplay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Card art copied from the network tokenization service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_art: Option<Value>,
}

/// The payment method a PI belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub payment_method_family: String,
    #[serde(default)]
    pub payment_method_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<PaymentMethodDisplay>,
}

impl PaymentMethod {
    pub fn new(family: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            payment_method_family: family.into(),
            payment_method_type: kind.into(),
            display: None,
        }
    }

    /// Classify the family/type pair.
    pub fn kind(&self) -> PaymentMethodKind {
        PaymentMethodKind::classify(&self.payment_method_family, &self.payment_method_type)
    }
}

/// State of a PICV (micro-deposit) verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PicvDetails {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
}

impl PicvDetails {
    pub fn is_in_progress(&self) -> bool {
        self.status.eq_ignore_ascii_case("inProgress")
    }
}

/// A network token attached to a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTokenRef {
    pub id: String,
}

/// Family-specific PI details.
///
/// Only the fields the service reasons about are typed; everything else
/// round-trips through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrumentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_query_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picv_details: Option<PicvDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picv_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_full_page_redirect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_tokens: Option<Vec<NetworkTokenRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_challenge: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A payment instrument as returned by PIMS and the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    pub payment_method: PaymentMethod,
    pub status: PaymentInstrumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<String>,
    #[serde(default)]
    pub details: PaymentInstrumentDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_action: Option<ClientAction>,
}

impl Default for PaymentInstrumentStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl PaymentInstrument {
    pub fn family(&self) -> &str {
        &self.payment_method.payment_method_family
    }

    pub fn method_type(&self) -> &str {
        &self.payment_method.payment_method_type
    }

    pub fn kind(&self) -> PaymentMethodKind {
        self.payment_method.kind()
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentInstrumentStatus::Pending
    }

    /// Whether PIMS requires the given challenge (e.g. `3ds2`) before the PI
    /// can be used. Only populated on the extended view.
    pub fn requires_challenge(&self, challenge: &str) -> bool {
        self.details
            .required_challenge
            .as_ref()
            .map(|c| c.iter().any(|c| c.eq_ignore_ascii_case(challenge)))
            .unwrap_or(false)
    }
}
