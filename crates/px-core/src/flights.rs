//! Feature flights enabled for a request.
//!
//! Flights arrive in the comma-separated `x-ms-flight` header and may be
//! extended by partner-settings features whose name starts with `PX`.
//! Lookups ignore case.

use std::collections::BTreeSet;

pub const INCLUDE_PIDL_WITH_PI_LIST: &str = "IncludePIDLWithPaymentInstrumentList";
pub const LIST_MODERN_PIS_WITH_CARD_ART: &str = "ListModernPIsWithCardArt";
pub const PASS_IP_ADDRESS_TO_PIMS: &str = "PXPassIpAddressToPIMSForAddUpdatePI";
pub const PASS_USER_AGENT_TO_PIMS: &str = "PXPassUserAgentToPIMSForAddUpdatePI";
pub const ENABLE_REDEEM_CSV_FLOW: &str = "PXEnableRedeemCSVFlow";
pub const DISABLE_REDEEM_CSV_FLOW: &str = "PXDisableRedeemCSVFlow";
pub const CHALLENGE_SWITCH: &str = "PXChallengeSwitch";
pub const ENABLE_CHALLENGE: &str = "PXEnableChallenge";
pub const INTEGRATE_FRAUD_DETECTION: &str = "PXIntegrateFraudDetectionService";
pub const RATE_LIMIT_PER_ACCOUNT: &str = "PXRateLimitPerAccount";
pub const CHECK_CREDIT_CARD_TYPES: &str = "PXCheckCreditCardTypes";
pub const DISPLAY_3DS_NOT_ENABLED_INLINE: &str = "PXDisplay3dsNotEnabledErrorInline";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flights {
    names: BTreeSet<String>,
}

impl Flights {
    /// Parse the `x-ms-flight` header value. Blank entries are skipped.
    pub fn parse(header: &str) -> Self {
        let mut flights = Self::default();
        for name in header.split(',') {
            flights.insert(name);
        }
        flights
    }

    pub fn insert(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.names.insert(name.to_ascii_lowercase());
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
