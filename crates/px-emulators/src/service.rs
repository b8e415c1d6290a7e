// SPDX-License-Identifier: BUSL-1.1
//! The downstream services the emulator server hosts.

use std::fmt;

/// A downstream service and the path prefix it is mounted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmulatedService {
    Pims,
    PartnerSettings,
    Accounts,
    TokenPolicy,
    Catalog,
    Purchase,
    Orchestration,
    NetworkTokenization,
    Session,
    ChallengeManagement,
    FraudDetection,
    Issuer,
    CommerceAccountData,
    StoredValue,
}

impl EmulatedService {
    pub const ALL: [EmulatedService; 14] = [
        Self::Pims,
        Self::PartnerSettings,
        Self::Accounts,
        Self::TokenPolicy,
        Self::Catalog,
        Self::Purchase,
        Self::Orchestration,
        Self::NetworkTokenization,
        Self::Session,
        Self::ChallengeManagement,
        Self::FraudDetection,
        Self::Issuer,
        Self::CommerceAccountData,
        Self::StoredValue,
    ];

    /// First path segment the service is served under.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Pims => "pims",
            Self::PartnerSettings => "partnersettings",
            Self::Accounts => "accounts",
            Self::TokenPolicy => "tokenpolicy",
            Self::Catalog => "catalog",
            Self::Purchase => "purchase",
            Self::Orchestration => "orchestration",
            Self::NetworkTokenization => "networktokenization",
            Self::Session => "session",
            Self::ChallengeManagement => "challengemanagement",
            Self::FraudDetection => "frauddetection",
            Self::Issuer => "issuer",
            Self::CommerceAccountData => "commerceaccountdata",
            Self::StoredValue => "storedvalue",
        }
    }

    /// Look a service up by its path prefix, ignoring case.
    pub fn from_path(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.path().eq_ignore_ascii_case(segment))
    }
}

impl fmt::Display for EmulatedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_lookup_round_trips() {
        for service in EmulatedService::ALL {
            assert_eq!(EmulatedService::from_path(service.path()), Some(service));
        }
        assert_eq!(EmulatedService::from_path("PIMS"), Some(EmulatedService::Pims));
        assert_eq!(EmulatedService::from_path("payerauth"), None);
    }
}
