//! # Payment Method Classification
//!
//! Maps a `(paymentMethodFamily, paymentMethodType)` pair onto the handful
//! of behaviors the service distinguishes. Comparison is case-insensitive.

use serde::{Deserialize, Serialize};

pub const FAMILY_CREDIT_CARD: &str = "credit_card";
pub const FAMILY_DIRECT_DEBIT: &str = "direct_debit";
pub const FAMILY_EWALLET: &str = "ewallet";
pub const FAMILY_MOBILE_NON_SIM: &str = "mobile_billing_non_sim";
pub const FAMILY_ONLINE_BANK_TRANSFER: &str = "online_bank_transfer";
pub const FAMILY_ADD_NEW_PAYMENT_METHOD: &str = "add_new_payment_method";

const CREDIT_CARD_TYPES: &[&str] = &["amex", "discover", "visa", "mc", "rupay", "jcb", "hipercard", "elo"];

/// Payment method categories that drive client-action and error-mapping
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethodKind {
    CreditCard,
    UnionPayCredit,
    UnionPayDebit,
    Sepa,
    Ach,
    StoredValue,
    PayPal,
    Alipay,
    NonSim,
    GenericRedirect,
    Other,
}

impl PaymentMethodKind {
    pub fn classify(family: &str, method_type: &str) -> Self {
        let family = family.to_ascii_lowercase();
        let method_type = method_type.to_ascii_lowercase();

        match (family.as_str(), method_type.as_str()) {
            (FAMILY_CREDIT_CARD, "unionpay_creditcard") => Self::UnionPayCredit,
            (FAMILY_CREDIT_CARD, "unionpay_debitcard") => Self::UnionPayDebit,
            (FAMILY_CREDIT_CARD, t) if CREDIT_CARD_TYPES.contains(&t) => Self::CreditCard,
            (FAMILY_DIRECT_DEBIT, "sepa") => Self::Sepa,
            (FAMILY_DIRECT_DEBIT, "ach") => Self::Ach,
            (FAMILY_EWALLET, "stored_value") => Self::StoredValue,
            (FAMILY_EWALLET, "paypal") => Self::PayPal,
            (FAMILY_EWALLET, "alipay_billing_agreement") => Self::Alipay,
            (FAMILY_EWALLET, "venmo") => Self::GenericRedirect,
            (FAMILY_ONLINE_BANK_TRANSFER, "paysafecard") => Self::GenericRedirect,
            (FAMILY_MOBILE_NON_SIM, _) => Self::NonSim,
            _ => Self::Other,
        }
    }

    /// Cards handled by the common credit-card error map. China UnionPay
    /// has its own.
    pub fn is_credit_card(&self) -> bool {
        matches!(self, Self::CreditCard)
    }

    pub fn is_union_pay(&self) -> bool {
        matches!(self, Self::UnionPayCredit | Self::UnionPayDebit)
    }

    pub fn is_direct_debit(&self) -> bool {
        matches!(self, Self::Sepa | Self::Ach)
    }

    /// Families completed by sending the user to an external page.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::PayPal | Self::GenericRedirect)
    }

    /// Families completed by an SMS or notification challenge.
    pub fn is_sms_challenge(&self) -> bool {
        matches!(self, Self::NonSim | Self::Alipay) || self.is_union_pay()
    }
}

/// `paymentMethodType` may be omitted only for these families.
pub fn type_optional_for_family(family: &str) -> bool {
    family.eq_ignore_ascii_case(FAMILY_EWALLET) || family.eq_ignore_ascii_case(FAMILY_DIRECT_DEBIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_credit_cards_case_insensitively() {
        for t in ["visa", "VISA", "Amex", "mc", "discover", "rupay"] {
            assert_eq!(
                PaymentMethodKind::classify("Credit_Card", t),
                PaymentMethodKind::CreditCard,
                "{t}"
            );
        }
    }

    #[test]
    fn union_pay_is_not_a_plain_credit_card() {
        let credit = PaymentMethodKind::classify("credit_card", "unionpay_creditcard");
        let debit = PaymentMethodKind::classify("credit_card", "unionpay_debitcard");
        assert_eq!(credit, PaymentMethodKind::UnionPayCredit);
        assert_eq!(debit, PaymentMethodKind::UnionPayDebit);
        assert!(!credit.is_credit_card());
        assert!(credit.is_union_pay() && debit.is_sms_challenge());
    }

    #[test]
    fn classifies_direct_debit_and_wallets() {
        assert_eq!(PaymentMethodKind::classify("direct_debit", "sepa"), PaymentMethodKind::Sepa);
        assert_eq!(PaymentMethodKind::classify("direct_debit", "ach"), PaymentMethodKind::Ach);
        assert_eq!(PaymentMethodKind::classify("ewallet", "stored_value"), PaymentMethodKind::StoredValue);
        assert_eq!(PaymentMethodKind::classify("ewallet", "paypal"), PaymentMethodKind::PayPal);
        assert_eq!(
            PaymentMethodKind::classify("ewallet", "alipay_billing_agreement"),
            PaymentMethodKind::Alipay
        );
        assert_eq!(
            PaymentMethodKind::classify("mobile_billing_non_sim", "att-us-nonsim"),
            PaymentMethodKind::NonSim
        );
    }

    #[test]
    fn generic_redirect_families() {
        assert!(PaymentMethodKind::classify("ewallet", "venmo").is_redirect());
        assert!(PaymentMethodKind::classify("online_bank_transfer", "paysafecard").is_redirect());
        assert_eq!(PaymentMethodKind::classify("invoice_credit", "klarna"), PaymentMethodKind::Other);
    }

    #[test]
    fn type_is_optional_only_for_wallets_and_direct_debit() {
        assert!(type_optional_for_family("ewallet"));
        assert!(type_optional_for_family("DIRECT_DEBIT"));
        assert!(!type_optional_for_family("credit_card"));
    }
}
