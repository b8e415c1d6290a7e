//! # User-Facing Messages
//!
//! English strings shown to users when a downstream error is mapped onto a
//! form field, with the PIDL property names they target. The two common
//! maps (credit card, direct debit) are exposed as lookups; the smaller
//! families are plain constants consumed by the service's error mapping.

pub const GENERIC: &str = "Try that again. Something happened on our end. Waiting a bit can help.";

/// A user-facing message bound to one or more comma-separated PIDL targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMessage {
    pub message: &'static str,
    pub target: &'static str,
}

const fn field(message: &'static str, target: &'static str) -> FieldMessage {
    FieldMessage { message, target }
}

pub mod credit_card {
    pub const VALIDATION_FAILED: &str =
        "Check that the details in all fields are correct or try a different card.";
    pub const EXPIRED_CARD: &str = "Check your expiration date.";
    pub const INVALID_ACCOUNT_HOLDER: &str =
        "Check your name on the card. There appears to be an error in it.";
    pub const INVALID_ADDRESS: &str = "Check your address. There appears to be an error in it.";
    pub const INVALID_CITY: &str =
        "Check the city in your address. There appears to be an error in it.";
    pub const INVALID_COUNTRY: &str =
        "Choose your country or region again. There appears to be an error in it.";
    pub const INVALID_CVV: &str = "Check your security code. There appears to be an error in it.";
    pub const INVALID_EXPIRY_DATE: &str = "Try a different way to pay. This card has expired.";
    pub const INVALID_CARD_NUMBER: &str = "Check your info. The card number entered is invalid.";
    pub const INVALID_STATE: &str =
        "Check the state in your address. There appears to be an error in it.";
    pub const INVALID_ZIP_CODE: &str =
        "Check the Zip or Postal code in your address. There appears to be an error in it.";
    pub const PREPAID_CARD_NOT_SUPPORTED: &str =
        "Sorry, we can't accept pre-paid cards. Please try another payment method.";
    pub const INVALID_ISSUER_RESPONSE: &str =
        "The card is not enabled for 3ds/otp authentication in India.";

    pub const TARGET_CARD_NUMBER: &str = "accountToken";
    pub const TARGET_CVV: &str = "cvvToken";
    pub const TARGET_EXPIRY: &str = "expiryMonth,expiryYear";
    pub const TARGET_ADDRESS: &str =
        "address_line1,address_line2,address_line3,city,region,country,postal_code";
}

pub mod direct_debit {
    pub const VALIDATION_FAILED_ACH: &str =
        "Check your bank account and routing numbers. The current pair isn't working.";
    pub const VALIDATION_FAILED_SEPA: &str =
        "Check your BIC and IBAN. The current pair isn't working.";
    pub const INVALID_ACCOUNT_HOLDER: &str = "Check your name. This one's not right.";
    pub const INVALID_ADDRESS: &str = "Check your address. This one's not right.";
    pub const INVALID_BANK_CODE_ACH: &str = "Check your bank routing number. This one's not right.";
    pub const INVALID_BANK_CODE_SEPA: &str = "Check your bank code. This one's not right.";
    pub const INVALID_CITY: &str = "Check your city. Something's not right.";
    pub const INVALID_PI_INFO_ACH: &str = "Check your bank account number. This one's not right.";
    pub const INVALID_PI_INFO_SEPA: &str = "Check your IBAN. This one's not right.";
    pub const INVALID_STATE: &str = "Check your state. Something's not right.";
    pub const INVALID_ZIP_CODE: &str = "Check your zip code. This one's not right.";
    pub const INVALID_AMOUNT: &str = "The amount you entered is incorrect.";

    pub const TARGET_ACCOUNT: &str = "accountToken";
    pub const TARGET_BANK_CODE: &str = "bankCode";
    pub const TARGET_AMOUNT: &str = "amount";
    pub const TARGET_ADDRESS: &str = "address_line1,address_line2,city,region,postal_code";
}

pub mod cup {
    pub const INVALID_PHONE_OR_CARD: &str = "Check your card and phone numbers. They don’t go together.";
    pub const TOO_MANY_SMS_REQUESTS: &str =
        "Wait a bit before you ask for a new code. Your requests exceeded the limit.";
    pub const INVALID_SMS_CODE: &str = "Check your code. The one entered isn't valid.";
    pub const SMS_CODE_EXPIRED: &str = "Request a new code. This one expired.";
    pub const INVALID_PHONE_OR_CVV: &str = "Check your card security code and your phone number.";
    pub const INVALID_CARD_NUMBER: &str = "Check your card number. This one isn't valid.";
    pub const INVALID_PHONE_NUMBER: &str = "Check your phone number. This one isn't valid.";

    pub const TARGET_PHONE: &str = "phone";
    pub const TARGET_CARD_NUMBER: &str = "accountToken";
    pub const TARGET_CVV: &str = "cvvToken";
    pub const TARGET_SMS: &str = "pin";
}

pub mod alipay {
    pub const INVALID_ACCOUNT: &str =
        "Check your AliPay account info. There appears to be an error in it.";
    pub const USER_MOBILE_NOT_MATCH: &str =
        "Check your mobile number. There appears to be an error in it.";
    pub const USER_CERT_NO_MATCH: &str =
        "Check your last 5 digits info. There appears to be an error in it.";
    pub const INVALID_CHALLENGE_CODE: &str = "Check your code. The one entered isn't valid.";
    pub const CHALLENGE_CODE_EXPIRED: &str = "Request a new code. This one expired.";

    pub const TARGET_PHONE: &str = "phone";
    pub const TARGET_ACCOUNT: &str = "alipayAccount";
    pub const TARGET_SMS: &str = "pin";
    pub const TARGET_LAST_FIVE_CERT_NO: &str = "lastFiveCertNo";
}

pub mod non_sim {
    pub const REJECTED_BY_PROVIDER: &str =
        "Check your phone number. The mobile operator you selected says it's not valid.";
    pub const MO_ACCOUNT_NOT_FOUND: &str =
        "Check your phone number. The mobile operator you selected can't find that number.";
    pub const INVALID_CHALLENGE_CODE: &str =
        "Check and re-enter the code. The code you entered is not valid.";
    pub const PI_ADDED_ALREADY: &str =
        "The instrument duplicated with an existing instrument for same account.";

    pub const TARGET_PHONE: &str = "msisdn";
    pub const TARGET_SMS: &str = "pin";
}

pub mod paypal {
    pub const INCORRECT_CREDENTIAL: &str = "Check your PayPal sign-in info for errors.";
    pub const TARGET_CREDENTIALS: &str = "email,encryptedPassword";
}

pub mod csv {
    pub const COULD_NOT_VALIDATE: &str = "Couldn't validate CSV token. Please try again later.";
    pub const INVALID_TOKEN: &str = "Invalid CSV token. Please try again.";
}

pub const SUBSCRIPTION_NOT_CANCELED: &str = "You have subscriptions/orders that use this payment method. Please update the subscriptions/orders to use a different payment method before removing this one.";

/// Common credit-card map.
pub fn credit_card_error(code: &str) -> Option<FieldMessage> {
    use credit_card::*;
    let mapped = match code {
        "InvalidCvv" => field(INVALID_CVV, TARGET_CVV),
        "InvalidAccountHolder" => field(INVALID_ACCOUNT_HOLDER, "accountHolderName"),
        "ExpiredCard" => field(EXPIRED_CARD, TARGET_EXPIRY),
        "InvalidExpiryDate" => field(INVALID_EXPIRY_DATE, TARGET_EXPIRY),
        "InvalidCity" => field(INVALID_CITY, "city"),
        "InvalidState" => field(INVALID_STATE, "region"),
        "InvalidZipCode" => field(INVALID_ZIP_CODE, "postal_code"),
        "InvalidCountry" | "InvalidCountryCode" => field(INVALID_COUNTRY, "country"),
        "InvalidAddress" => field(INVALID_ADDRESS, TARGET_ADDRESS),
        _ => return None,
    };
    Some(mapped)
}

/// Common direct-debit map. ACH and SEPA differ only in wording.
pub fn direct_debit_error(code: &str, sepa: bool) -> Option<FieldMessage> {
    use direct_debit::*;
    let pick = |ach: &'static str, sepa_text: &'static str| if sepa { sepa_text } else { ach };
    let mapped = match code {
        "ValidationFailed" => field(
            pick(VALIDATION_FAILED_ACH, VALIDATION_FAILED_SEPA),
            "bankCode,accountToken",
        ),
        "InvalidPaymentInstrumentInfo" => {
            field(pick(INVALID_PI_INFO_ACH, INVALID_PI_INFO_SEPA), TARGET_ACCOUNT)
        }
        "InvalidBankCode" => field(
            pick(INVALID_BANK_CODE_ACH, INVALID_BANK_CODE_SEPA),
            TARGET_BANK_CODE,
        ),
        "InvalidAccountHolder" => field(INVALID_ACCOUNT_HOLDER, "accountHolderName"),
        "InvalidCity" => field(INVALID_CITY, "city"),
        "InvalidState" => field(INVALID_STATE, "region"),
        "InvalidZipCode" => field(INVALID_ZIP_CODE, "postal_code"),
        "InvalidAddress" => field(INVALID_ADDRESS, TARGET_ADDRESS),
        "InvalidAmount" => field(INVALID_AMOUNT, TARGET_AMOUNT),
        _ => return None,
    };
    Some(mapped)
}
