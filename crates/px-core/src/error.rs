//! # Error Types
//!
//! Errors raised while parsing client-supplied headers and payloads, plus
//! QR rendering failures. The service maps parse errors to
//! `InvalidRequestData`.

use thiserror::Error;

/// Errors from pure parsing and rendering in `px-core`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PxCoreError {
    /// A client-context header (`x-ms-deviceinfo`, `x-ms-msaprofile`, ...)
    /// did not follow the `key="value",key2="value2"` grammar.
    #[error("malformed client context header {header}: {reason}")]
    MalformedClientContext {
        /// Header name.
        header: String,
        /// What went wrong.
        reason: String,
    },

    /// A base64-encoded client-context value could not be decoded.
    #[error("client context value for {key} is not valid base64")]
    InvalidEncoding {
        /// The key whose value failed to decode.
        key: String,
    },

    /// A required payload property was absent.
    #[error("{0} is missing")]
    MissingProperty(String),

    /// The URL could not be encoded as a QR code (too long) or the PNG
    /// encoder failed.
    #[error("QR code could not be rendered: {0}")]
    QrCode(String),
}
