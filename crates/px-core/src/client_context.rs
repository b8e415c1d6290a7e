//! # Client Context Headers
//!
//! `x-ms-deviceinfo`, `x-ms-msaprofile` and `x-ms-aadinfo` carry a list of
//! `key="value"` pairs separated by commas. When the request also sends
//! `x-ms-clientcontext-encoding: base64`, each value is base64 encoded.
//!
//! Keys are matched case-insensitively. Quoted values may contain commas.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::PxCoreError;

/// Header announcing base64-encoded client context values.
pub const ENCODING_HEADER: &str = "x-ms-clientcontext-encoding";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    values: BTreeMap<String, String>,
}

impl ClientContext {
    /// Parse one header value.
    pub fn parse(header: &str, raw: &str, base64_encoded: bool) -> Result<Self, PxCoreError> {
        let mut values = BTreeMap::new();
        for (key, value) in split_pairs(header, raw)? {
            let value = if base64_encoded {
                let bytes = STANDARD
                    .decode(value.as_bytes())
                    .map_err(|_| PxCoreError::InvalidEncoding { key: key.clone() })?;
                String::from_utf8(bytes).map_err(|_| PxCoreError::InvalidEncoding { key: key.clone() })?
            } else {
                value
            };
            values.insert(key.to_ascii_lowercase(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.get("ipAddress")
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.get("userAgent")
    }

    pub fn puid(&self) -> Option<&str> {
        self.get("PUID").filter(|p| !p.is_empty())
    }
}

fn split_pairs(header: &str, raw: &str) -> Result<Vec<(String, String)>, PxCoreError> {
    let malformed = |reason: &str| PxCoreError::MalformedClientContext {
        header: header.to_string(),
        reason: reason.to_string(),
    };

    let mut pairs = Vec::new();
    let mut rest = raw.trim();
    while !rest.is_empty() {
        let eq = rest.find('=').ok_or_else(|| malformed("expected key=value"))?;
        let key = rest[..eq].trim();
        if key.is_empty() {
            return Err(malformed("empty key"));
        }
        let after = rest[eq + 1..].trim_start();

        let (value, remainder) = if let Some(quoted) = after.strip_prefix('"') {
            let close = quoted.find('"').ok_or_else(|| malformed("unterminated quote"))?;
            (&quoted[..close], &quoted[close + 1..])
        } else {
            let end = after.find(',').unwrap_or(after.len());
            (after[..end].trim(), &after[end..])
        };

        pairs.push((key.to_string(), value.to_string()));

        let remainder = remainder.trim_start();
        rest = match remainder.strip_prefix(',') {
            Some(r) => r.trim_start(),
            None if remainder.is_empty() => remainder,
            None => return Err(malformed("expected ',' between pairs")),
        };
    }
    Ok(pairs)
}
