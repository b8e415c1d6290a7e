//! # Client Actions
//!
//! A client action tells the caller what to do after a PI operation:
//! render a PIDL, follow a redirect, hand a context back to the host, or
//! show a failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pidl::PidlResource;
use crate::service_error::ServiceErrorResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientActionType {
    Pidl,
    Redirect,
    ReturnContext,
    Failure,
    UpdatePropertyValue,
    None,
}

/// The `clientAction` object attached to PIs and error responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAction {
    #[serde(rename = "type")]
    pub action_type: ClientActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_pidl: Option<Vec<PidlResource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<Box<ClientAction>>,
}

impl ClientAction {
    pub fn new(action_type: ClientActionType) -> Self {
        Self {
            action_type,
            context: None,
            redirect_pidl: None,
            next_action: None,
        }
    }

    /// A `Pidl` action whose context is the given PIDL list.
    pub fn pidl(pidls: Vec<PidlResource>) -> Self {
        let context = serde_json::to_value(pidls).ok();
        Self {
            context,
            ..Self::new(ClientActionType::Pidl)
        }
    }

    /// A `Redirect` action to `url`.
    pub fn redirect(url: impl Into<String>) -> Self {
        Self {
            context: Some(Value::String(url.into())),
            ..Self::new(ClientActionType::Redirect)
        }
    }

    pub fn return_context(context: Value) -> Self {
        Self {
            context: Some(context),
            ..Self::new(ClientActionType::ReturnContext)
        }
    }

    /// A `Failure` action carrying a service error whose outer code is the
    /// HTTP status name and whose inner error holds the user-facing message.
    pub fn failure(status: u16, error_code: &str, message: &str) -> Self {
        let mut inner = ServiceErrorResponse::new(error_code, message);
        inner.user_display_message = Some(message.to_string());
        let mut outer = ServiceErrorResponse::new(status_name(status), message);
        outer.inner_error = Some(Box::new(inner));
        Self {
            context: serde_json::to_value(outer).ok(),
            ..Self::new(ClientActionType::Failure)
        }
    }

    pub fn with_redirect_pidl(mut self, pidls: Vec<PidlResource>) -> Self {
        self.redirect_pidl = Some(pidls);
        self
    }

    /// The PIDLs carried by a `Pidl` action, if its context holds a list.
    pub fn pidl_context(&self) -> Option<Vec<PidlResource>> {
        if self.action_type != ClientActionType::Pidl {
            return None;
        }
        self.context
            .as_ref()
            .and_then(|c| serde_json::from_value(c.clone()).ok())
    }
}

/// PascalCase name of an HTTP status, as used in failure envelopes.
pub fn status_name(status: u16) -> &'static str {
    match status {
        400 => "BadRequest",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "NotFound",
        409 => "Conflict",
        429 => "TooManyRequests",
        500 => "InternalServerError",
        502 => "BadGateway",
        503 => "ServiceUnavailable",
        _ => "Unknown",
    }
}
