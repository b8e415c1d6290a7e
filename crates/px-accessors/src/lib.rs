//! # px-accessors — Downstream Service Clients
//!
//! Typed HTTP clients for every service the payment experience service
//! depends on. Each service has an object-safe async trait (so handlers
//! and tests can swap implementations) and one `reqwest` implementation.
//!
//! ## Services
//!
//! | Module | Service |
//! |---|---|
//! | [`pims`] | Payment Instrument Management |
//! | [`partner_settings`] | Partner settings (templates, features) |
//! | [`accounts`] | Account profiles |
//! | [`token_policy`] | CSV token description |
//! | [`catalog`] | Product catalog |
//! | [`purchase`] | CSV token redemption orders |
//! | [`orchestration`] | PI replace / remove |
//! | [`network_tokenization`] | Network tokens and card art |
//! | [`challenge_management`] | Challenge sessions |
//! | [`fraud_detection`] | Bot check |
//! | [`issuer`] | Co-branded card apply |
//! | [`stored_value`] | Stored value funding |
//!
//! ## Error Handling
//!
//! Non-2xx answers are parsed into a [`px_core::ServiceErrorResponse`] and
//! returned as [`AccessorError::Service`] so the service can map them to
//! user-facing messages. Transport failures on idempotent GETs are retried
//! per each accessor's [`RetryPolicy`]; writes are never retried.

pub mod accounts;
pub mod catalog;
pub mod challenge_management;
pub mod config;
pub mod context;
pub mod error;
pub mod fraud_detection;
mod http;
pub mod issuer;
pub mod network_tokenization;
pub mod orchestration;
pub mod partner_settings;
pub mod pims;
pub mod purchase;
pub mod retry;
pub mod stored_value;
pub mod suite;
pub mod token_policy;

pub use config::{AccessorConfig, ServiceEndpoints};
pub use context::AccessorContext;
pub use error::AccessorError;
pub use retry::RetryPolicy;
pub use suite::AccessorSuite;
