//! # px-core — Domain Model for the Payment Experience Service
//!
//! The types every other `px-*` crate shares: the payment instrument record
//! owned by PIMS, the PIDL resource tree the service emits for clients to
//! render, client actions, the service error envelope, flights, and partner
//! settings.
//!
//! ## Wire Contracts
//!
//! - [`PaymentInstrument`] mirrors the PIMS JSON contract (camelCase).
//! - [`ServiceErrorResponse`] mirrors the PascalCase error envelope that both
//!   PIMS and the payment experience service return.
//! - [`PidlResource`] and [`DisplayHint`] mirror the PIDL contract consumed
//!   by the PIDL SDK.
//!
//! Unknown fields on payment instruments are preserved verbatim so that a
//! PI read from PIMS and returned to a client is never silently truncated.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `px-*` crates (this is the leaf of the DAG).
//! - No I/O. Header parsing and predicates are pure functions.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod client_action;
pub mod client_context;
pub mod csv_token;
pub mod error;
pub mod flights;
pub mod messages;
pub mod partner;
pub mod payment_instrument;
pub mod payment_method;
pub mod pidl;
pub mod service_error;

pub use client_action::{ClientAction, ClientActionType};
pub use client_context::ClientContext;
pub use csv_token::{CsvTokenRedemptionResult, CsvTokenStatus, CsvTokenValidationResult};
pub use error::PxCoreError;
pub use flights::Flights;
pub use partner::{FeatureConfig, PaymentExperienceSetting, RedirectionPattern};
pub use payment_instrument::{
    PaymentInstrument, PaymentInstrumentDetails, PaymentInstrumentStatus, PaymentMethod,
    PicvDetails,
};
pub use payment_method::PaymentMethodKind;
pub use pidl::{DisplayHint, PidlAction, PidlResource};
pub use service_error::{ErrorCode, ServiceErrorDetail, ServiceErrorResponse};
