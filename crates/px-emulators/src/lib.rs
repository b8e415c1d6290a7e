// SPDX-License-Identifier: BUSL-1.1
//! # px-emulators
//!
//! In-memory stand-ins for every downstream service the payment experience
//! service calls. One axum server hosts all of them, each under its own path
//! prefix (`/pims/...`, `/partnersettings/...`, ...).
//!
//! Every service is a [`MockService`]: responses arranged by a test win,
//! then any `x-ms-test` scenario the request selects, then the service's
//! default provider. PIMS defaults are stateful (an in-memory PI store
//! seeded with canned instruments); the other services answer with canned
//! JSON.
//!
//! State lives in the [`Emulators`] value owned by each [`EmulatorServer`],
//! so concurrently running tests never see each other's arrangements.

pub mod error;
pub mod mock_service;
pub mod providers;
pub mod scenarios;
pub mod server;
pub mod service;

pub use error::EmulatorError;
pub use mock_service::{EmulatedResponse, MockService, RecordedRequest};
pub use scenarios::{Scenario, ScenarioRegistry, TestHeader};
pub use server::{router, EmulatorServer, Emulators};
pub use service::EmulatedService;
