// SPDX-License-Identifier: BUSL-1.1
//! Default responses for requests nothing else answered.

pub mod canned;
pub mod pims;

pub use canned::CannedProvider;
pub use pims::PimsProvider;

use crate::mock_service::{EmulatedResponse, RecordedRequest};

/// Produces the response a service sends when no arrangement or scenario
/// applies.
pub trait DefaultProvider: Send + Sync {
    fn respond(&self, request: &RecordedRequest) -> EmulatedResponse;

    /// Restore the provider's initial state.
    fn reset(&self) {}
}
