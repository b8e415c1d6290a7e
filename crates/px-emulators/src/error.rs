// SPDX-License-Identifier: BUSL-1.1
//! Emulator errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("invalid scenario definitions: {0}")]
    Scenarios(#[from] serde_yaml::Error),

    #[error("scenario {scenario} targets unknown service {service}")]
    UnknownService { scenario: String, service: String },

    #[error("failed to bind emulator listener: {0}")]
    Bind(#[from] std::io::Error),
}
