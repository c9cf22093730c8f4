// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness errors.

use testbed_capture::CaptureError;
use thiserror::Error;

/// Errors raised by the harness itself.
///
/// Injected faults are not harness errors; they are ordinary `io::Error`
/// values handed to the code under test.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Misconfigured setup: double registration, malformed script, etc.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A script was consumed past its end
    #[error("script exhausted: {0}")]
    Exhausted(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The substituted arguments did not parse
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        HarnessError::Configuration(message.into())
    }

    /// Check whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HarnessError::Configuration(_) | HarnessError::Capture(_)
        )
    }
}

/// Result alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
