// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture errors.

use crate::sink::Stream;
use thiserror::Error;

/// Errors raised while starting a capture
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("{0} is already captured by another active capture")]
    AlreadyCaptured(Stream),

    #[error("another logger owns the log facade; the log stream cannot be captured")]
    LoggerUnavailable,
}
