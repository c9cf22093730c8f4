// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge from the `log` facade to the [`Stream::Log`] sink.

use crate::error::CaptureError;
use crate::sink::{self, Stream};
use log::{Log, Metadata, Record};
use std::sync::OnceLock;

/// Target used by testbed for its own diagnostics; never rendered into
/// the log sink.
pub const INTERNAL_TARGET: &str = "testbed::internal";

struct SinkLogger;

static LOGGER: SinkLogger = SinkLogger;
static INSTALLED: OnceLock<bool> = OnceLock::new();

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.target() != INTERNAL_TARGET
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = sink::write(Stream::Log, format_record(record).as_bytes());
    }

    fn flush(&self) {}
}

/// Render one record the way it lands in the log sink
pub fn format_record(record: &Record<'_>) -> String {
    format!("{} {}\n", record.level(), record.args())
}

/// Install the sink logger as the process `log` implementation.
///
/// Idempotent. Fails when some other logger claimed the facade first.
pub fn install() -> Result<(), CaptureError> {
    let installed = *INSTALLED.get_or_init(|| log::set_logger(&LOGGER).is_ok());
    if installed {
        Ok(())
    } else {
        Err(CaptureError::LoggerUnavailable)
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
