// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Assertion and fault-injection harness.
//!
//! A [`Harness`] scopes one test: it captures stdout, stderr and the log
//! stream, records checks, scripts the clock and the argument vector, and
//! owns temporary files. Everything it takes is given back on release,
//! whichever way the test exits.
//!
//! ```ignore
//! let mut h = Harness::new(CaptureMode::StdoutStderr)?;
//! capture_println!("hello");
//! h.check_stdout(&["hello"], ());
//! ```
//!
//! The building blocks are usable on their own: [`IoDouble`] for scripted
//! I/O faults, [`diff_lines`] for line alignment, [`ScriptedClock`] for
//! time, and the `expect_*` functions in [`compare`].

pub mod args;
pub mod clock;
pub mod compare;
pub mod diff;
pub mod env;
mod error;
mod harness;
mod iodouble;
mod message;
pub mod panic;
mod resources;

pub use clock::{Clock, ScriptedClock, SystemClock};
pub use compare::{CheckKind, Expectation};
pub use diff::{diff_lines, DiffLine, LineDiff};
pub use error::{HarnessError, Result};
pub use harness::{render_failures, Harness, HarnessBuilder};
pub use iodouble::{EofPolicy, IoDouble, Transfer};
pub use message::Message;
pub use panic::Outcome;
pub use resources::TempResources;

/// Re-exported capture types from the testbed-capture crate.
pub use testbed_capture::{
    capture_eprint, capture_eprintln, capture_print, capture_println, serial, sink, CaptureBuffer,
    CaptureError, CaptureMode, SinkHandle, SinkWriter, Stream, StreamCapture,
};
