// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide output sink interception for tests.
//!
//! Code under test writes through the sink registry (the `capture_print!`
//! family of macros, [`sink::writer`], or the `log` facade). A
//! [`StreamCapture`] redirects any combination of stdout, stderr and the log
//! stream into per-test buffers and restores the previous handles when it
//! is released or dropped.

mod buffer;
mod capture;
mod error;
pub mod logger;
mod mode;
mod serial;
pub mod sink;

pub use buffer::CaptureBuffer;
pub use capture::StreamCapture;
pub use error::CaptureError;
pub use mode::CaptureMode;
pub use serial::serial;
pub use sink::{SinkHandle, SinkWriter, Stream};

/// Print to the stdout sink.
#[macro_export]
macro_rules! capture_print {
    ($($arg:tt)*) => {
        $crate::sink::write_fmt($crate::Stream::Stdout, format_args!($($arg)*))
    };
}

/// Print a line to the stdout sink.
#[macro_export]
macro_rules! capture_println {
    () => {
        $crate::sink::write_line($crate::Stream::Stdout, format_args!(""))
    };
    ($($arg:tt)*) => {
        $crate::sink::write_line($crate::Stream::Stdout, format_args!($($arg)*))
    };
}

/// Print to the stderr sink.
#[macro_export]
macro_rules! capture_eprint {
    ($($arg:tt)*) => {
        $crate::sink::write_fmt($crate::Stream::Stderr, format_args!($($arg)*))
    };
}

/// Print a line to the stderr sink.
#[macro_export]
macro_rules! capture_eprintln {
    () => {
        $crate::sink::write_line($crate::Stream::Stderr, format_args!(""))
    };
    ($($arg:tt)*) => {
        $crate::sink::write_line($crate::Stream::Stderr, format_args!($($arg)*))
    };
}
