// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Substitutable process arguments.
//!
//! Code under test reads its argument vector through [`current`] rather
//! than `std::env::args`, so a test can swap the vector for its duration.

use crate::error::{HarnessError, Result};
use clap::Parser;
use parking_lot::Mutex;
use std::sync::LazyLock;
use testbed_capture::{sink, Stream};

static OVERRIDE: LazyLock<Mutex<Option<Vec<String>>>> = LazyLock::new(|| Mutex::new(None));

/// The substituted argument vector, or the real one
pub fn current() -> Vec<String> {
    match &*OVERRIDE.lock() {
        Some(args) => args.clone(),
        None => std::env::args().collect(),
    }
}

/// Whether an argument vector is substituted
pub fn is_overridden() -> bool {
    OVERRIDE.lock().is_some()
}

/// Restores the real argument vector when dropped
#[derive(Debug)]
#[must_use = "the arguments are restored when the override is dropped"]
pub struct ArgsOverride {
    _private: (),
}

impl ArgsOverride {
    /// Replace the substituted vector without releasing the slot
    pub fn replace<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *OVERRIDE.lock() = Some(args.into_iter().map(Into::into).collect());
    }
}

impl Drop for ArgsOverride {
    fn drop(&mut self) {
        *OVERRIDE.lock() = None;
    }
}

/// Make [`current`] return `args` until the guard drops
pub fn install<I, S>(args: I) -> Result<ArgsOverride>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut slot = OVERRIDE.lock();
    if slot.is_some() {
        return Err(HarnessError::config("arguments are already substituted"));
    }
    *slot = Some(args.into_iter().map(Into::into).collect());
    Ok(ArgsOverride { _private: () })
}

/// Parse [`current`] with `C`.
///
/// On failure the rendered message goes to the stdout sink for help and
/// version requests, and to the stderr sink otherwise, the same split
/// clap makes when it exits the process itself.
pub fn parse<C: Parser>() -> std::result::Result<C, clap::Error> {
    C::try_parse_from(current()).inspect_err(|e| {
        let stream = if e.use_stderr() {
            Stream::Stderr
        } else {
            Stream::Stdout
        };
        let _ = sink::write(stream, e.render().to_string().as_bytes());
    })
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
