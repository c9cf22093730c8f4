// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Panics captured as values.

use crate::compare::{CheckKind, Expectation};
use crate::message::Message;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Result of running code that may panic
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Returned normally
    Completed(T),
    /// Panicked with this payload
    Aborted(String),
}

impl<T> Outcome<T> {
    /// Check whether the code panicked
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted(_))
    }

    /// The panic payload, if the code panicked
    pub fn payload(&self) -> Option<&str> {
        match self {
            Outcome::Aborted(payload) => Some(payload),
            Outcome::Completed(_) => None,
        }
    }

    /// The returned value, if the code completed
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Aborted(_) => None,
        }
    }
}

/// Extract the message from a panic payload
pub fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// Run `f`, converting a panic into [`Outcome::Aborted`]
pub fn catch<T, F>(f: F) -> Outcome<T>
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Outcome::Completed(value),
        Err(payload) => Outcome::Aborted(payload_text(payload.as_ref())),
    }
}

/// Compare an outcome against the wanted panic payload.
///
/// `want = None` expects the code to complete without panicking.
pub fn expect_panic<T>(
    outcome: &Outcome<T>,
    want: Option<&str>,
    message: impl Into<Message>,
) -> Expectation {
    let describe = |payload: Option<&str>| match payload {
        Some(p) => format!("panic {:?}", p),
        None => "no panic".to_string(),
    };
    let got = outcome.payload();
    let exp = Expectation::new(CheckKind::Panic, describe(got), describe(want), message.into());
    if got == want {
        return exp;
    }
    exp.fail(match (got, want) {
        (None, Some(_)) => "code completed but a panic was wanted",
        (Some(_), None) => "code panicked unexpectedly",
        _ => "panic payload differs",
    })
}

#[cfg(test)]
#[path = "panic_tests.rs"]
mod tests;
