// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction for deterministic testing.
//!
//! Code under test asks [`now`] (or a [`Clock`] it was handed) for the
//! current instant. Tests install a [`ScriptedClock`] that replays a fixed
//! sequence of instants and fails loudly when the sequence runs out.

use crate::error::{HarnessError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};

/// Clock trait for time abstraction
pub trait Clock: Send + Sync {
    /// Get the current instant
    fn now(&self) -> DateTime<Utc>;

    /// Get current time as milliseconds since epoch
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Real clock using system time
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct Script {
    instants: Vec<DateTime<Utc>>,
    cursor: usize,
    format: Option<String>,
}

/// Clock replaying a finite script of instants.
///
/// Clones share one script, so a clone handed to the code under test and
/// the harness's copy advance together.
#[derive(Clone, Debug)]
pub struct ScriptedClock {
    script: Arc<Mutex<Script>>,
}

impl ScriptedClock {
    /// Script `initial`, then each instant `delta` after the previous one
    pub fn new(initial: DateTime<Utc>, deltas: &[TimeDelta]) -> Result<Self> {
        let mut instants = Vec::with_capacity(deltas.len() + 1);
        instants.push(initial);
        let mut current = initial;
        for (i, delta) in deltas.iter().enumerate() {
            if *delta < TimeDelta::zero() {
                return Err(HarnessError::config(format!(
                    "clock delta {} is negative: {}",
                    i + 1,
                    delta
                )));
            }
            current = current.checked_add_signed(*delta).ok_or_else(|| {
                HarnessError::config(format!("clock delta {} overflows the instant range", i + 1))
            })?;
            instants.push(current);
        }
        Ok(Self {
            script: Arc::new(Mutex::new(Script {
                instants,
                cursor: 0,
                format: None,
            })),
        })
    }

    /// Next scripted instant, or `Exhausted` once the script is used up
    pub fn try_next(&self) -> Result<DateTime<Utc>> {
        let mut script = self.script.lock();
        let Some(instant) = script.instants.get(script.cursor).copied() else {
            return Err(HarnessError::Exhausted(format!(
                "clock script of {} instants consumed",
                script.instants.len()
            )));
        };
        script.cursor += 1;
        Ok(instant)
    }

    /// Render instants with `format` (strftime syntax) for [`tokens`](Self::tokens)
    pub fn set_format(&self, format: &str) -> Result<()> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(HarnessError::config(format!(
                "malformed clock format {:?}",
                format
            )));
        }
        let mut script = self.script.lock();
        if script.format.is_some() {
            return Err(HarnessError::config("clock format already set"));
        }
        script.format = Some(format.to_string());
        Ok(())
    }

    /// Substitution pairs `{{clkTS<i>}}` -> formatted instant `i`.
    ///
    /// Empty until a format is set.
    pub fn tokens(&self) -> Vec<(String, String)> {
        let script = self.script.lock();
        let Some(format) = &script.format else {
            return Vec::new();
        };
        script
            .instants
            .iter()
            .enumerate()
            .map(|(i, instant)| {
                (
                    format!("{{{{clkTS{}}}}}", i),
                    instant.format(format).to_string(),
                )
            })
            .collect()
    }

    /// Every scripted instant, consumed or not
    pub fn instants(&self) -> Vec<DateTime<Utc>> {
        self.script.lock().instants.clone()
    }

    /// Instants not yet handed out
    pub fn remaining(&self) -> usize {
        let script = self.script.lock();
        script.instants.len() - script.cursor
    }
}

impl Clock for ScriptedClock {
    #[allow(clippy::panic)]
    fn now(&self) -> DateTime<Utc> {
        match self.try_next() {
            Ok(instant) => instant,
            Err(e) => panic!("{}", e),
        }
    }
}

static INSTALLED: LazyLock<Mutex<Option<Arc<dyn Clock>>>> = LazyLock::new(|| Mutex::new(None));

/// Current instant from the installed clock, or the system clock
pub fn now() -> DateTime<Utc> {
    // Clone out of the slot so a panicking clock never holds the lock.
    let clock = INSTALLED.lock().clone();
    match clock {
        Some(clock) => clock.now(),
        None => Utc::now(),
    }
}

/// Whether a clock is installed process-wide
pub fn is_installed() -> bool {
    INSTALLED.lock().is_some()
}

/// Restores the system clock when dropped
#[derive(Debug)]
#[must_use = "the clock is uninstalled when the override is dropped"]
pub struct ClockOverride {
    _private: (),
}

impl Drop for ClockOverride {
    fn drop(&mut self) {
        *INSTALLED.lock() = None;
    }
}

/// Route [`now`] to `clock` until the returned guard drops
pub fn install(clock: Arc<dyn Clock>) -> Result<ClockOverride> {
    let mut slot = INSTALLED.lock();
    if slot.is_some() {
        return Err(HarnessError::config("a clock is already installed"));
    }
    *slot = Some(clock);
    Ok(ClockOverride { _private: () })
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
