// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All environment variables read by testbed are defined here. Builder
//! settings take precedence over them.

use std::path::PathBuf;

/// Name of the fail-fast override
pub const TESTBED_FAIL_FAST: &str = "TESTBED_FAIL_FAST";

/// Name of the JSONL report path
pub const TESTBED_REPORT_FILE: &str = "TESTBED_REPORT_FILE";

/// `TESTBED_FAIL_FAST`: `0`/`false`/`no`/`off` disable fail-fast,
/// `1`/`true`/`yes`/`on` enable it. Anything else is ignored.
pub fn fail_fast() -> Option<bool> {
    var_bool(TESTBED_FAIL_FAST)
}

/// `TESTBED_REPORT_FILE`: append one JSON line per failed expectation.
pub fn report_file() -> Option<PathBuf> {
    std::env::var_os(TESTBED_REPORT_FILE)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn var_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
