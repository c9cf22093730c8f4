// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Serialization of tests that touch process-wide state.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::sync::LazyLock;

static SERIAL: LazyLock<ReentrantMutex<()>> = LazyLock::new(|| ReentrantMutex::new(()));

/// Acquire the process-wide test guard.
///
/// The guard is re-entrant, so a test that holds it can still build a
/// harness (which takes it again) on the same thread. Tests in one binary
/// that swap sinks, the clock or the argument vector should hold it for
/// their whole body.
pub fn serial() -> ReentrantMutexGuard<'static, ()> {
    SERIAL.lock()
}
