// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared in-memory capture buffer.

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Thread-safe append-only byte buffer.
///
/// Clones share the same storage, so a buffer handed to a sink and the
/// copy kept by the capture observe the same bytes. Every append happens
/// under one lock, which keeps append order equal to real-time write order
/// when several threads write at once.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes as one atomic unit
    pub fn append(&self, data: &[u8]) {
        self.bytes.lock().extend_from_slice(data);
    }

    /// Raw captured bytes
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.lock().clone()
    }

    /// Captured bytes as text (lossy for invalid UTF-8)
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Captured text split into lines.
    ///
    /// A trailing newline does not produce an empty final line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Number of captured bytes
    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    /// Check if nothing has been captured
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }

    /// Discard everything captured so far
    pub fn clear(&self) {
        self.bytes.lock().clear();
    }

    /// Check whether two buffers share storage
    pub fn ptr_eq(&self, other: &CaptureBuffer) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl io::Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
