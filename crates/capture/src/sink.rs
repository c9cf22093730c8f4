// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of process-wide output sinks.
//!
//! Code under test writes to a logical [`Stream`] instead of touching the
//! real stdout/stderr directly. The registry maps each stream to its
//! currently active [`SinkHandle`]; a capture swaps the handle for one that
//! points at a [`CaptureBuffer`] and puts the previous handle back when it
//! is released.

use crate::buffer::CaptureBuffer;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, LazyLock};

/// Logical output stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stream {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
    /// Output of the `log` facade
    Log,
}

impl Stream {
    /// All streams in registry order
    pub const ALL: [Stream; 3] = [Stream::Stdout, Stream::Stderr, Stream::Log];

    fn index(self) -> usize {
        match self {
            Stream::Stdout => 0,
            Stream::Stderr => 1,
            Stream::Log => 2,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => write!(f, "stdout"),
            Stream::Stderr => write!(f, "stderr"),
            Stream::Log => write!(f, "log"),
        }
    }
}

enum Target {
    Stdout,
    Stderr,
    Buffer(CaptureBuffer),
}

/// Handle to the destination of a stream.
///
/// Handles are compared by identity with [`SinkHandle::ptr_eq`]; two
/// handles to the real stdout created separately are distinct.
#[derive(Clone)]
pub struct SinkHandle(Arc<Target>);

impl SinkHandle {
    /// Handle writing to the real process stdout
    pub fn stdout() -> Self {
        Self(Arc::new(Target::Stdout))
    }

    /// Handle writing to the real process stderr
    pub fn stderr() -> Self {
        Self(Arc::new(Target::Stderr))
    }

    /// Handle appending to a capture buffer
    pub fn buffer(buffer: CaptureBuffer) -> Self {
        Self(Arc::new(Target::Buffer(buffer)))
    }

    /// The capture buffer behind this handle, if any
    pub fn as_buffer(&self) -> Option<&CaptureBuffer> {
        match self.0.as_ref() {
            Target::Buffer(buf) => Some(buf),
            Target::Stdout | Target::Stderr => None,
        }
    }

    /// Check handle identity
    pub fn ptr_eq(&self, other: &SinkHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Write all bytes as one unit
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        match self.0.as_ref() {
            Target::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(data)?;
                out.flush()
            }
            Target::Stderr => io::stderr().lock().write_all(data),
            Target::Buffer(buf) => {
                buf.append(data);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_ref() {
            Target::Stdout => write!(f, "SinkHandle(stdout)"),
            Target::Stderr => write!(f, "SinkHandle(stderr)"),
            Target::Buffer(buf) => write!(f, "SinkHandle({:?})", buf),
        }
    }
}

struct Slot {
    current: SinkHandle,
    captured: bool,
}

/// Active handle per stream, guarded by one lock.
pub(crate) struct Registry {
    slots: [Slot; 3],
}

impl Registry {
    fn new() -> Self {
        // The log facade writes to stderr unless captured.
        Self {
            slots: [
                Slot {
                    current: SinkHandle::stdout(),
                    captured: false,
                },
                Slot {
                    current: SinkHandle::stderr(),
                    captured: false,
                },
                Slot {
                    current: SinkHandle::stderr(),
                    captured: false,
                },
            ],
        }
    }

    pub(crate) fn is_captured(&self, stream: Stream) -> bool {
        self.slots[stream.index()].captured
    }

    /// Install `handle` and return the handle it replaced.
    pub(crate) fn swap(&mut self, stream: Stream, handle: SinkHandle) -> SinkHandle {
        let slot = &mut self.slots[stream.index()];
        slot.captured = true;
        std::mem::replace(&mut slot.current, handle)
    }

    pub(crate) fn restore(&mut self, stream: Stream, previous: SinkHandle) {
        let slot = &mut self.slots[stream.index()];
        slot.current = previous;
        slot.captured = false;
    }

    fn current(&self, stream: Stream) -> SinkHandle {
        self.slots[stream.index()].current.clone()
    }
}

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::new()));

pub(crate) fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock()
}

/// The handle currently receiving writes for `stream`
pub fn current(stream: Stream) -> SinkHandle {
    registry().current(stream)
}

/// Check whether `stream` is redirected by an active capture
pub fn is_captured(stream: Stream) -> bool {
    registry().is_captured(stream)
}

/// Write bytes to the active handle of `stream`
pub fn write(stream: Stream, data: &[u8]) -> io::Result<()> {
    // Clone the handle first so the registry lock is not held across I/O.
    let handle = current(stream);
    handle.write_all(data)
}

/// Format and write to `stream` in a single append
pub fn write_fmt(stream: Stream, args: fmt::Arguments<'_>) {
    let _ = write(stream, fmt::format(args).as_bytes());
}

/// Format, terminate with a newline, and write to `stream` in a single append
pub fn write_line(stream: Stream, args: fmt::Arguments<'_>) {
    let mut line = fmt::format(args);
    line.push('\n');
    let _ = write(stream, line.as_bytes());
}

/// An [`io::Write`] that forwards to whatever handle is active for a stream
/// at the time of each write.
#[derive(Clone, Copy, Debug)]
pub struct SinkWriter {
    stream: Stream,
}

/// Writer for the active handle of `stream`
pub fn writer(stream: Stream) -> SinkWriter {
    SinkWriter { stream }
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write(self.stream, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
