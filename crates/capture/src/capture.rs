// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stream capture with stack-based restore.

use crate::buffer::CaptureBuffer;
use crate::error::CaptureError;
use crate::logger;
use crate::mode::CaptureMode;
use crate::sink::{self, SinkHandle, Stream};
use log::LevelFilter;

enum Undo {
    Sink(Stream, SinkHandle),
    MaxLevel(LevelFilter),
}

/// An active redirection of process-wide sinks into private buffers.
///
/// Created by [`StreamCapture::begin`]; every swapped sink is put back by
/// [`StreamCapture::release`] or, failing that, on drop. Buffers stay
/// readable after release.
pub struct StreamCapture {
    mode: CaptureMode,
    buffers: Vec<(Stream, CaptureBuffer)>,
    undo: Vec<Undo>,
}

impl StreamCapture {
    /// Swap the sinks named by `mode` for fresh buffers.
    ///
    /// All-or-nothing: if any named stream is already captured nothing is
    /// swapped.
    pub fn begin(mode: CaptureMode) -> Result<Self, CaptureError> {
        if mode.captures(Stream::Log) {
            logger::install()?;
        }

        let mut buffers = Vec::new();
        let mut undo = Vec::new();
        {
            let mut registry = sink::registry();
            if let Some(busy) = mode.streams().into_iter().find(|s| registry.is_captured(*s)) {
                return Err(CaptureError::AlreadyCaptured(busy));
            }

            for group in mode.groups() {
                let buffer = CaptureBuffer::new();
                let handle = SinkHandle::buffer(buffer.clone());
                for stream in group {
                    let previous = registry.swap(stream, handle.clone());
                    undo.push(Undo::Sink(stream, previous));
                    buffers.push((stream, buffer.clone()));
                }
            }
        }

        if mode.captures(Stream::Log) {
            undo.push(Undo::MaxLevel(log::max_level()));
            log::set_max_level(LevelFilter::Trace);
        }

        Ok(Self {
            mode,
            buffers,
            undo,
        })
    }

    /// The mode this capture was started with
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Buffer receiving `stream`, if this capture redirects it
    pub fn buffer(&self, stream: Stream) -> Option<&CaptureBuffer> {
        self.buffers
            .iter()
            .find(|(s, _)| *s == stream)
            .map(|(_, buf)| buf)
    }

    pub fn stdout(&self) -> Option<&CaptureBuffer> {
        self.buffer(Stream::Stdout)
    }

    pub fn stderr(&self) -> Option<&CaptureBuffer> {
        self.buffer(Stream::Stderr)
    }

    pub fn log(&self) -> Option<&CaptureBuffer> {
        self.buffer(Stream::Log)
    }

    /// Check whether any sink is still swapped
    pub fn is_active(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Restore every swapped sink in reverse order of acquisition.
    ///
    /// Further calls are no-ops.
    pub fn release(&mut self) {
        while let Some(entry) = self.undo.pop() {
            match entry {
                Undo::Sink(stream, previous) => sink::registry().restore(stream, previous),
                Undo::MaxLevel(level) => log::set_max_level(level),
            }
        }
    }
}

impl Drop for StreamCapture {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCapture")
            .field("mode", &self.mode)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
