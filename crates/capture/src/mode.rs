// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture modes.

use crate::sink::Stream;

/// Which streams a capture redirects, and which of them share a buffer.
///
/// Streams that share a buffer land in it in true chronological order,
/// because every write from either stream goes through the same handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaptureMode {
    /// Capture nothing
    #[default]
    None,
    Stdout,
    Stderr,
    Log,
    /// Stdout and stderr into separate buffers
    StdoutStderr,
    /// Log and stdout into separate buffers
    LogStdout,
    /// Log and stderr into separate buffers
    LogStderr,
    /// Log, stderr and stdout interleaved into one buffer
    Interleaved,
    /// Log and stderr interleaved into one buffer, stdout separate
    LogWithStderr,
}

impl CaptureMode {
    /// Groups of streams; each group shares one buffer
    pub fn groups(self) -> Vec<Vec<Stream>> {
        use Stream::*;
        match self {
            CaptureMode::None => vec![],
            CaptureMode::Stdout => vec![vec![Stdout]],
            CaptureMode::Stderr => vec![vec![Stderr]],
            CaptureMode::Log => vec![vec![Log]],
            CaptureMode::StdoutStderr => vec![vec![Stdout], vec![Stderr]],
            CaptureMode::LogStdout => vec![vec![Log], vec![Stdout]],
            CaptureMode::LogStderr => vec![vec![Log], vec![Stderr]],
            CaptureMode::Interleaved => vec![vec![Log, Stderr, Stdout]],
            CaptureMode::LogWithStderr => vec![vec![Log, Stderr], vec![Stdout]],
        }
    }

    /// Every stream this mode redirects
    pub fn streams(self) -> Vec<Stream> {
        self.groups().into_iter().flatten().collect()
    }

    /// Check whether this mode redirects `stream`
    pub fn captures(self, stream: Stream) -> bool {
        self.streams().contains(&stream)
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
