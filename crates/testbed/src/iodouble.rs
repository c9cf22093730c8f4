// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable in-memory stream for fault injection.
//!
//! [`IoDouble`] stands in for a file or socket. Tests load it with read
//! data and script faults against cumulative byte offsets (which never
//! reset over the double's lifetime), seek attempt numbers, or close.
//!
//! The primitive operations ([`IoDouble::read_transfer`],
//! [`IoDouble::write_transfer`], [`IoDouble::seek_transfer`]) report a byte
//! count and an optional error together. The `std::io` trait impls adapt
//! that to Rust conventions: when a transfer moved some bytes and also
//! carries an error, the call returns `Ok(count)` and the next call returns
//! the error without moving any bytes.

use crate::error::{HarnessError, Result};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Bytes moved by one call, and the error surfaced with them
#[derive(Debug)]
pub struct Transfer {
    pub count: usize,
    pub error: Option<io::Error>,
}

impl Transfer {
    fn ok(count: usize) -> Self {
        Self { count, error: None }
    }

    fn err(count: usize, error: io::Error) -> Self {
        Self {
            count,
            error: Some(error),
        }
    }
}

/// What a read returns once the read data is used up
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EofPolicy {
    /// `Ok(0)`
    #[default]
    EndOfStream,
    /// A fresh error of this kind on every read
    Error(io::ErrorKind, String),
    /// The test under-provisioned its data; reads fail with an `Other`
    /// error wrapping [`HarnessError::Exhausted`]
    Exhausted,
}

#[derive(Debug)]
struct RawScript {
    after: u64,
    count: usize,
    error: Option<io::Error>,
}

/// In-memory read/write/seek/close double with scripted faults
#[derive(Debug, Default)]
pub struct IoDouble {
    read_data: Vec<u8>,
    read_pos: usize,
    read_offset: u64,
    written: Vec<u8>,
    write_offset: u64,
    read_faults: BTreeMap<u64, io::Error>,
    write_faults: BTreeMap<u64, io::Error>,
    raw_reads: VecDeque<RawScript>,
    raw_writes: VecDeque<RawScript>,
    seek_faults: BTreeMap<u64, (u64, Option<io::Error>)>,
    seek_attempts: u64,
    close_error: Option<(io::ErrorKind, String)>,
    closed: bool,
    eof: EofPolicy,
    pending_read: Option<io::Error>,
    pending_write: Option<io::Error>,
}

impl IoDouble {
    /// Create an empty double
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a double whose reads return `data`
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            read_data: data.into(),
            ..Self::default()
        }
    }

    /// Replace the read data and rewind the read cursor.
    ///
    /// Cumulative offsets are not reset.
    pub fn set_read_data(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        self.read_data = data.into();
        self.read_pos = 0;
        self
    }

    /// Set the end-of-stream behavior
    pub fn set_eof(&mut self, policy: EofPolicy) -> &mut Self {
        self.eof = policy;
        self
    }

    /// Fail the read that reaches cumulative byte `offset`, delivering the
    /// bytes before it
    pub fn fail_read_at(&mut self, offset: u64, error: io::Error) -> Result<&mut Self> {
        if self.read_faults.contains_key(&offset) {
            return Err(HarnessError::config(format!(
                "read fault already scripted at offset {}",
                offset
            )));
        }
        self.read_faults.insert(offset, error);
        Ok(self)
    }

    /// Fail the write that reaches cumulative byte `offset`, accepting the
    /// bytes before it
    pub fn fail_write_at(&mut self, offset: u64, error: io::Error) -> Result<&mut Self> {
        if self.write_faults.contains_key(&offset) {
            return Err(HarnessError::config(format!(
                "write fault already scripted at offset {}",
                offset
            )));
        }
        self.write_faults.insert(offset, error);
        Ok(self)
    }

    /// Once `after` bytes have been read, make one read report exactly
    /// `count` and `error` without touching the read data
    pub fn script_read(
        &mut self,
        after: u64,
        count: usize,
        error: Option<io::Error>,
    ) -> Result<&mut Self> {
        if self.raw_reads.iter().any(|s| s.after == after) {
            return Err(HarnessError::config(format!(
                "raw read already scripted after {} bytes",
                after
            )));
        }
        self.raw_reads.push_back(RawScript {
            after,
            count,
            error,
        });
        Ok(self)
    }

    /// Once `after` bytes have been written, make one write report exactly
    /// `count` and `error` without appending anything
    pub fn script_write(
        &mut self,
        after: u64,
        count: usize,
        error: Option<io::Error>,
    ) -> Result<&mut Self> {
        if self.raw_writes.iter().any(|s| s.after == after) {
            return Err(HarnessError::config(format!(
                "raw write already scripted after {} bytes",
                after
            )));
        }
        self.raw_writes.push_back(RawScript {
            after,
            count,
            error,
        });
        Ok(self)
    }

    /// Make seek attempt number `attempt` (1-based) return `position` and
    /// `error` instead of seeking
    pub fn fail_seek_at(
        &mut self,
        attempt: u64,
        position: u64,
        error: Option<io::Error>,
    ) -> Result<&mut Self> {
        if attempt == 0 {
            return Err(HarnessError::config("seek attempts are numbered from 1"));
        }
        if self.seek_faults.contains_key(&attempt) {
            return Err(HarnessError::config(format!(
                "seek fault already scripted for attempt {}",
                attempt
            )));
        }
        self.seek_faults.insert(attempt, (position, error));
        Ok(self)
    }

    /// Make every `close` fail with an error like `error`
    pub fn set_close_error(&mut self, error: io::Error) -> Result<&mut Self> {
        if self.close_error.is_some() {
            return Err(HarnessError::config("close error already scripted"));
        }
        self.close_error = Some((error.kind(), error.to_string()));
        Ok(self)
    }

    fn take_raw(queue: &mut VecDeque<RawScript>, offset: u64) -> Option<RawScript> {
        let index = queue.iter().position(|s| s.after <= offset)?;
        queue.remove(index)
    }

    fn take_fault(
        faults: &mut BTreeMap<u64, io::Error>,
        start: u64,
        len: usize,
    ) -> Option<(u64, io::Error)> {
        // At end of data a fault scripted exactly at the cursor still fires.
        let end = start + (len.max(1) as u64);
        let offset = *faults.range(start..end).next()?.0;
        faults.remove(&offset).map(|e| (offset, e))
    }

    fn eof_transfer(&self) -> Transfer {
        match &self.eof {
            EofPolicy::EndOfStream => Transfer::ok(0),
            EofPolicy::Error(kind, message) => {
                Transfer::err(0, io::Error::new(*kind, message.clone()))
            }
            EofPolicy::Exhausted => Transfer::err(
                0,
                io::Error::other(HarnessError::Exhausted(format!(
                    "read data ran out after {} bytes",
                    self.read_offset
                ))),
            ),
        }
    }

    /// Read into `buf`, reporting count and error together
    pub fn read_transfer(&mut self, buf: &mut [u8]) -> Transfer {
        if let Some(raw) = Self::take_raw(&mut self.raw_reads, self.read_offset) {
            return Transfer {
                count: raw.count,
                error: raw.error,
            };
        }
        if buf.is_empty() {
            return Transfer::ok(0);
        }

        let available = self.read_data.len().saturating_sub(self.read_pos);
        let n = buf.len().min(available);
        let (n, error) = match Self::take_fault(&mut self.read_faults, self.read_offset, n) {
            Some((offset, error)) => ((offset - self.read_offset) as usize, Some(error)),
            None if n == 0 => return self.eof_transfer(),
            None => (n, None),
        };

        if n > 0 {
            buf[..n].copy_from_slice(&self.read_data[self.read_pos..self.read_pos + n]);
            self.read_pos += n;
            self.read_offset += n as u64;
        }
        Transfer { count: n, error }
    }

    /// Append `data`, reporting accepted count and error together
    pub fn write_transfer(&mut self, data: &[u8]) -> Transfer {
        if let Some(raw) = Self::take_raw(&mut self.raw_writes, self.write_offset) {
            return Transfer {
                count: raw.count,
                error: raw.error,
            };
        }
        if data.is_empty() {
            return Transfer::ok(0);
        }

        let fault = Self::take_fault(&mut self.write_faults, self.write_offset, data.len());
        let (n, error) = match fault {
            Some((offset, error)) => ((offset - self.write_offset) as usize, Some(error)),
            None => (data.len(), None),
        };

        self.written.extend_from_slice(&data[..n]);
        self.write_offset += n as u64;
        Transfer { count: n, error }
    }

    /// Move the read cursor, reporting position and error together
    pub fn seek_transfer(&mut self, pos: SeekFrom) -> (u64, Option<io::Error>) {
        self.seek_attempts += 1;
        if let Some((position, error)) = self.seek_faults.remove(&self.seek_attempts) {
            return (position, error);
        }

        let target = match pos {
            SeekFrom::Start(n) => Some(n as i128),
            SeekFrom::End(delta) => Some(self.read_data.len() as i128 + delta as i128),
            SeekFrom::Current(delta) => Some(self.read_pos as i128 + delta as i128),
        };
        match target.and_then(|t| usize::try_from(t).ok()) {
            Some(position) => {
                self.read_pos = position;
                (position as u64, None)
            }
            None => (
                self.read_pos as u64,
                Some(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "invalid seek to a negative position",
                )),
            ),
        }
    }

    /// Close the double; fails every time if a close error is scripted
    pub fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        match &self.close_error {
            Some((kind, message)) => Err(io::Error::new(*kind, message.clone())),
            None => Ok(()),
        }
    }

    /// Bytes accepted by writes so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Accepted bytes as text (lossy)
    pub fn written_string(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }

    /// Read data not yet consumed
    pub fn remaining(&self) -> &[u8] {
        self.read_data.get(self.read_pos..).unwrap_or(&[])
    }

    /// Cumulative bytes read
    pub fn read_offset(&self) -> u64 {
        self.read_offset
    }

    /// Cumulative bytes written
    pub fn write_offset(&self) -> u64 {
        self.write_offset
    }

    /// Seek calls so far
    pub fn seek_attempts(&self) -> u64 {
        self.seek_attempts
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Scripted faults that have not fired yet
    pub fn pending_faults(&self) -> usize {
        self.read_faults.len()
            + self.write_faults.len()
            + self.raw_reads.len()
            + self.raw_writes.len()
            + self.seek_faults.len()
    }
}

impl Read for IoDouble {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(error) = self.pending_read.take() {
            return Err(error);
        }
        let Transfer { count, error } = self.read_transfer(buf);
        let count = count.min(buf.len());
        match error {
            None => Ok(count),
            Some(error) if count == 0 => Err(error),
            Some(error) => {
                self.pending_read = Some(error);
                Ok(count)
            }
        }
    }
}

impl Write for IoDouble {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(error) = self.pending_write.take() {
            return Err(error);
        }
        let Transfer { count, error } = self.write_transfer(buf);
        let count = count.min(buf.len());
        match error {
            None => Ok(count),
            Some(error) if count == 0 => Err(error),
            Some(error) => {
                self.pending_write = Some(error);
                Ok(count)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for IoDouble {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.seek_transfer(pos) {
            (_, Some(error)) => Err(error),
            (position, None) => Ok(position),
        }
    }
}

#[cfg(test)]
#[path = "iodouble_tests.rs"]
mod tests;
