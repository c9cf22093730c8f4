// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The per-test harness tying capture, checks, clock, arguments and
//! temporary resources to one scope.

use crate::args::{self, ArgsOverride};
use crate::clock::{self, ClockOverride, ScriptedClock};
use crate::compare::{self, Expectation};
use crate::env;
use crate::error::{HarnessError, Result};
use crate::message::Message;
use crate::panic as outcome;
use crate::resources::TempResources;
use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use parking_lot::ReentrantMutexGuard;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::ops::Bound;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use testbed_capture::logger::INTERNAL_TARGET;
use testbed_capture::{serial, sink, CaptureBuffer, CaptureMode, Stream, StreamCapture};

/// Builder for [`Harness`].
///
/// ```ignore
/// let mut h = Harness::builder()
///     .capture(CaptureMode::StdoutStderr)
///     .fail_fast(false)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct HarnessBuilder {
    mode: CaptureMode,
    fail_fast: Option<bool>,
    report_file: Option<PathBuf>,
}

impl HarnessBuilder {
    /// Streams to capture; nothing by default
    pub fn capture(mut self, mode: CaptureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Panic at the first failed check (default) or collect failures until
    /// release
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = Some(fail_fast);
        self
    }

    /// Append one JSON line per failed check to `path`
    pub fn report_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_file = Some(path.into());
        self
    }

    /// Acquire the process-wide guard and start capturing
    pub fn build(self) -> Result<Harness> {
        let serial = serial();
        let fail_fast = self.fail_fast.or_else(env::fail_fast).unwrap_or(true);
        let report = match self.report_file.or_else(env::report_file) {
            Some(path) => Some(open_report(&path)?),
            None => None,
        };
        let capture = StreamCapture::begin(self.mode)?;
        log::debug!(
            target: INTERNAL_TARGET,
            "Harness started: mode={:?} fail_fast={}",
            self.mode,
            fail_fast
        );

        Ok(Harness {
            capture,
            fail_fast,
            failures: Vec::new(),
            reported: 0,
            checks: 0,
            substitutions: Vec::new(),
            clock: None,
            clock_override: None,
            args_override: None,
            resources: TempResources::new(),
            report,
            released: false,
            _serial: serial,
        })
    }
}

fn open_report(path: &Path) -> Result<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

#[derive(Serialize)]
struct ReportLine<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<&'a str>,
    #[serde(flatten)]
    expectation: &'a Expectation,
}

/// One test's harness.
///
/// Holds the process-wide test guard for its whole life, so it stays on
/// the thread that built it. Everything it acquired is given back by
/// [`Harness::release`], which also runs on drop.
pub struct Harness {
    capture: StreamCapture,
    fail_fast: bool,
    failures: Vec<Expectation>,
    reported: usize,
    checks: usize,
    substitutions: Vec<(String, String)>,
    clock: Option<ScriptedClock>,
    clock_override: Option<ClockOverride>,
    args_override: Option<ArgsOverride>,
    resources: TempResources,
    report: Option<BufWriter<File>>,
    released: bool,
    _serial: ReentrantMutexGuard<'static, ()>,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// Fail-fast harness capturing `mode`
    pub fn new(mode: CaptureMode) -> Result<Self> {
        Self::builder().capture(mode).build()
    }

    pub fn mode(&self) -> CaptureMode {
        self.capture.mode()
    }

    pub fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    // ========================================================================
    // Checks
    // ========================================================================

    fn record(&mut self, expectation: Expectation) -> bool {
        self.checks += 1;
        if expectation.passed {
            return true;
        }
        self.write_report(&expectation);
        self.failures.push(expectation);
        if self.fail_fast {
            self.reported = self.failures.len();
            self.fail_now();
        }
        false
    }

    #[allow(clippy::panic)]
    fn fail_now(&self) {
        if let Some(last) = self.failures.last() {
            panic!("{}", last.render());
        }
    }

    fn write_report(&mut self, expectation: &Expectation) {
        let Some(writer) = &mut self.report else {
            return;
        };
        let thread = std::thread::current();
        let line = ReportLine {
            test: thread.name(),
            expectation,
        };
        if let Ok(json) = serde_json::to_string(&line) {
            let _ = writeln!(writer, "{}", json);
            let _ = writer.flush();
        }
    }

    /// Compare two values for equality
    #[track_caller]
    pub fn check_eq<T>(&mut self, got: &T, want: &T, message: impl Into<Message>) -> bool
    where
        T: PartialEq + Debug + ?Sized,
    {
        let location = Location::caller();
        self.record(compare::expect_eq(got, want, message).at(location))
    }

    #[track_caller]
    pub fn check_str(&mut self, got: &str, want: &str, message: impl Into<Message>) -> bool {
        let location = Location::caller();
        self.record(compare::expect_str(got, want, message).at(location))
    }

    #[track_caller]
    pub fn check_approx(
        &mut self,
        got: f64,
        want: f64,
        tolerance: f64,
        message: impl Into<Message>,
    ) -> bool {
        let location = Location::caller();
        self.record(compare::expect_approx(got, want, tolerance, message).at(location))
    }

    #[track_caller]
    pub fn check_in_range(
        &mut self,
        got: f64,
        lower: Bound<f64>,
        upper: Bound<f64>,
        message: impl Into<Message>,
    ) -> bool {
        let location = Location::caller();
        self.record(compare::expect_in_range(got, lower, upper, message).at(location))
    }

    #[track_caller]
    pub fn check_slice_eq<T>(&mut self, got: &[T], want: &[T], message: impl Into<Message>) -> bool
    where
        T: PartialEq + Debug,
    {
        let location = Location::caller();
        self.record(compare::expect_slice_eq(got, want, message).at(location))
    }

    #[track_caller]
    pub fn check_slice_approx(
        &mut self,
        got: &[f64],
        want: &[f64],
        tolerance: f64,
        message: impl Into<Message>,
    ) -> bool {
        let location = Location::caller();
        self.record(compare::expect_slice_approx(got, want, tolerance, message).at(location))
    }

    /// Align `got` against `want` after applying the substitution table
    /// (including clock tokens) to `want`
    #[track_caller]
    pub fn check_lines<G, W>(&mut self, got: &[G], want: &[W], message: impl Into<Message>) -> bool
    where
        G: AsRef<str>,
        W: AsRef<str>,
    {
        let location = Location::caller();
        let substitutions = self.substitutions();
        self.record(compare::expect_lines(got, want, &substitutions, message).at(location))
    }

    #[track_caller]
    fn check_stream<W: AsRef<str>>(
        &mut self,
        stream: Stream,
        want: &[W],
        message: Message,
    ) -> bool {
        let location = Location::caller();
        let got = self.captured_or_panic(stream).lines();
        let substitutions = self.substitutions();
        self.record(compare::expect_lines(&got, want, &substitutions, message).at(location))
    }

    /// Compare captured stdout lines against `want`.
    ///
    /// In the interleaved modes this sees every stream sharing the buffer.
    #[track_caller]
    pub fn check_stdout<W: AsRef<str>>(&mut self, want: &[W], message: impl Into<Message>) -> bool {
        self.check_stream(Stream::Stdout, want, message.into())
    }

    #[track_caller]
    pub fn check_stderr<W: AsRef<str>>(&mut self, want: &[W], message: impl Into<Message>) -> bool {
        self.check_stream(Stream::Stderr, want, message.into())
    }

    /// Compare captured log lines (`LEVEL message`) against `want`
    #[track_caller]
    pub fn check_log<W: AsRef<str>>(&mut self, want: &[W], message: impl Into<Message>) -> bool {
        self.check_stream(Stream::Log, want, message.into())
    }

    /// Run `f` and check that it panics with `want`, or completes when
    /// `want` is `None`
    #[track_caller]
    pub fn check_panic<T, F>(&mut self, f: F, want: Option<&str>, message: impl Into<Message>) -> bool
    where
        F: FnOnce() -> T,
    {
        let location = Location::caller();
        let result = outcome::catch(f);
        self.record(outcome::expect_panic(&result, want, message).at(location))
    }

    /// Number of checks run so far
    pub fn checks(&self) -> usize {
        self.checks
    }

    /// Every failed check recorded so far
    pub fn failures(&self) -> &[Expectation] {
        &self.failures
    }

    /// Drain recorded failures so release does not report them
    pub fn take_failures(&mut self) -> Vec<Expectation> {
        self.reported = 0;
        std::mem::take(&mut self.failures)
    }

    // ========================================================================
    // Captured streams
    // ========================================================================

    /// Buffer receiving `stream`, if captured
    pub fn captured(&self, stream: Stream) -> Option<&CaptureBuffer> {
        self.capture.buffer(stream)
    }

    #[allow(clippy::panic)]
    fn captured_or_panic(&self, stream: Stream) -> &CaptureBuffer {
        match self.capture.buffer(stream) {
            Some(buffer) => buffer,
            None => panic!(
                "{}",
                HarnessError::config(format!(
                    "{} is not captured in mode {:?}",
                    stream,
                    self.capture.mode()
                ))
            ),
        }
    }

    /// Captured text of `stream`, empty when not captured
    pub fn output(&self, stream: Stream) -> String {
        self.captured(stream)
            .map(CaptureBuffer::contents)
            .unwrap_or_default()
    }

    /// Discard what `stream` captured so far
    pub fn reset_stream(&self, stream: Stream) {
        if let Some(buffer) = self.captured(stream) {
            buffer.clear();
        }
    }

    // ========================================================================
    // Substitutions
    // ========================================================================

    /// Replace `token` with `value` in wanted lines before comparing
    pub fn add_substitution(
        &mut self,
        token: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(HarnessError::config("substitution token is empty"));
        }
        if self.substitutions.iter().any(|(t, _)| *t == token) {
            return Err(HarnessError::config(format!(
                "substitution {:?} already registered",
                token
            )));
        }
        self.substitutions.push((token, value.into()));
        Ok(self)
    }

    /// The substitution table in application order, clock tokens last
    pub fn substitutions(&self) -> Vec<(String, String)> {
        let mut all = self.substitutions.clone();
        if let Some(clock) = &self.clock {
            all.extend(clock.tokens());
        }
        all
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Script the process-wide clock for this test.
    ///
    /// The returned handle shares the script and can be passed to code
    /// that takes a [`Clock`](crate::Clock) directly.
    pub fn set_clock(&mut self, initial: DateTime<Utc>, deltas: &[TimeDelta]) -> Result<ScriptedClock> {
        if self.clock.is_some() {
            return Err(HarnessError::config("clock already scripted for this harness"));
        }
        let scripted = ScriptedClock::new(initial, deltas)?;
        self.clock_override = Some(clock::install(Arc::new(scripted.clone()))?);
        self.clock = Some(scripted.clone());
        Ok(scripted)
    }

    /// Render clock instants with `format` as `{{clkTS<i>}}` substitutions
    pub fn set_clock_format(&mut self, format: &str) -> Result<()> {
        match &self.clock {
            Some(clock) => clock.set_format(format),
            None => Err(HarnessError::config("set_clock must come before set_clock_format")),
        }
    }

    pub fn clock(&self) -> Option<&ScriptedClock> {
        self.clock.as_ref()
    }

    // ========================================================================
    // Arguments
    // ========================================================================

    /// Substitute the process argument vector until release
    pub fn set_args<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match &self.args_override {
            Some(guard) => guard.replace(args),
            None => self.args_override = Some(args::install(args)?),
        }
        Ok(())
    }

    /// Substitute the argument vector and parse it with `C`.
    ///
    /// A parse failure is written to the stdout or stderr sink the way
    /// clap would print it, then returned as [`HarnessError::Args`].
    pub fn setup_args_and_flags<C, I, S>(&mut self, args: I) -> Result<C>
    where
        C: Parser,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_args(args)?;
        Ok(args::parse::<C>()?)
    }

    // ========================================================================
    // Temporary resources
    // ========================================================================

    pub fn resources(&mut self) -> &mut TempResources {
        &mut self.resources
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Give back everything the harness acquired (capture, clock,
    /// arguments, then temporary resources), then report failures not yet
    /// surfaced.
    ///
    /// Panics with the aggregated report when collected failures remain.
    /// When the thread is already panicking the report is written to the
    /// stderr sink restored by the capture release instead. Further calls
    /// are no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.capture.release();
        self.clock_override = None;
        self.args_override = None;
        self.resources.release();
        if let Some(writer) = &mut self.report {
            let _ = writer.flush();
        }

        let unreported = self.failures.len().saturating_sub(self.reported);
        log::debug!(
            target: INTERNAL_TARGET,
            "Harness released: {} checks, {} unreported failures",
            self.checks,
            unreported
        );
        if unreported == 0 {
            return;
        }
        let report = render_failures(&self.failures[self.reported..]);
        self.reported = self.failures.len();
        if std::thread::panicking() {
            let _ = sink::write(Stream::Stderr, format!("{}\n", report).as_bytes());
            return;
        }
        fail_with(report);
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("mode", &self.capture.mode())
            .field("fail_fast", &self.fail_fast)
            .field("checks", &self.checks)
            .field("failures", &self.failures.len())
            .field("released", &self.released)
            .finish()
    }
}

/// Aggregated report for several failed checks
pub fn render_failures(failures: &[Expectation]) -> String {
    let mut out = format!("{} check(s) failed", failures.len());
    for failure in failures {
        out.push_str("\n\n");
        out.push_str(&failure.render());
    }
    out
}

#[allow(clippy::panic)]
fn fail_with(report: String) {
    panic!("{}", report);
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
