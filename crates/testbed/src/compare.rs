// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Comparisons producing [`Expectation`] records.
//!
//! Every `expect_*` function is pure: it compares, and returns a record
//! describing the outcome. Deciding whether a failure aborts the test is
//! the harness's job.

use crate::diff::{self, LineDiff};
use crate::message::Message;
use serde::Serialize;
use std::fmt::{self, Debug};
use std::ops::Bound;
use std::panic::Location;

/// What kind of comparison produced an expectation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Equal,
    Str,
    Approx,
    Range,
    Slice,
    Lines,
    Panic,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Equal => "equal",
            CheckKind::Str => "string",
            CheckKind::Approx => "approx",
            CheckKind::Range => "range",
            CheckKind::Slice => "slice",
            CheckKind::Lines => "lines",
            CheckKind::Panic => "panic",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of one comparison
#[derive(Clone, Debug, Serialize)]
pub struct Expectation {
    pub kind: CheckKind,
    pub got: String,
    pub want: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<LineDiff>,
}

impl Expectation {
    pub(crate) fn new(
        kind: CheckKind,
        got: impl Into<String>,
        want: impl Into<String>,
        message: Message,
    ) -> Self {
        Self {
            kind,
            got: got.into(),
            want: want.into(),
            tolerance: None,
            message: message.render(),
            location: None,
            passed: true,
            details: Vec::new(),
            diff: None,
        }
    }

    pub(crate) fn fail(mut self, detail: impl Into<String>) -> Self {
        self.passed = false;
        self.details.push(detail.into());
        self
    }

    /// Attach the source location of the check
    pub fn at(mut self, location: &Location<'_>) -> Self {
        self.location = Some(format!("{}:{}", location.file(), location.line()));
        self
    }

    /// Multi-line failure report for this expectation
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} [{}]",
            if self.passed { "ok" } else { "FAIL" },
            self.kind
        );
        if let Some(location) = &self.location {
            out.push_str(&format!(" at {}", location));
        }
        if let Some(message) = &self.message {
            out.push_str(&format!(": {}", message));
        }
        out.push_str(&format!("\n  got:  {}", self.got));
        out.push_str(&format!("\n  want: {}", self.want));
        if let Some(tolerance) = self.tolerance {
            out.push_str(&format!(" (tolerance {})", tolerance));
        }
        for detail in &self.details {
            out.push_str(&format!("\n  {}", detail));
        }
        if let Some(diff) = &self.diff {
            for row in diff.render_rows() {
                out.push_str(&format!("\n    {}", row));
            }
        }
        out
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Compare any two values for equality
pub fn expect_eq<T>(got: &T, want: &T, message: impl Into<Message>) -> Expectation
where
    T: PartialEq + Debug + ?Sized,
{
    let exp = Expectation::new(
        CheckKind::Equal,
        format!("{:?}", got),
        format!("{:?}", want),
        message.into(),
    );
    if got == want {
        exp
    } else {
        exp.fail("values differ")
    }
}

/// Compare strings; multi-line strings are reported as a line alignment
pub fn expect_str(got: &str, want: &str, message: impl Into<Message>) -> Expectation {
    let mut exp = Expectation::new(
        CheckKind::Str,
        format!("{:?}", got),
        format!("{:?}", want),
        message.into(),
    );
    if got == want {
        return exp;
    }
    if got.contains('\n') || want.contains('\n') {
        let got_lines: Vec<&str> = got.lines().collect();
        let want_lines: Vec<&str> = want.lines().collect();
        let diff = diff::diff_lines(&got_lines, &want_lines);
        exp = exp.fail(diff.summary());
        exp.diff = Some(diff);
        exp
    } else {
        let at = got
            .chars()
            .zip(want.chars())
            .take_while(|(g, w)| g == w)
            .count();
        exp.fail(format!("first difference at character {}", at))
    }
}

/// Pass when `|got - want| <= |tolerance|`
pub fn expect_approx(
    got: f64,
    want: f64,
    tolerance: f64,
    message: impl Into<Message>,
) -> Expectation {
    let tolerance = tolerance.abs();
    let mut exp = Expectation::new(
        CheckKind::Approx,
        got.to_string(),
        want.to_string(),
        message.into(),
    );
    exp.tolerance = Some(tolerance);
    let delta = (got - want).abs();
    if delta <= tolerance {
        exp
    } else {
        exp.fail(format!("difference {} exceeds tolerance {}", delta, tolerance))
    }
}

fn describe_range(lower: Bound<f64>, upper: Bound<f64>) -> String {
    let low = match lower {
        Bound::Included(v) => format!("[{}", v),
        Bound::Excluded(v) => format!("({}", v),
        Bound::Unbounded => "(-inf".to_string(),
    };
    let high = match upper {
        Bound::Included(v) => format!("{}]", v),
        Bound::Excluded(v) => format!("{})", v),
        Bound::Unbounded => "+inf)".to_string(),
    };
    format!("{}, {}", low, high)
}

/// Pass when `got` lies within the bounds; `Included` is closed, `Excluded` open
// Negated comparisons so NaN violates every finite bound.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn expect_in_range(
    got: f64,
    lower: Bound<f64>,
    upper: Bound<f64>,
    message: impl Into<Message>,
) -> Expectation {
    let mut exp = Expectation::new(
        CheckKind::Range,
        got.to_string(),
        describe_range(lower, upper),
        message.into(),
    );
    match lower {
        Bound::Included(v) if !(got >= v) => {
            exp = exp.fail(format!("lower bound violated: got {}, must be >= {}", got, v));
        }
        Bound::Excluded(v) if !(got > v) => {
            exp = exp.fail(format!("lower bound violated: got {}, must be > {}", got, v));
        }
        _ => {}
    }
    match upper {
        Bound::Included(v) if !(got <= v) => {
            exp = exp.fail(format!("upper bound violated: got {}, must be <= {}", got, v));
        }
        Bound::Excluded(v) if !(got < v) => {
            exp = exp.fail(format!("upper bound violated: got {}, must be < {}", got, v));
        }
        _ => {}
    }
    exp
}

fn compare_slices<T, F>(
    mut exp: Expectation,
    got: &[T],
    want: &[T],
    same: F,
) -> Expectation
where
    T: Debug,
    F: Fn(&T, &T) -> bool,
{
    if got.len() != want.len() {
        exp = exp.fail(format!(
            "length mismatch: got {}, want {}",
            got.len(),
            want.len()
        ));
    }
    if let Some(index) = got.iter().zip(want).position(|(g, w)| !same(g, w)) {
        exp = exp.fail(format!(
            "first divergence at index {}: got {:?}, want {:?}",
            index, got[index], want[index]
        ));
    }
    exp
}

/// Compare slices element by element
pub fn expect_slice_eq<T>(got: &[T], want: &[T], message: impl Into<Message>) -> Expectation
where
    T: PartialEq + Debug,
{
    let exp = Expectation::new(
        CheckKind::Slice,
        format!("{:?}", got),
        format!("{:?}", want),
        message.into(),
    );
    compare_slices(exp, got, want, |g, w| g == w)
}

/// Compare float slices with a per-element tolerance
pub fn expect_slice_approx(
    got: &[f64],
    want: &[f64],
    tolerance: f64,
    message: impl Into<Message>,
) -> Expectation {
    let tolerance = tolerance.abs();
    let mut exp = Expectation::new(
        CheckKind::Slice,
        format!("{:?}", got),
        format!("{:?}", want),
        message.into(),
    );
    exp.tolerance = Some(tolerance);
    compare_slices(exp, got, want, |g, w| (g - w).abs() <= tolerance)
}

/// Align got lines against wanted lines after substituting tokens into
/// the wanted side
pub fn expect_lines<G, W>(
    got: &[G],
    want: &[W],
    substitutions: &[(String, String)],
    message: impl Into<Message>,
) -> Expectation
where
    G: AsRef<str>,
    W: AsRef<str>,
{
    let want = diff::substitute(want, substitutions);
    let diff = diff::diff_lines(got, &want);
    let mut exp = Expectation::new(
        CheckKind::Lines,
        format!("{} lines", got.len()),
        format!("{} lines", want.len()),
        message.into(),
    );
    if !diff.is_match() {
        exp = exp.fail(diff.summary());
        exp.diff = Some(diff);
    }
    exp
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
