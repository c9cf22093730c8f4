// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line alignment between captured and wanted output.
//!
//! The alignment is computed with a Myers diff where the wanted lines are
//! the old side and the got lines the new side. Within one run of
//! non-matching lines, the i-th line missing from got is paired with the
//! i-th extra line in got and reported as [`DiffLine::Changed`]; whatever
//! is left over is reported as missing lines first, then extra lines.

use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};
use std::fmt;

/// One aligned row. Line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffLine {
    /// Present verbatim in both
    Same {
        got_line: usize,
        want_line: usize,
        text: String,
    },
    /// A got line standing in for a wanted line
    Changed {
        got_line: usize,
        want_line: usize,
        got: String,
        want: String,
    },
    /// Only in want
    Missing { want_line: usize, text: String },
    /// Only in got
    Extra { got_line: usize, text: String },
}

impl DiffLine {
    /// Check whether this row is a difference
    pub fn is_difference(&self) -> bool {
        !matches!(self, DiffLine::Same { .. })
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffLine::Same {
                got_line,
                want_line,
                text,
            } => write!(f, "= {:>4} {:>4}  {}", got_line, want_line, text),
            DiffLine::Changed {
                got_line,
                want_line,
                got,
                want,
            } => {
                writeln!(f, "~ {:>4} {:>4}  got:  {}", got_line, want_line, got)?;
                write!(f, "~ {:>4} {:>4}  want: {}", "", "", want)
            }
            DiffLine::Missing { want_line, text } => {
                write!(f, "- {:>4} {:>4}  {}", "", want_line, text)
            }
            DiffLine::Extra { got_line, text } => {
                write!(f, "+ {:>4} {:>4}  {}", got_line, "", text)
            }
        }
    }
}

/// Full alignment of got against want
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    pub lines: Vec<DiffLine>,
}

impl LineDiff {
    /// Check whether got and want are identical
    pub fn is_match(&self) -> bool {
        self.lines.iter().all(|l| !l.is_difference())
    }

    /// Rows that are differences
    pub fn differences(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(|l| l.is_difference())
    }

    /// Number of rows that are differences
    pub fn difference_count(&self) -> usize {
        self.differences().count()
    }

    /// One-line summary of the difference counts
    pub fn summary(&self) -> String {
        let mut changed = 0;
        let mut missing = 0;
        let mut extra = 0;
        for line in &self.lines {
            match line {
                DiffLine::Same { .. } => {}
                DiffLine::Changed { .. } => changed += 1,
                DiffLine::Missing { .. } => missing += 1,
                DiffLine::Extra { .. } => extra += 1,
            }
        }
        format!(
            "{} changed, {} missing (only in want), {} extra (only in got)",
            changed, missing, extra
        )
    }

    /// Rendered alignment rows, one string per output line
    pub fn render_rows(&self) -> Vec<String> {
        let mut rows = vec!["    got want".to_string()];
        for line in &self.lines {
            rows.extend(line.to_string().lines().map(str::to_string));
        }
        rows
    }
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.render_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Align `got` against `want`
pub fn diff_lines<G, W>(got: &[G], want: &[W]) -> LineDiff
where
    G: AsRef<str>,
    W: AsRef<str>,
{
    let got: Vec<&str> = got.iter().map(AsRef::as_ref).collect();
    let want: Vec<&str> = want.iter().map(AsRef::as_ref).collect();

    let mut lines = Vec::new();
    let mut missing: Vec<usize> = Vec::new();
    let mut extra: Vec<usize> = Vec::new();

    for op in capture_diff_slices(Algorithm::Myers, &want, &got) {
        let (tag, want_range, got_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                flush_run(&got, &want, &mut missing, &mut extra, &mut lines);
                for (w, g) in want_range.zip(got_range) {
                    lines.push(DiffLine::Same {
                        got_line: g + 1,
                        want_line: w + 1,
                        text: got[g].to_string(),
                    });
                }
            }
            DiffTag::Delete => missing.extend(want_range),
            DiffTag::Insert => extra.extend(got_range),
            DiffTag::Replace => {
                missing.extend(want_range);
                extra.extend(got_range);
            }
        }
    }
    flush_run(&got, &want, &mut missing, &mut extra, &mut lines);

    LineDiff { lines }
}

/// Emit one run of non-matching lines using positional pairing.
fn flush_run(
    got: &[&str],
    want: &[&str],
    missing: &mut Vec<usize>,
    extra: &mut Vec<usize>,
    out: &mut Vec<DiffLine>,
) {
    let paired = missing.len().min(extra.len());
    for (&w, &g) in missing.iter().zip(extra.iter()) {
        out.push(DiffLine::Changed {
            got_line: g + 1,
            want_line: w + 1,
            got: got[g].to_string(),
            want: want[w].to_string(),
        });
    }
    for &w in &missing[paired..] {
        out.push(DiffLine::Missing {
            want_line: w + 1,
            text: want[w].to_string(),
        });
    }
    for &g in &extra[paired..] {
        out.push(DiffLine::Extra {
            got_line: g + 1,
            text: got[g].to_string(),
        });
    }
    missing.clear();
    extra.clear();
}

/// Apply substitutions to wanted lines, in registration order
pub fn substitute<S: AsRef<str>>(want: &[S], substitutions: &[(String, String)]) -> Vec<String> {
    want.iter()
        .map(|line| {
            substitutions
                .iter()
                .fold(line.as_ref().to_string(), |acc, (token, value)| {
                    acc.replace(token.as_str(), value)
                })
        })
        .collect()
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
