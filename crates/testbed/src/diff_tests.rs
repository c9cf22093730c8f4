#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;

fn same(g: usize, w: usize, text: &str) -> DiffLine {
    DiffLine::Same {
        got_line: g,
        want_line: w,
        text: text.to_string(),
    }
}

fn changed(g: usize, w: usize, got: &str, want: &str) -> DiffLine {
    DiffLine::Changed {
        got_line: g,
        want_line: w,
        got: got.to_string(),
        want: want.to_string(),
    }
}

fn missing(w: usize, text: &str) -> DiffLine {
    DiffLine::Missing {
        want_line: w,
        text: text.to_string(),
    }
}

fn extra(g: usize, text: &str) -> DiffLine {
    DiffLine::Extra {
        got_line: g,
        text: text.to_string(),
    }
}

#[test]
fn test_identical_lines_match() {
    let lines = ["alpha", "beta", "gamma"];
    let diff = diff_lines(&lines, &lines);

    assert!(diff.is_match());
    assert_eq!(diff.difference_count(), 0);
    assert_eq!(
        diff.lines,
        vec![same(1, 1, "alpha"), same(2, 2, "beta"), same(3, 3, "gamma")]
    );
}

#[test]
fn test_single_replacement_is_changed() {
    let diff = diff_lines(&["a", "b", "c"], &["a", "x", "c"]);

    assert_eq!(
        diff.lines,
        vec![same(1, 1, "a"), changed(2, 2, "b", "x"), same(3, 3, "c")]
    );
    assert!(!diff.is_match());
}

#[test]
fn test_missing_tail() {
    let diff = diff_lines(&["a", "b"], &["a", "b", "c"]);
    assert_eq!(
        diff.lines,
        vec![same(1, 1, "a"), same(2, 2, "b"), missing(3, "c")]
    );
}

#[test]
fn test_extra_middle() {
    let diff = diff_lines(&["a", "b", "c"], &["a", "c"]);
    assert_eq!(
        diff.lines,
        vec![same(1, 1, "a"), extra(2, "b"), same(3, 2, "c")]
    );
}

#[test]
fn test_empty_sides() {
    let none: [&str; 0] = [];
    assert_eq!(diff_lines(&none, &["x"]).lines, vec![missing(1, "x")]);
    assert_eq!(diff_lines(&["x"], &none).lines, vec![extra(1, "x")]);
    assert!(diff_lines(&none, &none).is_match());
}

#[test]
fn test_uneven_run_pairs_positionally() {
    let diff = diff_lines(&["a", "r", "z"], &["a", "p", "q", "z"]);
    assert_eq!(
        diff.lines,
        vec![
            same(1, 1, "a"),
            changed(2, 2, "r", "p"),
            missing(3, "q"),
            same(3, 4, "z"),
        ]
    );
}

#[test]
fn test_uneven_run_with_surplus_got() {
    let diff = diff_lines(&["a", "r", "s", "z"], &["a", "p", "z"]);
    assert_eq!(
        diff.lines,
        vec![
            same(1, 1, "a"),
            changed(2, 2, "r", "p"),
            extra(3, "s"),
            same(4, 3, "z"),
        ]
    );
}

#[test]
fn test_summary() {
    let diff = diff_lines(&["a", "r", "z", "tail"], &["a", "p", "q", "z"]);
    assert_eq!(
        diff.summary(),
        "1 changed, 1 missing (only in want), 1 extra (only in got)"
    );
}

#[test]
fn test_render_rows() {
    let diff = diff_lines(&["a", "b", "c", "d"], &["a", "x", "c", "e", "f"]);
    let blank = " ".repeat(12);
    assert_eq!(
        diff.render_rows(),
        vec![
            "    got want".to_string(),
            "=    1    1  a".to_string(),
            "~    2    2  got:  b".to_string(),
            format!("~{}want: x", blank),
            "=    3    3  c".to_string(),
            "~    4    4  got:  d".to_string(),
            format!("~{}want: e", blank),
            "-         5  f".to_string(),
        ]
    );
}

#[test]
fn test_render_extra_row() {
    let diff = diff_lines(&["only"], &[] as &[&str]);
    assert_eq!(diff.render_rows()[1], "+    1       only");
}

#[test]
fn test_display_is_deterministic() {
    let got = ["one", "two", "three"];
    let want = ["one", "2", "three", "four"];
    assert_eq!(
        diff_lines(&got, &want).to_string(),
        diff_lines(&got, &want).to_string()
    );
}

#[test]
fn test_substitute_applies_in_order() {
    let subs = vec![
        ("{{dir}}".to_string(), "/tmp/x".to_string()),
        ("{{file}}".to_string(), "{{dir}}/f".to_string()),
    ];
    let out = substitute(&["at {{dir}}", "see {{file}}"], &subs);
    // The second token's replacement is not re-expanded.
    assert_eq!(out, vec!["at /tmp/x", "see {{dir}}/f"]);
}

#[test]
fn test_token_only_in_got_is_a_mismatch() {
    let subs = vec![("{{path}}".to_string(), "/tmp/a".to_string())];
    let want = substitute(&["file /tmp/a"], &subs);
    let diff = diff_lines(&["file {{path}}"], &want);

    assert!(!diff.is_match());
    assert_eq!(diff.lines, vec![changed(1, 1, "file {{path}}", "file /tmp/a")]);
}

proptest! {
    #[test]
    fn identical_sequences_have_no_differences(
        lines in proptest::collection::vec("[a-c]{0,3}", 1..30)
    ) {
        let diff = diff_lines(&lines, &lines);
        prop_assert!(diff.is_match());
        prop_assert_eq!(diff.lines.len(), lines.len());
    }

    #[test]
    fn every_line_is_accounted_for(
        got in proptest::collection::vec("[a-c]{1,2}", 0..20),
        want in proptest::collection::vec("[a-c]{1,2}", 0..20),
    ) {
        let diff = diff_lines(&got, &want);
        let mut got_rows = 0;
        let mut want_rows = 0;
        for line in &diff.lines {
            match line {
                DiffLine::Same { .. } | DiffLine::Changed { .. } => {
                    got_rows += 1;
                    want_rows += 1;
                }
                DiffLine::Missing { .. } => want_rows += 1,
                DiffLine::Extra { .. } => got_rows += 1,
            }
        }
        prop_assert_eq!(got_rows, got.len());
        prop_assert_eq!(want_rows, want.len());
        prop_assert_eq!(diff.is_match(), got == want);
    }
}
