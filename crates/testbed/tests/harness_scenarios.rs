// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios driving small programs through the harness.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{TimeDelta, TimeZone, Utc};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::mpsc;
use testbed::{
    args, capture_eprintln, capture_println, clock, CaptureMode, EofPolicy, Harness, IoDouble,
    Stream,
};

/// Copy everything from `input` to `output`, reporting the byte count.
fn copy_all(input: &mut impl Read, output: &mut impl Write) -> io::Result<u64> {
    let copied = io::copy(input, output)?;
    output.flush()?;
    log::info!("copied {} bytes", copied);
    Ok(copied)
}

/// Number lines of `input` onto the stdout sink.
fn number_lines(input: impl Read) -> io::Result<usize> {
    let mut count = 0;
    for line in BufReader::new(input).lines() {
        let line = line?;
        count += 1;
        capture_println!("{:>3} {}", count, line);
    }
    Ok(count)
}

/// Greet the name given on the command line, with a timestamp.
fn greet() -> i32 {
    let argv = args::current();
    match argv.get(1) {
        Some(name) => {
            capture_println!("[{}] hello, {}", clock::now().format("%H:%M:%S"), name);
            0
        }
        None => {
            capture_eprintln!("usage: greet NAME");
            2
        }
    }
}

#[test]
fn copy_reports_bytes_and_logs() {
    let mut h = Harness::new(CaptureMode::Log).unwrap();
    let mut input = IoDouble::with_data("0123456789");
    let mut output = IoDouble::new();

    let copied = copy_all(&mut input, &mut output).unwrap();

    h.check_eq(&copied, &10, "bytes copied");
    h.check_str(&output.written_string(), "0123456789", ());
    h.check_log(&["INFO copied 10 bytes"], ());
}

#[test]
fn copy_surfaces_write_fault_after_prefix() {
    let mut h = Harness::new(CaptureMode::Log).unwrap();
    let mut input = IoDouble::with_data("0123456789");
    let mut output = IoDouble::new();
    output
        .fail_write_at(4, io::Error::new(io::ErrorKind::StorageFull, "disk full"))
        .unwrap();

    let err = copy_all(&mut input, &mut output).unwrap_err();

    h.check_eq(&err.kind(), &io::ErrorKind::StorageFull, ());
    h.check_str(&output.written_string(), "0123", "accepted prefix");
    h.check_log::<&str>(&[], "nothing logged on failure");
}

#[test]
fn number_lines_stops_at_read_fault() {
    let mut h = Harness::new(CaptureMode::Stdout).unwrap();
    let mut input = IoDouble::with_data("alpha\nbeta\ngamma\n");
    input
        .fail_read_at(13, io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        .unwrap();

    let err = number_lines(input).unwrap_err();

    h.check_eq(&err.kind(), &io::ErrorKind::ConnectionReset, ());
    h.check_stdout(&["  1 alpha", "  2 beta"], ());
}

#[test]
fn number_lines_flags_underprovisioned_input() {
    let mut h = Harness::new(CaptureMode::Stdout).unwrap();
    let mut input = IoDouble::with_data("one\ntwo");
    input.set_eof(EofPolicy::Exhausted);

    let err = number_lines(input).unwrap_err();

    h.check_eq(&err.kind(), &io::ErrorKind::Other, ());
    h.check_stdout(&["  1 one"], "last line never completes");
}

#[test]
fn read_exact_on_short_data() {
    let mut h = Harness::new(CaptureMode::None).unwrap();
    let mut input = IoDouble::with_data("01234");
    let mut buf = [0u8; 10];

    let err = input.read_exact(&mut buf).unwrap_err();

    h.check_eq(&err.kind(), &io::ErrorKind::UnexpectedEof, ());
    h.check_slice_eq(&buf, b"01234\0\0\0\0\0", ());
}

#[test]
fn concurrent_workers_log_to_one_buffer() {
    let mut h = Harness::new(CaptureMode::Log).unwrap();
    let (tx, rx) = mpsc::channel();

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let tx = tx.clone();
            std::thread::spawn(move || {
                for step in 0..25 {
                    log::debug!("worker {} step {}", id, step);
                }
                tx.send(id).unwrap();
            })
        })
        .collect();
    drop(tx);
    let finished: Vec<i32> = rx.iter().collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let lines = h.captured(Stream::Log).unwrap().lines();
    h.check_eq(&finished.len(), &4, ());
    h.check_eq(&lines.len(), &100, "every record captured whole");

    // Per worker, records keep their write order.
    for id in 0..4 {
        let mine: Vec<&String> = lines
            .iter()
            .filter(|l| l.starts_with(&format!("DEBUG worker {} ", id)))
            .collect();
        let want: Vec<String> = (0..25)
            .map(|step| format!("DEBUG worker {} step {}", id, step))
            .collect();
        h.check_slice_eq(&mine, &want.iter().collect::<Vec<_>>(), format!("worker {}", id));
    }
}

#[test]
fn greet_uses_substituted_args_and_clock() {
    let mut h = Harness::new(CaptureMode::StdoutStderr).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
    h.set_clock(start, &[TimeDelta::seconds(9), TimeDelta::seconds(7)])
        .unwrap();
    h.set_clock_format("%H:%M:%S").unwrap();

    h.set_args(["greet", "ada"]).unwrap();
    h.check_eq(&greet(), &0, ());
    h.set_args(["greet", "grace"]).unwrap();
    h.check_eq(&greet(), &0, ());
    h.set_args(["greet"]).unwrap();
    h.check_eq(&greet(), &2, ());

    h.check_stdout(
        &["[{{clkTS0}}] hello, ada", "[{{clkTS1}}] hello, grace"],
        (),
    );
    h.check_stderr(&["usage: greet NAME"], ());
    h.check_eq(&h.clock().unwrap().remaining(), &1, ());
}

#[test]
fn collected_failures_are_all_reported() {
    let _serial = testbed::serial();
    let result = std::panic::catch_unwind(|| {
        let mut h = Harness::builder()
            .capture(CaptureMode::Stdout)
            .fail_fast(false)
            .build()
            .unwrap();
        capture_println!("first");
        capture_println!("second");
        h.check_stdout(&["first", "2nd", "third"], "listing");
        h.check_approx(0.5, 0.25, 0.1, "ratio");
    });

    let payload = result.unwrap_err();
    let report = testbed::panic::payload_text(payload.as_ref());
    assert!(report.starts_with("2 check(s) failed"), "{}", report);
    assert!(
        report.contains("1 changed, 1 missing (only in want), 0 extra (only in got)"),
        "{}",
        report
    );
    assert!(report.contains("FAIL [approx]"), "{}", report);
    assert!(!testbed::sink::is_captured(Stream::Stdout));
}

#[test]
fn scripts_and_files_are_cleaned_up() {
    let (script, dir) = {
        let mut h = Harness::new(CaptureMode::None).unwrap();
        let script = h
            .resources()
            .create_executable_script(&["#!/bin/sh", "exit 0"])
            .unwrap();
        let dir = h.resources().create_sub_dir(&["cache", "v1"]).unwrap();
        h.resources().create_file_in(&dir, "entry", "x").unwrap();
        h.check_eq(&script.exists(), &true, ());
        (script, dir)
    };
    assert!(!script.exists());
    assert!(!dir.exists());
}
