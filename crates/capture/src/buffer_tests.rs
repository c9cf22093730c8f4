#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;
use std::io::Write;
use std::thread;

#[test]
fn test_append_and_contents() {
    let buf = CaptureBuffer::new();
    buf.append(b"hello ");
    buf.append(b"world\n");

    assert_eq!(buf.contents(), "hello world\n");
    assert_eq!(buf.len(), 12);
    assert!(!buf.is_empty());
}

#[test]
fn test_lines_drops_trailing_newline() {
    let buf = CaptureBuffer::new();
    buf.append(b"one\ntwo\n");

    assert_eq!(buf.lines(), vec!["one", "two"]);
}

#[test]
fn test_lines_keeps_unterminated_tail() {
    let buf = CaptureBuffer::new();
    buf.append(b"one\ntwo");

    assert_eq!(buf.lines(), vec!["one", "two"]);
}

#[test]
fn test_clear() {
    let buf = CaptureBuffer::new();
    buf.append(b"data");
    buf.clear();

    assert!(buf.is_empty());
    assert_eq!(buf.contents(), "");
}

#[test]
fn test_clone_shares_storage() {
    let a = CaptureBuffer::new();
    let b = a.clone();

    a.append(b"from a;");
    b.append(b"from b");

    assert_eq!(a.contents(), "from a;from b");
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&CaptureBuffer::new()));
}

#[test]
fn test_write_impl() {
    let mut buf = CaptureBuffer::new();
    writeln!(buf, "value = {}", 42).unwrap();
    buf.flush().unwrap();

    assert_eq!(buf.contents(), "value = 42\n");
}

#[test]
fn test_concurrent_appends_are_not_torn() {
    let buf = CaptureBuffer::new();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let buf = buf.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    buf.append(format!("worker-{}-line-{}\n", t, i).as_bytes());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let lines = buf.lines();
    assert_eq!(lines.len(), 200);
    assert!(lines.iter().all(|l| l.starts_with("worker-")));
}

proptest! {
    #[test]
    fn len_matches_appended_bytes(chunks in proptest::collection::vec(".{0,16}", 0..20)) {
        let buf = CaptureBuffer::new();
        let mut total = 0;
        for chunk in &chunks {
            buf.append(chunk.as_bytes());
            total += chunk.len();
        }
        prop_assert_eq!(buf.len(), total);
        prop_assert_eq!(buf.contents(), chunks.concat());
    }
}
