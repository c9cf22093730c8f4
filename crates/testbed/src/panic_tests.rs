#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

#[test]
fn test_catch_completed() {
    let outcome = catch(|| 40 + 2);
    assert_eq!(outcome, Outcome::Completed(42));
    assert!(!outcome.is_aborted());
    assert_eq!(outcome.completed(), Some(42));
}

#[test]
fn test_catch_static_str_payload() {
    let outcome: Outcome<()> = catch(|| panic!("boom"));
    assert_eq!(outcome, Outcome::Aborted("boom".to_string()));
    assert_eq!(outcome.payload(), Some("boom"));
}

#[test]
fn test_catch_formatted_payload() {
    let n = 7;
    let outcome: Outcome<()> = catch(|| panic!("bad index {}", n));
    assert_eq!(outcome.payload(), Some("bad index 7"));
}

#[test]
fn test_catch_non_string_payload() {
    let outcome: Outcome<()> = catch(|| std::panic::panic_any(17u32));
    assert_eq!(outcome.payload(), Some("<non-string panic payload>"));
}

#[test]
fn test_expect_panic_matches() {
    let outcome: Outcome<()> = catch(|| panic!("overflow"));
    assert!(expect_panic(&outcome, Some("overflow"), ()).passed);

    let exp = expect_panic(&outcome, Some("underflow"), ());
    assert!(!exp.passed);
    assert_eq!(exp.got, "panic \"overflow\"");
    assert_eq!(exp.want, "panic \"underflow\"");
    assert_eq!(exp.details, vec!["panic payload differs"]);
}

#[test]
fn test_expect_no_panic() {
    let outcome = catch(|| 1);
    assert!(expect_panic(&outcome, None, ()).passed);

    let exp = expect_panic(&outcome, Some("boom"), ());
    assert!(!exp.passed);
    assert_eq!(exp.got, "no panic");
    assert_eq!(exp.details, vec!["code completed but a panic was wanted"]);
}

#[test]
fn test_unexpected_panic() {
    let outcome: Outcome<()> = catch(|| panic!("surprise"));
    let exp = expect_panic(&outcome, None, "setup");
    assert!(!exp.passed);
    assert_eq!(exp.details, vec!["code panicked unexpectedly"]);
}
