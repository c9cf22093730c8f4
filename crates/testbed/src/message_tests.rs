#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use rstest::rstest;

#[rstest]
#[case(Message::Empty, None)]
#[case(Message::from(()), None)]
#[case(Message::from(""), None)]
#[case(Message::from("plain"), Some("plain"))]
#[case(Message::from(["a", "b", "c"]), Some("abc"))]
#[case(Message::fragments(vec!["x=".to_string(), "1".to_string()]), Some("x=1"))]
#[case(crate::msg!("{} of {}", 3, 4), Some("3 of 4"))]
fn test_render(#[case] message: Message, #[case] expected: Option<&str>) {
    assert_eq!(message.render().as_deref(), expected);
}

#[test]
fn test_formatted_is_resolved_once() {
    let mut value = 1;
    let message = crate::msg!("value={}", value);
    value += 1;
    assert_eq!(value, 2);
    assert_eq!(message, Message::Formatted("value=1".to_string()));
}

#[test]
fn test_fragments_are_not_separated() {
    let message = Message::from(vec!["line ".to_string(), "7".to_string()]);
    assert_eq!(message.render().unwrap(), "line 7");
}

#[test]
fn test_default_is_empty() {
    assert_eq!(Message::default(), Message::Empty);
}
