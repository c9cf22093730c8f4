// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optional messages attached to checks.

use serde::Serialize;
use std::fmt;

/// Message attached to a check.
///
/// A check takes either unformatted fragments, which are concatenated, or
/// one formatted message; never both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "style", content = "text", rename_all = "snake_case")]
pub enum Message {
    #[default]
    Empty,
    Fragments(Vec<String>),
    Formatted(String),
}

impl Message {
    /// Build a formatted message; see also [`msg!`](crate::msg)
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        Message::Formatted(fmt::format(args))
    }

    /// Build a message from fragments
    pub fn fragments<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Message::Fragments(parts.into_iter().map(Into::into).collect())
    }

    /// Rendered text, or `None` when there is nothing to show
    pub fn render(&self) -> Option<String> {
        let text = match self {
            Message::Empty => return None,
            Message::Fragments(parts) => parts.concat(),
            Message::Formatted(text) => text.clone(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Fragments(vec![text.to_string()])
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Fragments(vec![text])
    }
}

impl From<Vec<String>> for Message {
    fn from(parts: Vec<String>) -> Self {
        Message::Fragments(parts)
    }
}

impl<const N: usize> From<[&str; N]> for Message {
    fn from(parts: [&str; N]) -> Self {
        Message::fragments(parts)
    }
}

impl From<()> for Message {
    fn from(_: ()) -> Self {
        Message::Empty
    }
}

/// Build a formatted [`Message`] with `format!` syntax.
#[macro_export]
macro_rules! msg {
    ($($arg:tt)*) => {
        $crate::Message::format(format_args!($($arg)*))
    };
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
