// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Styled text as a flat sequence of directives.
//!
//! A [`StyledText`] is a list of [`Segment`]s: style switches interleaved with text
//! fragments. The renderer composes prompt and buffer in this form, and
//! [`queue_styled`] lowers it to crossterm commands. [`strip_styles`] flattens to
//! plain text for the non-tty fallback paths.

use crossterm::{
    style::{Attribute, Print, SetAttribute},
    QueueableCommand,
};
use std::io::{self, Write};

use crate::grapheme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Reset all attributes.
    Reset,
    Bold,
    Faint,
    Underlined,
    Text(String),
}

pub type StyledText = Vec<Segment>;

/// A single unstyled text fragment.
#[must_use]
pub fn plain(text: impl Into<String>) -> StyledText { vec![Segment::Text(text.into())] }

/// Concatenated text content, styles dropped.
#[must_use]
pub fn strip_styles(styled: &[Segment]) -> String {
    let mut out = String::new();
    for segment in styled {
        if let Segment::Text(text) = segment {
            out.push_str(text);
        }
    }
    out
}

/// Grapheme count of the text content.
#[must_use]
pub fn styled_len(styled: &[Segment]) -> usize {
    styled
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => grapheme::count(text),
            _ => 0,
        })
        .sum()
}

/// Queue the styled text onto a terminal writer. Does not flush.
pub fn queue_styled(term: &mut dyn Write, styled: &[Segment]) -> io::Result<()> {
    for segment in styled {
        match segment {
            Segment::Reset => {
                term.queue(SetAttribute(Attribute::Reset))?;
            }
            Segment::Bold => {
                term.queue(SetAttribute(Attribute::Bold))?;
            }
            Segment::Faint => {
                term.queue(SetAttribute(Attribute::Dim))?;
            }
            Segment::Underlined => {
                term.queue(SetAttribute(Attribute::Underlined))?;
            }
            Segment::Text(text) => {
                term.queue(Print(text))?;
            }
        }
    }
    Ok(())
}

/// How user-typed text is echoed back to the terminal. The prompt is never mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoMode {
    /// Echo the text as typed.
    Normal,
    /// Replace every grapheme with a fixed mask character.
    Masked(char),
    /// Echo nothing at all.
    Hidden,
}

impl EchoMode {
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        match self {
            EchoMode::Normal => text.to_string(),
            EchoMode::Masked(mask) => {
                std::iter::repeat(*mask).take(grapheme::count(text)).collect()
            }
            EchoMode::Hidden => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_styles_keeps_only_text() {
        let styled = vec![
            Segment::Bold,
            Segment::Text("> ".to_string()),
            Segment::Reset,
            Segment::Text("hello".to_string()),
        ];
        assert_eq!(strip_styles(&styled), "> hello");
        assert_eq!(styled_len(&styled), 7);
    }

    #[test]
    fn test_queue_styled_emits_text_and_escapes() {
        let mut buffer: Vec<u8> = Vec::new();
        let styled = vec![
            Segment::Underlined,
            Segment::Text("sel".to_string()),
            Segment::Reset,
        ];
        queue_styled(&mut buffer, &styled).unwrap();
        let raw = String::from_utf8(buffer.clone()).unwrap();
        assert!(raw.contains("sel"));
        let stripped = strip_ansi_escapes::strip(buffer);
        assert_eq!(String::from_utf8(stripped).unwrap(), "sel");
    }

    #[test]
    fn test_echo_modes() {
        assert_eq!(EchoMode::Normal.apply("héllo"), "héllo");
        assert_eq!(EchoMode::Masked('*').apply("héllo"), "*****");
        assert_eq!(EchoMode::Masked('*').apply(""), "");
        assert_eq!(EchoMode::Hidden.apply("héllo"), "");
    }
}
