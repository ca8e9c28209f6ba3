// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Diffed redraw of the prompt and buffer on a wrapping terminal.
//!
//! The renderer keeps no reference to the engine. Its whole memory of the previous
//! frame is a [`RenderState`]: the grapheme length of what was last drawn (so stale
//! tail characters can be overwritten with spaces) and the number of rows between the
//! caret and the top of the prompt (so the next draw can rewind to the right spot).
//! Every draw starts by rewinding exactly `height_before` rows — invariant 4 of the
//! engine/renderer split.
//!
//! Newlines inside the buffer are not written as `\n`. [`prepare_for_display`]
//! replaces each one with enough spaces to pad to the end of the current terminal
//! row, which guarantees that characters left over from a previous, longer frame on
//! the same physical row get overwritten.
//!
//! The terminal column width is passed in per call; callers re-query it on every
//! draw, so a resize between frames only produces one garbled frame at worst.

use crate::{
    grapheme, queue_styled, styled_len, EchoMode, EditorState, Segment, StyledText,
};
use crossterm::{cursor::MoveToPreviousLine, style::Print, QueueableCommand};
use std::io::{self, Write};

/// Metrics of the most recently drawn frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderState {
    /// Grapheme count of the full prompt + buffer as last drawn.
    pub length: usize,
    /// Rows from the caret position back up to the top of the prompt.
    pub height_before: usize,
}

/// Number of rows *above* the final cursor row occupied by `length` graphemes
/// written from column 0 on a `columns`-wide terminal.
#[must_use]
pub fn height(columns: usize, length: usize) -> usize {
    if length == 0 {
        0
    } else {
        (length - 1) / columns.max(1)
    }
}

/// Replace every embedded newline with spaces padding to the end of the current
/// (logical, `columns`-wide) row, threading a running grapheme counter through the
/// fragments. Style directives pass through untouched.
#[must_use]
pub fn prepare_for_display(columns: usize, styled: &[Segment]) -> StyledText {
    let columns = columns.max(1);
    let mut out = StyledText::with_capacity(styled.len());
    let mut counter = 0usize;
    for segment in styled {
        match segment {
            Segment::Text(text) => {
                let mut fragment = String::with_capacity(text.len());
                for g in unicode_segmentation::UnicodeSegmentation::graphemes(
                    text.as_str(),
                    true,
                ) {
                    if g == "\n" {
                        let padding = columns - (counter % columns);
                        fragment.extend(std::iter::repeat(' ').take(padding));
                        counter += padding;
                    } else {
                        fragment.push_str(g);
                        counter += 1;
                    }
                }
                out.push(Segment::Text(fragment));
            }
            other => out.push(other.clone()),
        }
    }
    out
}

/// Move up `rows` rows to column 0.
fn beginning_of_line(term: &mut dyn Write, rows: usize) -> io::Result<()> {
    if rows == 0 {
        term.write_all(b"\r")?;
    } else {
        term.queue(MoveToPreviousLine(u16::try_from(rows).unwrap_or(u16::MAX)))?;
    }
    Ok(())
}

/// One atomic redraw of prompt + buffer. Returns the metrics for the next draw.
///
/// The caret ends up at the engine's cursor position: the frame is written in full
/// (padded with spaces to erase anything the previous, possibly longer frame left
/// behind), then the cursor is walked back to the end of the `before` side.
pub fn draw(
    term: &mut dyn Write,
    columns: u16,
    prompt: &[Segment],
    state: &EditorState,
    echo: EchoMode,
    old: RenderState,
) -> io::Result<RenderState> {
    let columns = usize::from(columns.max(1));
    let (before_styled, after_styled, caret_follows_newline) = split_styled(state, echo);

    let mut composed_before: StyledText = prompt.to_vec();
    composed_before.push(Segment::Reset);
    composed_before.extend(before_styled);
    let mut composed_total = composed_before.clone();
    composed_total.extend(after_styled);

    let printed_before = prepare_for_display(columns, &composed_before);
    let mut printed_total = prepare_for_display(columns, &composed_total);

    let mut new = RenderState {
        length: styled_len(&printed_total),
        height_before: height(columns, styled_len(&printed_before)),
    };

    // Pad with spaces to overwrite the tail of a longer previous frame.
    let erase = old.length.saturating_sub(new.length);
    if erase > 0 {
        printed_total.push(Segment::Text(" ".repeat(erase)));
    }

    beginning_of_line(term, old.height_before)?;
    queue_styled(term, &printed_total)?;
    beginning_of_line(term, height(columns, styled_len(&printed_total)))?;
    queue_styled(term, &printed_before)?;

    if caret_follows_newline {
        // The padded newline leaves the terminal cursor parked at the far end of the
        // previous row; force it onto a fresh row so the caret is visible where the
        // user expects it.
        term.write_all(b"\r\n")?;
        new.height_before += 1;
    }

    term.flush()?;
    Ok(new)
}

/// Final draw on accept or break: rewind, write the full line, move on. No editing
/// happens after this.
pub fn last_draw(
    term: &mut dyn Write,
    columns: u16,
    prompt: &[Segment],
    all_input: &str,
    echo: EchoMode,
    old: RenderState,
) -> io::Result<()> {
    let columns = usize::from(columns.max(1));
    beginning_of_line(term, old.height_before)?;
    let mut composed: StyledText = prompt.to_vec();
    composed.push(Segment::Reset);
    composed.push(Segment::Text(echo.apply(all_input)));
    let printed = prepare_for_display(columns, &composed);
    queue_styled(term, &printed)?;
    term.write_all(b"\r\n")?;
    term.flush()
}

/// Column layout for the candidate word list: slot width is one more than the
/// widest word, and as many slots as fit in the terminal width (at least one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowColumns {
    pub per_row: usize,
    pub column_width: usize,
}

impl RowColumns {
    #[must_use]
    pub fn fit(columns: usize, words: &[String]) -> Self {
        let width = 1 + words.iter().map(|w| grapheme::count(w)).max().unwrap_or(0);
        let per_row = (columns / width).max(1);
        Self {
            per_row,
            column_width: columns / per_row,
        }
    }
}

/// Print completion candidates in left-to-right columns, each padded to a uniform
/// width, wrapping at the terminal edge.
pub fn print_candidates(
    term: &mut dyn Write,
    columns: u16,
    words: &[String],
) -> io::Result<()> {
    if words.is_empty() {
        return Ok(());
    }
    let RowColumns {
        per_row,
        column_width,
    } = RowColumns::fit(usize::from(columns.max(1)), words);

    let mut slot = 0;
    let mut at_row_start = true;
    for word in words {
        term.queue(Print(word))?;
        for _ in grapheme::count(word)..column_width {
            term.write_all(b" ")?;
        }
        at_row_start = false;
        slot += 1;
        if slot == per_row {
            term.write_all(b"\r\n")?;
            slot = 0;
            at_row_start = true;
        }
    }
    if !at_row_start {
        term.write_all(b"\r\n")?;
    }
    term.flush()
}

fn split_styled(
    state: &EditorState,
    echo: EchoMode,
) -> (StyledText, StyledText, bool) {
    match state {
        EditorState::Edition { before, after } => {
            let mapped_before = echo.apply(before);
            let caret_follows_newline = mapped_before.ends_with('\n');
            (
                vec![Segment::Text(mapped_before)],
                vec![Segment::Text(echo.apply(after))],
                caret_follows_newline,
            )
        }
        EditorState::Selection { text, mark, cursor } => {
            let total = grapheme::count(text);
            let low = (*mark).min(*cursor);
            let high = (*mark).max(*cursor);
            if cursor < mark {
                // The caret sits at the left edge of the selection, so the selected
                // range belongs to the "after" side.
                let mapped_before = echo.apply(grapheme::slice(text, 0, low));
                let caret_follows_newline = mapped_before.ends_with('\n');
                (
                    vec![Segment::Text(mapped_before)],
                    vec![
                        Segment::Underlined,
                        Segment::Text(echo.apply(grapheme::slice(text, low, high))),
                        Segment::Reset,
                        Segment::Text(echo.apply(grapheme::slice(text, high, total))),
                    ],
                    caret_follows_newline,
                )
            } else {
                let mapped_plain = echo.apply(grapheme::slice(text, 0, low));
                let mapped_selected = echo.apply(grapheme::slice(text, low, high));
                let caret_follows_newline = if mapped_selected.is_empty() {
                    mapped_plain.ends_with('\n')
                } else {
                    mapped_selected.ends_with('\n')
                };
                (
                    vec![
                        Segment::Text(mapped_plain),
                        Segment::Underlined,
                        Segment::Text(mapped_selected),
                        Segment::Reset,
                    ],
                    vec![Segment::Text(echo.apply(grapheme::slice(text, high, total)))],
                    caret_follows_newline,
                )
            }
        }
    }
}
