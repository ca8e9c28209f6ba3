// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The pure edit engine.
//!
//! [`EditEngine::apply`] is a state transformer: `(state, clipboard, command) → state`.
//! It performs no I/O, which is what makes every transition in this module unit
//! testable without a terminal. Commands that involve I/O or control flow
//! (`AcceptLine`, `Break`, `Complete`, `Refresh`, `ClearScreen`) are handled by the
//! input loop and reach the engine only as identities.
//!
//! The buffer is held in one of two shapes:
//!
//! - [`EditorState::Edition`] — the text split at the caret into `before` / `after`.
//! - [`EditorState::Selection`] — a frozen copy of the text plus two grapheme indices,
//!   `mark` and `cursor`; the selected range is `[min(mark, cursor), max(mark, cursor))`.
//!
//! History navigation uses a zipper: `past` holds lines older than the one being
//! edited (most recent first), `future` holds lines the user navigated away from.
//! Reversing `past`, then the current line, then `future` reproduces the timeline.

use crate::{grapheme, Clipboard, Command};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Edition {
        before: String,
        after: String,
    },
    Selection {
        text: String,
        mark: usize,
        cursor: usize,
    },
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState::Edition {
            before: String::new(),
            after: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditEngine {
    pub state: EditorState,
    /// Lines older than the one being edited, most recent at the front.
    pub past: VecDeque<String>,
    /// Lines navigated away from, most recently departed at the front.
    pub future: VecDeque<String>,
}

impl EditEngine {
    /// Fresh engine for one prompt: empty buffer, `history` (most recent first)
    /// reachable via `HistoryPrevious`.
    #[must_use]
    pub fn new(history: &[String]) -> Self {
        Self {
            state: EditorState::default(),
            past: history.iter().cloned().collect(),
            future: VecDeque::new(),
        }
    }

    /// The whole buffer, ignoring the caret split and any selection.
    #[must_use]
    pub fn all_input(&self) -> String {
        match &self.state {
            EditorState::Edition { before, after } => {
                let mut buffer = before.clone();
                buffer.push_str(after);
                buffer
            }
            EditorState::Selection { text, .. } => text.clone(),
        }
    }

    /// The buffer as `(before, after)` around the caret. In selection mode the caret
    /// is the selection cursor.
    #[must_use]
    pub fn edition_parts(&self) -> (String, String) {
        match &self.state {
            EditorState::Edition { before, after } => (before.clone(), after.clone()),
            EditorState::Selection { text, cursor, .. } => {
                let (before, after) = grapheme::split_at(text, *cursor);
                (before.to_string(), after.to_string())
            }
        }
    }

    /// Collapse a selection back to edition, keeping the entire text and placing the
    /// caret where the selection cursor was. Identity on edition states.
    pub fn reset_selection(&mut self) {
        if let EditorState::Selection { text, cursor, .. } = &self.state {
            let (before, after) = grapheme::split_at(text, *cursor);
            self.state = EditorState::Edition {
                before: before.to_string(),
                after: after.to_string(),
            };
        }
    }

    /// Apply one command. Pure except for the clipboard slot, which only
    /// [`Command::KillRingSave`] writes and only [`Command::Yank`] reads.
    pub fn apply(&mut self, clipboard: &Clipboard, command: Command) {
        match self.state {
            EditorState::Selection { .. } => self.apply_in_selection(clipboard, command),
            EditorState::Edition { .. } => self.apply_in_edition(clipboard, command),
        }
    }

    /// In selection mode only cursor movement and the cut are honored; any other
    /// command collapses the selection first and is then re-applied in edition mode.
    fn apply_in_selection(&mut self, clipboard: &Clipboard, command: Command) {
        let EditorState::Selection { text, mark, cursor } = &mut self.state else {
            return;
        };
        match command {
            Command::Nop => {}
            Command::ForwardChar => {
                if *cursor < grapheme::count(text) {
                    *cursor += 1;
                }
            }
            Command::BackwardChar => {
                *cursor = cursor.saturating_sub(1);
            }
            Command::BeginningOfLine => *cursor = 0,
            Command::EndOfLine => *cursor = grapheme::count(text),
            Command::KillRingSave => {
                // Copy and cut in one step.
                let low = (*mark).min(*cursor);
                let high = (*mark).max(*cursor);
                clipboard.set(grapheme::slice(text, low, high));
                let before = grapheme::slice(text, 0, low).to_string();
                let after = grapheme::slice(text, high, grapheme::count(text)).to_string();
                self.state = EditorState::Edition { before, after };
            }
            _ => {
                self.reset_selection();
                self.apply(clipboard, command);
            }
        }
    }

    fn apply_in_edition(&mut self, clipboard: &Clipboard, command: Command) {
        // These three need access to the zipper or rebuild the state wholesale.
        match command {
            Command::SetMark => {
                self.enter_selection();
                return;
            }
            Command::HistoryPrevious => {
                self.navigate_history(HistoryDirection::Previous);
                return;
            }
            Command::HistoryNext => {
                self.navigate_history(HistoryDirection::Next);
                return;
            }
            _ => {}
        }

        let EditorState::Edition { before, after } = &mut self.state else {
            return;
        };
        match command {
            Command::Char(c) => before.push(c),
            Command::Yank => before.push_str(&clipboard.get()),
            Command::BackwardDeleteChar => {
                if let Some(g) = grapheme::last(before) {
                    let keep = before.len() - g.len();
                    before.truncate(keep);
                }
            }
            Command::ForwardDeleteChar => {
                if let Some(g) = grapheme::first(after) {
                    let drop = g.len();
                    after.drain(..drop);
                }
            }
            Command::BeginningOfLine => {
                let mut rest = std::mem::take(before);
                rest.push_str(after);
                *after = rest;
            }
            Command::EndOfLine => {
                before.push_str(after);
                after.clear();
            }
            Command::KillLine => after.clear(),
            Command::BackwardChar => {
                if let Some(g) = grapheme::last(before) {
                    let moved = g.to_string();
                    let keep = before.len() - moved.len();
                    before.truncate(keep);
                    after.insert_str(0, &moved);
                }
            }
            Command::ForwardChar => {
                if let Some(g) = grapheme::first(after) {
                    let moved = g.to_string();
                    after.drain(..moved.len());
                    before.push_str(&moved);
                }
            }
            // Everything else (including the reserved Insert and the word-delete
            // pair) is identity in the engine.
            _ => {}
        }
    }

    fn enter_selection(&mut self) {
        let EditorState::Edition { before, after } = &mut self.state else {
            return;
        };
        let mark = grapheme::count(before);
        let mut text = std::mem::take(before);
        text.push_str(after);
        self.state = EditorState::Selection {
            text,
            mark,
            cursor: mark,
        };
    }

    fn navigate_history(&mut self, direction: HistoryDirection) {
        let line = match direction {
            HistoryDirection::Previous => self.past.pop_front(),
            HistoryDirection::Next => self.future.pop_front(),
        };
        let Some(line) = line else { return };

        let departed = self.all_input();
        match direction {
            HistoryDirection::Previous => self.future.push_front(departed),
            HistoryDirection::Next => self.past.push_front(departed),
        }
        self.state = EditorState::Edition {
            before: line,
            after: String::new(),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryDirection {
    Previous,
    Next,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edition(before: &str, after: &str) -> EditorState {
        EditorState::Edition {
            before: before.to_string(),
            after: after.to_string(),
        }
    }

    fn engine_with(before: &str, after: &str) -> EditEngine {
        EditEngine {
            state: edition(before, after),
            ..EditEngine::default()
        }
    }

    #[test]
    fn test_nop_is_identity() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "cd");
        let snapshot = engine.clone();
        engine.apply(&clipboard, Command::Nop);
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn test_char_inserts_at_cursor() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "cd");
        engine.apply(&clipboard, Command::Char('x'));
        assert_eq!(engine.state, edition("abx", "cd"));
        assert_eq!(engine.all_input(), "abxcd");
    }

    #[test]
    fn test_home_and_end() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "cd");
        engine.apply(&clipboard, Command::BeginningOfLine);
        assert_eq!(engine.state, edition("", "abcd"));
        engine.apply(&clipboard, Command::EndOfLine);
        assert_eq!(engine.state, edition("abcd", ""));
        assert_eq!(engine.all_input(), "abcd");
    }

    #[test]
    fn test_deletes_at_the_edges_are_identity() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("", "abc");
        engine.apply(&clipboard, Command::BackwardDeleteChar);
        assert_eq!(engine.state, edition("", "abc"));

        let mut engine = engine_with("abc", "");
        engine.apply(&clipboard, Command::ForwardDeleteChar);
        assert_eq!(engine.state, edition("abc", ""));
    }

    #[test]
    fn test_deletes_remove_one_grapheme() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("a👍🏽", "éb");
        engine.apply(&clipboard, Command::BackwardDeleteChar);
        assert_eq!(engine.state, edition("a", "éb"));
        engine.apply(&clipboard, Command::ForwardDeleteChar);
        assert_eq!(engine.state, edition("a", "b"));
    }

    #[test]
    fn test_cursor_movement_carries_graphemes_across_the_split() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "cd");
        engine.apply(&clipboard, Command::BackwardChar);
        assert_eq!(engine.state, edition("a", "bcd"));
        engine.apply(&clipboard, Command::ForwardChar);
        assert_eq!(engine.state, edition("ab", "cd"));

        // At the edges movement is identity.
        let mut engine = engine_with("", "x");
        engine.apply(&clipboard, Command::BackwardChar);
        assert_eq!(engine.state, edition("", "x"));
    }

    #[test]
    fn test_kill_line_drops_the_tail() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("keep", "drop");
        engine.apply(&clipboard, Command::KillLine);
        assert_eq!(engine.state, edition("keep", ""));
    }

    #[test]
    fn test_history_previous_then_next_round_trips() {
        let clipboard = Clipboard::new();
        let history = vec!["older".to_string(), "oldest".to_string()];
        let mut engine = EditEngine::new(&history);
        engine.apply(&clipboard, Command::Char('h'));
        engine.apply(&clipboard, Command::Char('i'));
        let snapshot = engine.clone();

        engine.apply(&clipboard, Command::HistoryPrevious);
        assert_eq!(engine.state, edition("older", ""));
        engine.apply(&clipboard, Command::HistoryNext);
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn test_history_walk_reaches_oldest_and_sticks() {
        let clipboard = Clipboard::new();
        let history = vec!["prev1".to_string(), "prev2".to_string()];
        let mut engine = EditEngine::new(&history);
        engine.apply(&clipboard, Command::HistoryPrevious);
        assert_eq!(engine.all_input(), "prev1");
        engine.apply(&clipboard, Command::HistoryPrevious);
        assert_eq!(engine.all_input(), "prev2");
        // Past exhausted: identity.
        engine.apply(&clipboard, Command::HistoryPrevious);
        assert_eq!(engine.all_input(), "prev2");
    }

    #[test]
    fn test_history_next_without_navigation_is_identity() {
        let clipboard = Clipboard::new();
        let mut engine = EditEngine::new(&["older".to_string()]);
        engine.apply(&clipboard, Command::Char('x'));
        let snapshot = engine.clone();
        engine.apply(&clipboard, Command::HistoryNext);
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn test_selection_cut_for_every_extent() {
        // Set_mark, N × Forward_char, Kill_ring_save must cut exactly the first N
        // graphemes of `after`.
        let after = "wxyz";
        for n in 0..=after.len() {
            let clipboard = Clipboard::new();
            let mut engine = engine_with("ab", after);
            engine.apply(&clipboard, Command::SetMark);
            for _ in 0..n {
                engine.apply(&clipboard, Command::ForwardChar);
            }
            engine.apply(&clipboard, Command::KillRingSave);
            assert_eq!(engine.state, edition("ab", &after[n..]));
            assert_eq!(clipboard.get(), &after[..n]);
        }
    }

    #[test]
    fn test_yank_after_cut_restores_the_buffer() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "wxyz");
        engine.apply(&clipboard, Command::SetMark);
        engine.apply(&clipboard, Command::ForwardChar);
        engine.apply(&clipboard, Command::ForwardChar);
        engine.apply(&clipboard, Command::KillRingSave);
        engine.apply(&clipboard, Command::Yank);
        assert_eq!(engine.all_input(), "abwxyz");
        assert_eq!(engine.state, edition("abwx", "yz"));
    }

    #[test]
    fn test_selection_cursor_movement_clamps_at_the_ends() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "");
        engine.apply(&clipboard, Command::SetMark);
        engine.apply(&clipboard, Command::ForwardChar);
        let EditorState::Selection { cursor, .. } = engine.state else {
            panic!("expected selection");
        };
        assert_eq!(cursor, 2);

        let mut engine = engine_with("", "ab");
        engine.apply(&clipboard, Command::SetMark);
        engine.apply(&clipboard, Command::BackwardChar);
        let EditorState::Selection { cursor, .. } = engine.state else {
            panic!("expected selection");
        };
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_selection_home_end_move_the_cursor_only() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "cd");
        engine.apply(&clipboard, Command::SetMark);
        engine.apply(&clipboard, Command::EndOfLine);
        assert_eq!(
            engine.state,
            EditorState::Selection {
                text: "abcd".to_string(),
                mark: 2,
                cursor: 4
            }
        );
        engine.apply(&clipboard, Command::BeginningOfLine);
        assert_eq!(
            engine.state,
            EditorState::Selection {
                text: "abcd".to_string(),
                mark: 2,
                cursor: 0
            }
        );
    }

    #[test]
    fn test_cut_with_cursor_before_mark() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("abcd", "");
        engine.apply(&clipboard, Command::SetMark);
        engine.apply(&clipboard, Command::BackwardChar);
        engine.apply(&clipboard, Command::BackwardChar);
        engine.apply(&clipboard, Command::KillRingSave);
        assert_eq!(engine.state, edition("ab", ""));
        assert_eq!(clipboard.get(), "cd");
    }

    #[test]
    fn test_other_commands_collapse_the_selection_first() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "cd");
        engine.apply(&clipboard, Command::SetMark);
        engine.apply(&clipboard, Command::ForwardChar);
        // Typing collapses the selection at the cursor and inserts.
        engine.apply(&clipboard, Command::Char('!'));
        assert_eq!(engine.state, edition("abc!", "d"));
    }

    #[test]
    fn test_reset_selection_is_idempotent_and_edition_invariant() {
        let clipboard = Clipboard::new();
        let mut engine = engine_with("ab", "cd");
        let snapshot = engine.clone();
        engine.reset_selection();
        assert_eq!(engine, snapshot);

        engine.apply(&clipboard, Command::SetMark);
        engine.apply(&clipboard, Command::ForwardChar);
        engine.reset_selection();
        assert_eq!(engine.state, edition("abc", "d"));
        engine.reset_selection();
        assert_eq!(engine.state, edition("abc", "d"));
    }
}
