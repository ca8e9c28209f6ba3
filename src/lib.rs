// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `linedit` library reads a single logical line of input from a terminal, with
//! inline editing, a visible selection backed by a one-slot kill ring, command history
//! navigation, tab completion that cooperates with a caller supplied completer, and
//! masked password entry.
//!
//! # Why another line editor
//!
//! Most readline crates bundle the edit engine, the renderer, and the event loop into
//! one stateful object, which makes them hard to test and hard to extend. This crate
//! keeps three things strictly separate:
//!
//! 1. The **edit engine** ([`EditEngine`]) is a pure state machine: `(state, clipboard,
//!    command) → state`. It never performs I/O, so every transition is property
//!    testable.
//! 2. The **renderer** diffs an abstract "last drawn metrics" value ([`RenderState`])
//!    against the target text and emits the minimal rewind + rewrite, tolerating live
//!    terminal resizes (the column width is re-queried on every draw).
//! 3. The **input loop** ([`Prompter`]) owns the devices, maps keys to [`Command`]s,
//!    and orchestrates the completion race: a caller supplied [`Completer`] runs
//!    concurrently with the next keystroke, and typing always wins — a slow completer
//!    is aborted through an [`AbortSignal`] and its result is discarded.
//!
//! # Entry points
//!
//! - [`Prompter::read_line`] / [`Prompter::read_line_with`] — plain line entry with
//!   history and completion.
//! - [`Prompter::read_password`] — masked entry; buffered type-ahead is drained first.
//! - [`Prompter::read_keyword`] — accepts only lines present in an association list.
//! - [`Prompter::read_yes_no`] — `bool` convenience over [`Prompter::read_keyword`].
//! - [`load_history`] / [`save_history`] — NUL-separated history files.
//!
//! When stdin or stdout is not a tty, `read_line` and `read_keyword` fall back to a
//! plain buffered read with the prompt styles stripped, and `read_password` fails with
//! [`ReadlineError::NotATty`].
//!
//! # Example
//!
//! ```no_run
//! use linedit::{plain, Prompter, ReadlineError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ReadlineError> {
//!     let mut prompter = Prompter::new_stdio();
//!     loop {
//!         match prompter.read_line(&plain("> ")).await {
//!             Ok(line) => println!("got: {line}"),
//!             Err(ReadlineError::Interrupted) => break,
//!             Err(err) => return Err(err),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Key bindings
//!
//! Arrows, Home, End, Backspace, Delete, Tab, and Enter do what you expect. Control
//! bindings: `C-@` sets the mark (starts a selection), `C-w` cuts the selection into
//! the kill ring, `C-y` yanks it back, `C-k` kills to end of line, `C-a`/`C-e` jump to
//! start/end, `C-l` clears the screen, `C-r` forces a redraw, `C-d` interrupts.
//!
//! Note: `C-n` moves the cursor *backward* and `C-p` moves it *forward* — inverted
//! from the GNU Readline convention. This is long-standing behavior that existing
//! users' muscle memory depends on, so it is kept verbatim; see
//! [`translate_key_event`](crate::editor_impl::command::translate_key_event) if you
//! want to remap.

// Attach sources.
pub mod editor_impl;
pub mod public_api;

// Re-export the public API.
pub use editor_impl::*;
pub use public_api::*;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod integration_tests;

// Type aliases.
use crossterm::event::Event;
use futures_core::Stream;
use std::{pin::Pin, sync::Arc};

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type SendRawTerminal = dyn std::io::Write + Send;
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

pub type CrosstermEventResult = std::io::Result<Event>;
pub type PinnedInputStream<T = CrosstermEventResult> =
    Pin<Box<dyn Stream<Item = T> + Send>>;

// Constants.
pub const HISTORY_SIZE_MAX: usize = 1_000;
pub const DEFAULT_PASSWORD_MASK: char = '*';
pub const FALLBACK_COLUMNS: u16 = 80;
