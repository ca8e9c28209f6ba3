// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal I/O devices, dependency-injected so every code path runs against mocks.
//!
//! [`InputDevice`] wraps a pinned async stream of [`crossterm::event::Event`]s
//! (production: [`crossterm::event::EventStream`]); [`OutputDevice`] wraps a shared
//! `dyn Write` (production: stdout). Tests supply a scripted event stream and a
//! byte-capturing writer instead — see the test fixtures.

use crate::{
    PinnedInputStream, ReadlineError, SafeRawTerminal, SendRawTerminal, StdMutex,
    FALLBACK_COLUMNS,
};
use crossterm::{
    event::{Event, EventStream},
    terminal,
};
use futures_util::{FutureExt, StreamExt};
use std::sync::Arc;

/// An async source of terminal events.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: PinnedInputStream,
}

impl InputDevice {
    #[must_use]
    pub fn new_event_stream() -> InputDevice {
        InputDevice {
            resource: Box::pin(EventStream::new()),
        }
    }

    /// Next event from the stream.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::ClosedInput`] when the stream ends; I/O errors are passed
    /// through.
    pub async fn next(&mut self) -> Result<Event, ReadlineError> {
        match self.resource.next().await {
            Some(Ok(event)) => Ok(event),
            Some(Err(report)) => Err(ReadlineError::Io(report)),
            None => Err(ReadlineError::ClosedInput),
        }
    }

    /// Discard every event that is already buffered, without waiting for more.
    ///
    /// Used before a password prompt so type-ahead intended for a previous prompt
    /// cannot leak into the secret.
    pub fn junk_old(&mut self) {
        while let Some(Some(_)) = self.resource.next().now_or_never() {}
    }
}

/// A shared destination for terminal output. Cloning shares the underlying writer.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stdout())),
            is_mock: false,
        }
    }

    /// Lock the writer. Keep the guard scope tight; locking twice in one scope
    /// deadlocks.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned, which can only happen if a thread panicked
    /// while holding it.
    pub fn lock(&self) -> std::sync::MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap()
    }
}

/// Where the renderer gets the terminal width. Re-queried on every draw so live
/// resizes are picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnsSource {
    /// Ask the real terminal.
    Terminal,
    /// A fixed width, for tests and embedded renderers.
    Fixed(u16),
}

impl ColumnsSource {
    #[must_use]
    pub fn get(&self) -> u16 {
        match self {
            ColumnsSource::Terminal => terminal::size()
                .map(|(columns, _rows)| columns)
                .unwrap_or(FALLBACK_COLUMNS),
            ColumnsSource::Fixed(columns) => *columns,
        }
    }
}

/// Scoped raw-mode acquisition. Raw mode is released on drop, which is the only way
/// to guarantee terminal restoration on every exit path, interrupt included.
#[derive(Debug)]
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    /// Enable raw mode for the lifetime of the guard. Pass `enabled = false` to get
    /// an inert guard (mock terminals have no modes to save).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses to switch modes.
    pub fn acquire(enabled: bool) -> std::io::Result<RawModeGuard> {
        if enabled {
            terminal::enable_raw_mode()?;
        }
        Ok(RawModeGuard { active: enabled })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
        }
    }
}
