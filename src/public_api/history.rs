// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Command history: a bounded in-memory list plus the on-disk format.
//!
//! The file format is a sequence of complete lines, each followed by a single NUL
//! byte (`0x00`). NUL cannot occur inside a line, so no escaping is needed and
//! embedded newlines survive round trips. On load, zero-length segments (adjacent
//! NULs) are skipped; [`save_history`] writes entries faithfully, empty ones
//! included, so the suppression is load-side only.

use crate::HISTORY_SIZE_MAX;
use std::{collections::VecDeque, io, path::Path};

const SEPARATOR: u8 = 0x00;

/// Bounded, deduplicating history. Most recent entry at the front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub entries: VecDeque<String>,
    pub max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            max_size: HISTORY_SIZE_MAX,
        }
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Build from lines in chronological order (oldest first), as returned by
    /// [`load_history`].
    #[must_use]
    pub fn from_lines(chronological: impl IntoIterator<Item = String>) -> Self {
        let mut history = Self::new();
        for line in chronological {
            history.add(line);
        }
        history
    }

    /// Record an accepted line. Empty lines and a repeat of the most recent entry
    /// are skipped; the oldest entry falls off past `max_size`.
    pub fn add(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.is_empty() || self.entries.front() == Some(&line) {
            return;
        }
        self.entries.push_front(line);
        self.entries.truncate(self.max_size);
    }

    /// Entries most recent first — the order the prompt's `history` argument wants.
    #[must_use]
    pub fn lines(&self) -> Vec<String> { self.entries.iter().cloned().collect() }

    /// Entries oldest first — the order [`save_history`] wants.
    #[must_use]
    pub fn chronological(&self) -> Vec<String> {
        self.entries.iter().rev().cloned().collect()
    }
}

/// Load a NUL-separated history file, oldest line first.
///
/// A missing file is not an error: it loads as an empty history. Any other I/O
/// failure is propagated.
///
/// # Errors
///
/// Returns the underlying error for anything except a missing file.
pub async fn load_history(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let bytes = match tokio::fs::read(path.as_ref()).await {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(
                path = %path.as_ref().display(),
                "history file missing, starting empty"
            );
            return Ok(Vec::new());
        }
        Err(error) => return Err(error),
    };
    Ok(bytes
        .split(|byte| *byte == SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| String::from_utf8_lossy(segment).into_owned())
        .collect())
}

/// Write lines to a NUL-separated history file, oldest line first, replacing any
/// existing file.
///
/// # Errors
///
/// Propagates file I/O errors unchanged.
pub async fn save_history(path: impl AsRef<Path>, lines: &[String]) -> io::Result<()> {
    let mut bytes = Vec::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(SEPARATOR);
    }
    tokio::fs::write(path, bytes).await
}
