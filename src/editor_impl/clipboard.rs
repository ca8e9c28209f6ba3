// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A kill ring of depth one.
//!
//! The clipboard is a single mutable text slot shared by reference: cloning a
//! [`Clipboard`] clones the handle, not the contents. Only `C-w` (cut the selection)
//! writes it and only `C-y` (yank) reads it. A process-wide default slot is used when
//! callers don't pass their own, so a cut in one prompt can be yanked in the next.

use crate::StdMutex;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    inner: Arc<StdMutex<String>>,
}

static GLOBAL_CLIPBOARD: OnceLock<Clipboard> = OnceLock::new();

impl Clipboard {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// The process-wide clipboard slot. All handles returned here alias the same
    /// contents.
    #[must_use]
    pub fn global() -> Clipboard { GLOBAL_CLIPBOARD.get_or_init(Clipboard::new).clone() }

    /// # Panics
    ///
    /// Panics if the lock is poisoned, which can only happen if another thread
    /// panicked while holding it.
    pub fn set(&self, text: impl Into<String>) {
        *self.inner.lock().unwrap() = text.into();
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned, which can only happen if another thread
    /// panicked while holding it.
    #[must_use]
    pub fn get(&self) -> String { self.inner.lock().unwrap().clone() }
}
