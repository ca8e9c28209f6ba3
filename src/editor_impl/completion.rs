// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Completion: the caller-facing [`Completer`] trait, the word-list convenience
//! completer, and the one-shot [`AbortSignal`] used by the completion race.
//!
//! The input loop races the completer against the next keystroke. If the user keeps
//! typing, the loop fires the abort signal and stops caring about the result —
//! completers are contractually required to observe the signal and return promptly,
//! because typing must never be blocked by slow completion.

use crate::{grapheme, EditEngine};
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::watch;

/// What a completer produced for one `Tab` press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// Nothing matched; the buffer is left alone.
    NoCompletion,
    /// Replace the buffer with this caret split.
    CompleteWith { before: String, after: String },
    /// Several candidates remain; show them and let the user keep typing.
    Possibilities(Vec<String>),
}

/// The caret split handed to a completer, captured after any selection has been
/// collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionSnapshot {
    pub before: String,
    pub after: String,
}

impl EditionSnapshot {
    #[must_use]
    pub fn of(engine: &EditEngine) -> Self {
        let (before, after) = engine.edition_parts();
        Self { before, after }
    }
}

/// Edge-triggered, one-shot cancellation token for the completion race.
///
/// Cloning shares the underlying signal. `abort` may be called any number of times;
/// only the first transition is observable.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for AbortSignal {
    fn default() -> Self { Self::new() }
}

impl AbortSignal {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Notify the completer that its result will be discarded.
    pub fn abort(&self) { self.sender.send_replace(true); }

    #[must_use]
    pub fn is_aborted(&self) -> bool { *self.sender.borrow() }

    /// Resolves once [`AbortSignal::abort`] has been called (immediately if it
    /// already was).
    pub async fn aborted(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender half is owned by `self`, so `changed` cannot fail while we
        // are borrowing it.
        let _ = receiver.wait_for(|aborted| *aborted).await;
    }
}

/// An asynchronous completion source.
///
/// Implementations receive the caret split and the abort signal for this race. A
/// completer that does real work (filesystem, network) must select its work against
/// [`AbortSignal::aborted`] and bail out when it resolves.
pub trait Completer: Send + Sync {
    fn complete(
        &self,
        edition: EditionSnapshot,
        abort: AbortSignal,
    ) -> BoxFuture<'_, CompletionResult>;
}

/// The default completer: never completes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompleter;

impl Completer for NoCompleter {
    fn complete(
        &self,
        _edition: EditionSnapshot,
        _abort: AbortSignal,
    ) -> BoxFuture<'_, CompletionResult> {
        Box::pin(std::future::ready(CompletionResult::NoCompletion))
    }
}

/// Completes the word under the caret against a fixed candidate list.
///
/// The word is everything after the last whitespace in `before`; the text up to and
/// including that whitespace is preserved untouched.
#[derive(Debug, Clone, Default)]
pub struct WordCompleter {
    pub candidates: Vec<String>,
}

impl WordCompleter {
    #[must_use]
    pub fn new(candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

impl Completer for WordCompleter {
    fn complete(
        &self,
        edition: EditionSnapshot,
        _abort: AbortSignal,
    ) -> BoxFuture<'_, CompletionResult> {
        let split = edition
            .before
            .rfind(char::is_whitespace)
            .map_or(0, |offset| offset + 1);
        let (prefix, word) = edition.before.split_at(split);
        let result = complete(prefix, word, &edition.after, &self.candidates);
        Box::pin(std::future::ready(result))
    }
}

/// Common-prefix extension of `word` over `candidates`.
///
/// - No candidate has `word` as a prefix: [`CompletionResult::NoCompletion`].
/// - Exactly one candidate matches: the buffer becomes `before ⧺ candidate ⧺ " "`.
/// - Several match and share a prefix strictly longer than `word`: the buffer is
///   extended to that prefix.
/// - Otherwise: the sorted match list is returned for display.
#[must_use]
pub fn complete(
    before: &str,
    word: &str,
    after: &str,
    candidates: &[String],
) -> CompletionResult {
    let mut matches: Vec<&String> =
        candidates.iter().filter(|c| c.starts_with(word)).collect();

    let Some(first_match) = matches.first() else {
        return CompletionResult::NoCompletion;
    };

    if matches.len() == 1 {
        return CompletionResult::CompleteWith {
            before: format!("{before}{first_match} "),
            after: after.to_string(),
        };
    }

    let prefix = matches
        .iter()
        .skip(1)
        .fold(first_match.as_str(), |acc, c| grapheme::common_prefix(acc, c));
    if prefix.len() > word.len() {
        return CompletionResult::CompleteWith {
            before: format!("{before}{prefix}"),
            after: after.to_string(),
        };
    }

    matches.sort();
    CompletionResult::Possibilities(matches.into_iter().cloned().collect())
}

/// Synchronous keyword completion used by `read_keyword`: if exactly one keyword has
/// the buffer's `before` side as a prefix, replace the whole buffer with it.
pub(crate) fn complete_keyword(engine: &mut EditEngine, keywords: &[String]) -> bool {
    engine.reset_selection();
    let (typed, _) = engine.edition_parts();
    let mut matches = keywords.iter().filter(|k| k.starts_with(&typed));
    let (Some(only), None) = (matches.next(), matches.next()) else {
        return false;
    };
    engine.state = crate::EditorState::Edition {
        before: only.clone(),
        after: String::new(),
    };
    true
}
