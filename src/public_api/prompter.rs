// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The [`Prompter`]: owner of the terminal devices and home of the four prompt entry
//! points.
//!
//! A `Prompter` holds the input event stream, the shared output writer, and the
//! column-width source. Each `read_*` call creates a fresh engine, scopes raw mode to
//! the call, and releases the terminal on every exit path. When stdin or stdout is
//! redirected, `read_line` and `read_keyword` degrade to a plain buffered read with
//! the prompt styles stripped; `read_password` refuses outright, because a masked
//! secret cannot be honored without a terminal.

use crate::{
    keyword_lookup, run_read_keyword, run_read_line, run_read_password, strip_styles,
    Clipboard, ColumnsSource, Completer, EchoMode, InputDevice, KeywordCase,
    NoCompleter, OutputDevice, ReadlineError, Segment, DEFAULT_PASSWORD_MASK,
};
use crossterm::tty::IsTty;
use miette::IntoDiagnostic;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Optional knobs for [`Prompter::read_line_with`].
#[allow(missing_debug_implementations)]
pub struct ReadLineOptions<'a> {
    /// Recallable lines, most recent first.
    pub history: &'a [String],
    /// Completion source raced against keystrokes on `Tab`.
    pub completer: &'a dyn Completer,
    /// Kill-ring slot; defaults to the process-wide one.
    pub clipboard: Clipboard,
}

static NO_COMPLETER: NoCompleter = NoCompleter;

impl Default for ReadLineOptions<'static> {
    fn default() -> Self {
        Self {
            history: &[],
            completer: &NO_COMPLETER,
            clipboard: Clipboard::global(),
        }
    }
}

#[allow(missing_debug_implementations)]
pub struct Prompter {
    pub input: InputDevice,
    pub output: OutputDevice,
    pub columns: ColumnsSource,
    /// Both stdin and stdout are terminals. Decided once at construction.
    pub interactive: bool,
}

impl Prompter {
    /// A prompter over the process stdio. Interactivity is probed here; the
    /// fallback paths kick in per call when either side is redirected.
    #[must_use]
    pub fn new_stdio() -> Prompter {
        let interactive = std::io::stdin().is_tty() && std::io::stdout().is_tty();
        Prompter {
            input: InputDevice::new_event_stream(),
            output: OutputDevice::new_stdout(),
            columns: ColumnsSource::Terminal,
            interactive,
        }
    }

    /// Like [`Prompter::new_stdio`], but returns `None` when stdin or stdout is
    /// piped, for callers that would rather bail than degrade.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal claims to be interactive but refuses a size
    /// query.
    pub fn try_new_interactive() -> miette::Result<Option<Prompter>> {
        let prompter = Self::new_stdio();
        if !prompter.interactive {
            return Ok(None);
        }
        // Make sure the terminal actually answers before promising interactivity.
        crossterm::terminal::size().into_diagnostic()?;
        Ok(Some(prompter))
    }

    /// Read one line with default options (no history, no completion, the global
    /// clipboard).
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Interrupted`] on `C-d`; I/O errors are passed through.
    pub async fn read_line(
        &mut self,
        prompt: &[Segment],
    ) -> Result<String, ReadlineError> {
        self.read_line_with(prompt, ReadLineOptions::default()).await
    }

    /// Read one line with history, completion, and an explicit clipboard.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Interrupted`] on `C-d`; I/O errors are passed through.
    pub async fn read_line_with(
        &mut self,
        prompt: &[Segment],
        options: ReadLineOptions<'_>,
    ) -> Result<String, ReadlineError> {
        if !self.interactive {
            tracing::debug!("stdio is not interactive; using the plain-read fallback");
            return self.fallback_read_line(prompt).await;
        }
        run_read_line(
            &mut self.input,
            &self.output,
            self.columns,
            prompt,
            options.history,
            options.completer,
            options.clipboard,
        )
        .await
    }

    /// Read a secret, echoing `*` per typed grapheme.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::NotATty`] when stdio is redirected — a masked prompt cannot
    /// be honored there. [`ReadlineError::Interrupted`] on `C-d`.
    pub async fn read_password(
        &mut self,
        prompt: &[Segment],
    ) -> Result<String, ReadlineError> {
        self.read_password_with(
            prompt,
            EchoMode::Masked(DEFAULT_PASSWORD_MASK),
            Clipboard::global(),
        )
        .await
    }

    /// Read a secret with an explicit echo mode ([`EchoMode::Normal`] shows the
    /// text, [`EchoMode::Hidden`] shows nothing at all).
    ///
    /// # Errors
    ///
    /// Same as [`Prompter::read_password`].
    pub async fn read_password_with(
        &mut self,
        prompt: &[Segment],
        echo: EchoMode,
        clipboard: Clipboard,
    ) -> Result<String, ReadlineError> {
        if !self.interactive {
            return Err(ReadlineError::NotATty);
        }
        run_read_password(
            &mut self.input,
            &self.output,
            self.columns,
            prompt,
            echo,
            clipboard,
        )
        .await
    }

    /// Keep editing until the buffer matches one of `keywords`, then return the
    /// associated value. `Tab` fills in the keyword when the typed prefix is
    /// unambiguous.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Interrupted`] on `C-d`. On redirected stdio one plain line
    /// is read instead and [`ReadlineError::NoMatch`] reports a failed lookup.
    pub async fn read_keyword<V: Clone>(
        &mut self,
        prompt: &[Segment],
        keywords: &[(String, V)],
        case: KeywordCase,
        history: &[String],
    ) -> Result<V, ReadlineError> {
        if !self.interactive {
            tracing::debug!("stdio is not interactive; using the plain-read fallback");
            let line = self.fallback_read_line(prompt).await?;
            return keyword_lookup(&line, keywords, case)
                .cloned()
                .ok_or(ReadlineError::NoMatch);
        }
        run_read_keyword(
            &mut self.input,
            &self.output,
            self.columns,
            prompt,
            keywords,
            case,
            history,
        )
        .await
    }

    /// Ask a yes/no question; accepts `yes`/`y`/`no`/`n` in any case.
    ///
    /// # Errors
    ///
    /// Same as [`Prompter::read_keyword`].
    pub async fn read_yes_no(
        &mut self,
        prompt: &[Segment],
        history: &[String],
    ) -> Result<bool, ReadlineError> {
        let keywords = [
            ("yes".to_string(), true),
            ("y".to_string(), true),
            ("no".to_string(), false),
            ("n".to_string(), false),
        ];
        self.read_keyword(prompt, &keywords, KeywordCase::Insensitive, history)
            .await
    }

    /// Non-tty path: stripped prompt, one buffered line, no editing.
    async fn fallback_read_line(
        &mut self,
        prompt: &[Segment],
    ) -> Result<String, ReadlineError> {
        {
            let mut term = self.output.lock();
            term.write_all(strip_styles(prompt).as_bytes())?;
            term.flush()?;
        }
        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            return Err(ReadlineError::ClosedInput);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}
