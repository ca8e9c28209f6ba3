// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The interactive input loop: reads events, feeds the engine, redraws on change,
//! and runs the completion race.
//!
//! Commands with I/O or control-flow effects are handled here; everything else goes
//! through [`EditEngine::apply`] and triggers a redraw only when the state actually
//! changed.
//!
//! ### The completion race
//!
//! On `Tab` the loop starts the caller's completer and simultaneously keeps reading
//! keys. Whichever finishes first is committed:
//!
//! - The user typed: the completer's [`AbortSignal`] is fired and its result is
//!   discarded. The loop does not wait for the completer to wind down — typing is
//!   never blocked by slow completion.
//! - The completer finished: its result is applied (buffer replaced, or candidate
//!   list printed), and the pending keystroke is then dispatched normally.
//!
//! The select is biased toward the completer so that an instantly-ready completion
//! deterministically beats a keystroke that is already buffered.

use crate::{
    complete_keyword, renderer, translate_event, AbortSignal, Clipboard, ColumnsSource,
    Command, Completer, CompletionResult, EchoMode, EditEngine, EditionSnapshot,
    EditorState, InputDevice, OutputDevice, RawModeGuard, RenderState, Segment,
};
use crossterm::{
    cursor::MoveTo,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::Write;
use thiserror::Error;

/// Errors surfaced by the prompt entry points.
#[derive(Debug, Error)]
pub enum ReadlineError {
    /// The user broke out of the prompt (`C-d`). The terminal has already been put
    /// back in order when this is returned.
    #[error("interrupted")]
    Interrupted,

    /// A password was requested but stdin or stdout is not a terminal.
    #[error("stdin or stdout is not a tty")]
    NotATty,

    /// The non-tty keyword fallback read a line that matches no keyword.
    #[error("input does not match any keyword")]
    NoMatch,

    /// The event stream ended while a prompt was still being edited.
    #[error("input stream closed")]
    ClosedInput,

    /// An I/O error from the terminal or the history file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which keyword comparison `read_keyword` uses at accept time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordCase {
    Sensitive,
    #[default]
    Insensitive,
}

pub(crate) fn keyword_lookup<'a, V>(
    line: &str,
    keywords: &'a [(String, V)],
    case: KeywordCase,
) -> Option<&'a V> {
    keywords
        .iter()
        .find(|(keyword, _)| match case {
            KeywordCase::Sensitive => keyword == line,
            KeywordCase::Insensitive => {
                keyword.to_lowercase() == line.to_lowercase()
            }
        })
        .map(|(_, value)| value)
}

/// Per-prompt state: devices, prompt, engine, and the last draw's metrics.
pub(crate) struct LineLoop<'a> {
    input: &'a mut InputDevice,
    output: &'a OutputDevice,
    columns: ColumnsSource,
    prompt: &'a [Segment],
    echo: EchoMode,
    clipboard: Clipboard,
    pub(crate) engine: EditEngine,
    render: RenderState,
}

impl<'a> LineLoop<'a> {
    #[allow(clippy::too_many_arguments)]
    fn new(
        input: &'a mut InputDevice,
        output: &'a OutputDevice,
        columns: ColumnsSource,
        prompt: &'a [Segment],
        echo: EchoMode,
        clipboard: Clipboard,
        history: &[String],
    ) -> Self {
        Self {
            input,
            output,
            columns,
            prompt,
            echo,
            clipboard,
            engine: EditEngine::new(history),
            render: RenderState::default(),
        }
    }

    /// Next non-`Nop` command. Unbound keys never cause redraws and never decide
    /// the completion race.
    async fn next_command(&mut self) -> Result<Command, ReadlineError> {
        loop {
            let event = self.input.next().await?;
            let command = translate_event(&event);
            if command != Command::Nop {
                return Ok(command);
            }
        }
    }

    fn draw(&mut self) -> Result<(), ReadlineError> {
        let columns = self.columns.get();
        let mut term = self.output.lock();
        self.render = renderer::draw(
            &mut *term,
            columns,
            self.prompt,
            &self.engine.state,
            self.echo,
            self.render,
        )?;
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<(), ReadlineError> {
        let snapshot = self.engine.clone();
        self.engine.apply(&self.clipboard, command);
        if self.engine != snapshot {
            self.draw()?;
        }
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), ReadlineError> {
        {
            let mut term = self.output.lock();
            term.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
        }
        self.render = RenderState::default();
        self.draw()
    }

    fn last_draw(&mut self, line: &str) -> Result<(), ReadlineError> {
        let columns = self.columns.get();
        let mut term = self.output.lock();
        renderer::last_draw(&mut *term, columns, self.prompt, line, self.echo, self.render)?;
        Ok(())
    }

    /// Run one completion race and return the keystroke command to dispatch next.
    async fn completion_race(
        &mut self,
        completer: &dyn Completer,
    ) -> Result<Command, ReadlineError> {
        // Collapse any selection so the completer sees a plain caret split.
        let snapshot = self.engine.clone();
        self.engine.reset_selection();
        if self.engine != snapshot {
            self.draw()?;
        }

        let abort = AbortSignal::new();
        let completion =
            completer.complete(EditionSnapshot::of(&self.engine), abort.clone());
        tokio::pin!(completion);

        enum RaceOutcome {
            Key(Command),
            Completed(CompletionResult),
        }

        let outcome = {
            let input = &mut *self.input;
            let next_key = async move {
                loop {
                    let event = input.next().await?;
                    let command = translate_event(&event);
                    if command != Command::Nop {
                        break Ok::<Command, ReadlineError>(command);
                    }
                }
            };
            tokio::pin!(next_key);
            tokio::select! {
                biased;
                result = &mut completion => RaceOutcome::Completed(result),
                command = &mut next_key => RaceOutcome::Key(command?),
            }
        };

        match outcome {
            RaceOutcome::Key(command) => {
                tracing::debug!("completion aborted by keystroke");
                abort.abort();
                Ok(command)
            }
            RaceOutcome::Completed(result) => {
                self.commit_completion(result)?;
                self.next_command().await
            }
        }
    }

    fn commit_completion(&mut self, result: CompletionResult) -> Result<(), ReadlineError> {
        match result {
            CompletionResult::NoCompletion => {}
            CompletionResult::CompleteWith { before, after } => {
                self.engine.state = EditorState::Edition { before, after };
                self.draw()?;
            }
            CompletionResult::Possibilities(words) => {
                {
                    let columns = self.columns.get();
                    let mut term = self.output.lock();
                    term.write_all(b"\r\n")?;
                    renderer::print_candidates(&mut *term, columns, &words)?;
                }
                // The candidate list scrolled the prompt away; repaint from scratch
                // on the fresh row.
                self.render = RenderState::default();
                self.draw()?;
            }
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn run_read_line(
    input: &mut InputDevice,
    output: &OutputDevice,
    columns: ColumnsSource,
    prompt: &[Segment],
    history: &[String],
    completer: &dyn Completer,
    clipboard: Clipboard,
) -> Result<String, ReadlineError> {
    let _raw_mode = RawModeGuard::acquire(!output.is_mock)?;
    let mut line_loop = LineLoop::new(
        input,
        output,
        columns,
        prompt,
        EchoMode::Normal,
        clipboard,
        history,
    );
    line_loop.draw()?;

    let mut pending: Option<Command> = None;
    loop {
        let command = match pending.take() {
            Some(command) => command,
            None => line_loop.next_command().await?,
        };
        match command {
            Command::AcceptLine => {
                let line = line_loop.engine.all_input();
                line_loop.last_draw(&line)?;
                return Ok(line);
            }
            Command::Break => {
                let line = line_loop.engine.all_input();
                line_loop.last_draw(&line)?;
                return Err(ReadlineError::Interrupted);
            }
            Command::ClearScreen => line_loop.clear_screen()?,
            Command::Refresh => line_loop.draw()?,
            Command::Complete => {
                pending = Some(line_loop.completion_race(completer).await?);
            }
            other => line_loop.apply(other)?,
        }
    }
}

pub(crate) async fn run_read_password(
    input: &mut InputDevice,
    output: &OutputDevice,
    columns: ColumnsSource,
    prompt: &[Segment],
    echo: EchoMode,
    clipboard: Clipboard,
) -> Result<String, ReadlineError> {
    let _raw_mode = RawModeGuard::acquire(!output.is_mock)?;
    // Type-ahead meant for an earlier prompt must never feed a secret.
    input.junk_old();
    let mut line_loop =
        LineLoop::new(input, output, columns, prompt, echo, clipboard, &[]);
    line_loop.draw()?;

    loop {
        match line_loop.next_command().await? {
            Command::AcceptLine => {
                let line = line_loop.engine.all_input();
                line_loop.last_draw(&line)?;
                return Ok(line);
            }
            Command::Break => {
                let line = line_loop.engine.all_input();
                line_loop.last_draw(&line)?;
                return Err(ReadlineError::Interrupted);
            }
            Command::ClearScreen => line_loop.clear_screen()?,
            Command::Refresh => line_loop.draw()?,
            // No completion during secret entry.
            Command::Complete => {}
            other => line_loop.apply(other)?,
        }
    }
}

pub(crate) async fn run_read_keyword<V: Clone>(
    input: &mut InputDevice,
    output: &OutputDevice,
    columns: ColumnsSource,
    prompt: &[Segment],
    keywords: &[(String, V)],
    case: KeywordCase,
    history: &[String],
) -> Result<V, ReadlineError> {
    let _raw_mode = RawModeGuard::acquire(!output.is_mock)?;
    let keyword_names: Vec<String> =
        keywords.iter().map(|(keyword, _)| keyword.clone()).collect();
    let mut line_loop = LineLoop::new(
        input,
        output,
        columns,
        prompt,
        EchoMode::Normal,
        Clipboard::global(),
        history,
    );
    line_loop.draw()?;

    loop {
        match line_loop.next_command().await? {
            Command::AcceptLine => {
                let line = line_loop.engine.all_input();
                if let Some(value) = keyword_lookup(&line, keywords, case) {
                    let value = value.clone();
                    line_loop.last_draw(&line)?;
                    return Ok(value);
                }
                // Not a keyword: silently keep editing.
            }
            Command::Break => {
                let line = line_loop.engine.all_input();
                line_loop.last_draw(&line)?;
                return Err(ReadlineError::Interrupted);
            }
            Command::ClearScreen => line_loop.clear_screen()?,
            Command::Refresh => line_loop.draw()?,
            Command::Complete => {
                let snapshot = line_loop.engine.clone();
                let _ = complete_keyword(&mut line_loop.engine, &keyword_names);
                if line_loop.engine != snapshot {
                    line_loop.draw()?;
                }
            }
            other => line_loop.apply(other)?,
        }
    }
}
