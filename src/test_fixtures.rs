// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Shared fixtures: a scripted input-event stream, a byte-capturing output device,
//! and a mock [`Prompter`] wired from both. These make the whole input loop drivable
//! end to end without a terminal.

use crate::{
    ColumnsSource, CrosstermEventResult, InputDevice, OutputDevice, PinnedInputStream,
    Prompter, StdMutex,
};
use async_stream::stream;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::{
    io::{Result, Write},
    sync::Arc,
    time::Duration,
};

/// Turn a scripted `Vec` of events into the pinned stream an [`InputDevice`] wants.
pub(crate) fn gen_input_stream(
    generator_vec: Vec<CrosstermEventResult>,
) -> PinnedInputStream {
    let it = stream! {
        for event in generator_vec {
            yield event;
        }
    };
    Box::pin(it)
}

/// Like [`gen_input_stream`], with a delay before each event.
pub(crate) fn gen_input_stream_with_delay(
    generator_vec: Vec<CrosstermEventResult>,
    delay: Duration,
) -> PinnedInputStream {
    let it = stream! {
        for event in generator_vec {
            tokio::time::sleep(delay).await;
            yield event;
        }
    };
    Box::pin(it)
}

/// A plain key press.
pub(crate) fn press(c: char) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
}

/// A special (non-character) key press.
pub(crate) fn press_code(code: KeyCode) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

/// A control-chord key press.
pub(crate) fn press_ctrl(c: char) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)))
}

/// One press per character of `text`.
pub(crate) fn press_str(text: &str) -> Vec<CrosstermEventResult> {
    text.chars().map(press).collect()
}

/// Clonable stdout capture. Cloning shares the buffer.
#[derive(Clone, Default)]
pub(crate) struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
}

impl StdoutMock {
    pub(crate) fn get_copy_of_buffer_as_string(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        String::from_utf8(buffer_data.clone()).expect("utf8")
    }

    pub(crate) fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        let stripped = strip_ansi_escapes::strip(buffer_data.clone());
        String::from_utf8(stripped).expect("utf8")
    }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

pub(crate) fn mock_output_device() -> (OutputDevice, StdoutMock) {
    let stdout_mock = StdoutMock::default();
    let output_device = OutputDevice {
        resource: Arc::new(StdMutex::new(stdout_mock.clone())),
        is_mock: true,
    };
    (output_device, stdout_mock)
}

/// A fully mocked, "interactive" prompter over a scripted event stream and a fixed
/// terminal width.
pub(crate) fn mock_prompter(
    events: Vec<CrosstermEventResult>,
    columns: u16,
) -> (Prompter, StdoutMock) {
    let (output, stdout_mock) = mock_output_device();
    let prompter = Prompter {
        input: InputDevice {
            resource: gen_input_stream(events),
        },
        output,
        columns: ColumnsSource::Fixed(columns),
        interactive: true,
    };
    (prompter, stdout_mock)
}

/// A self-deleting scratch directory for file round-trip tests.
pub(crate) struct TempDir {
    pub path: std::path::PathBuf,
}

pub(crate) fn create_temp_dir() -> TempDir {
    static NEXT_ID: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);
    let unique = format!(
        "linedit_test_{}_{}",
        std::process::id(),
        NEXT_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    );
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path).expect("create temp dir");
    TempDir { path }
}

impl Drop for TempDir {
    fn drop(&mut self) { let _ = std::fs::remove_dir_all(&self.path); }
}
