// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The closed set of editor commands, and the key → command translation table.
//!
//! Translation is total: every event maps to a [`Command`], with [`Command::Nop`] for
//! anything unbound. The input loop handles the commands that involve I/O or control
//! flow (`AcceptLine`, `Break`, `Complete`, `Refresh`, `ClearScreen`) itself; all
//! others are fed to the pure [`crate::EditEngine`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Editor commands.
///
/// `Insert`, `BackwardDeleteWord`, and `ForwardDeleteWord` are reserved: they are part
/// of the command set but currently have no effect and no default binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Nop,
    /// Insert one printable grapheme at the cursor.
    Char(char),
    BackwardDeleteChar,
    ForwardDeleteChar,
    BeginningOfLine,
    EndOfLine,
    Complete,
    KillLine,
    AcceptLine,
    BackwardDeleteWord,
    ForwardDeleteWord,
    HistoryNext,
    HistoryPrevious,
    Break,
    ClearScreen,
    Insert,
    Refresh,
    BackwardChar,
    ForwardChar,
    SetMark,
    Yank,
    KillRingSave,
}

/// Translate a terminal event into a [`Command`].
///
/// Resize events translate to [`Command::Refresh`] so the next draw picks up the new
/// column width.
#[must_use]
pub fn translate_event(event: &Event) -> Command {
    match event {
        Event::Key(key_event) => translate_key_event(key_event),
        Event::Resize(_, _) => Command::Refresh,
        _ => Command::Nop,
    }
}

/// Translate a key press into a [`Command`].
///
/// The full table:
///
/// | Key | Command |
/// |---|---|
/// | Up / Down | `HistoryPrevious` / `HistoryNext` |
/// | Left / Right | `BackwardChar` / `ForwardChar` |
/// | Enter, `C-j`, `C-m` | `AcceptLine` |
/// | Home, `C-a` | `BeginningOfLine` |
/// | End, `C-e` | `EndOfLine` |
/// | Backspace, `C-?` | `BackwardDeleteChar` |
/// | Delete | `ForwardDeleteChar` |
/// | Tab, `C-i` | `Complete` |
/// | Insert | `Insert` |
/// | `C-@` | `SetMark` |
/// | `C-d` | `Break` |
/// | `C-k` | `KillLine` |
/// | `C-l` | `ClearScreen` |
/// | `C-n` / `C-p` | `BackwardChar` / `ForwardChar` (sic — inverted from the GNU Readline convention, preserved verbatim) |
/// | `C-r` | `Refresh` |
/// | `C-w` | `KillRingSave` |
/// | `C-y` | `Yank` |
/// | any printable grapheme | `Char(g)` |
/// | anything else | `Nop` |
#[must_use]
pub fn translate_key_event(key_event: &KeyEvent) -> Command {
    if key_event.kind == KeyEventKind::Release {
        return Command::Nop;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    if ctrl && !alt {
        return match key_event.code {
            KeyCode::Char(c) => translate_control_char(c.to_ascii_lowercase()),
            _ => Command::Nop,
        };
    }
    if alt {
        return Command::Nop;
    }

    match key_event.code {
        KeyCode::Up => Command::HistoryPrevious,
        KeyCode::Down => Command::HistoryNext,
        KeyCode::Left => Command::BackwardChar,
        KeyCode::Right => Command::ForwardChar,
        KeyCode::Enter => Command::AcceptLine,
        KeyCode::Home => Command::BeginningOfLine,
        KeyCode::End => Command::EndOfLine,
        KeyCode::Insert => Command::Insert,
        KeyCode::Backspace => Command::BackwardDeleteChar,
        KeyCode::Delete => Command::ForwardDeleteChar,
        KeyCode::Tab => Command::Complete,
        KeyCode::Char(c) if !c.is_control() => Command::Char(c),
        _ => Command::Nop,
    }
}

fn translate_control_char(c: char) -> Command {
    match c {
        '@' => Command::SetMark,
        'a' => Command::BeginningOfLine,
        'd' => Command::Break,
        'e' => Command::EndOfLine,
        'i' => Command::Complete,
        'j' | 'm' => Command::AcceptLine,
        'k' => Command::KillLine,
        'l' => Command::ClearScreen,
        // Inverted on purpose; do not "fix". See the table above.
        'n' => Command::BackwardChar,
        'p' => Command::ForwardChar,
        'r' => Command::Refresh,
        'w' => Command::KillRingSave,
        'y' => Command::Yank,
        '?' => Command::BackwardDeleteChar,
        _ => Command::Nop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(translate_key_event(&plain(KeyCode::Up)), Command::HistoryPrevious);
        assert_eq!(translate_key_event(&plain(KeyCode::Down)), Command::HistoryNext);
        assert_eq!(translate_key_event(&plain(KeyCode::Left)), Command::BackwardChar);
        assert_eq!(translate_key_event(&plain(KeyCode::Right)), Command::ForwardChar);
        assert_eq!(translate_key_event(&plain(KeyCode::Enter)), Command::AcceptLine);
        assert_eq!(translate_key_event(&plain(KeyCode::Home)), Command::BeginningOfLine);
        assert_eq!(translate_key_event(&plain(KeyCode::End)), Command::EndOfLine);
        assert_eq!(
            translate_key_event(&plain(KeyCode::Backspace)),
            Command::BackwardDeleteChar
        );
        assert_eq!(
            translate_key_event(&plain(KeyCode::Delete)),
            Command::ForwardDeleteChar
        );
        assert_eq!(translate_key_event(&plain(KeyCode::Tab)), Command::Complete);
        assert_eq!(translate_key_event(&plain(KeyCode::Insert)), Command::Insert);
    }

    #[test]
    fn test_control_bindings() {
        assert_eq!(translate_key_event(&ctrl('@')), Command::SetMark);
        assert_eq!(translate_key_event(&ctrl('a')), Command::BeginningOfLine);
        assert_eq!(translate_key_event(&ctrl('d')), Command::Break);
        assert_eq!(translate_key_event(&ctrl('e')), Command::EndOfLine);
        assert_eq!(translate_key_event(&ctrl('i')), Command::Complete);
        assert_eq!(translate_key_event(&ctrl('j')), Command::AcceptLine);
        assert_eq!(translate_key_event(&ctrl('k')), Command::KillLine);
        assert_eq!(translate_key_event(&ctrl('l')), Command::ClearScreen);
        assert_eq!(translate_key_event(&ctrl('m')), Command::AcceptLine);
        assert_eq!(translate_key_event(&ctrl('r')), Command::Refresh);
        assert_eq!(translate_key_event(&ctrl('w')), Command::KillRingSave);
        assert_eq!(translate_key_event(&ctrl('y')), Command::Yank);
        assert_eq!(translate_key_event(&ctrl('?')), Command::BackwardDeleteChar);
    }

    #[test]
    fn test_ctrl_n_and_ctrl_p_are_inverted_on_purpose() {
        assert_eq!(translate_key_event(&ctrl('n')), Command::BackwardChar);
        assert_eq!(translate_key_event(&ctrl('p')), Command::ForwardChar);
    }

    #[test]
    fn test_printable_chars() {
        assert_eq!(translate_key_event(&plain(KeyCode::Char('x'))), Command::Char('x'));
        assert_eq!(
            translate_key_event(&KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Command::Char('X')
        );
        assert_eq!(translate_key_event(&plain(KeyCode::Char('é'))), Command::Char('é'));
    }

    #[test]
    fn test_unbound_keys_are_nop() {
        assert_eq!(translate_key_event(&plain(KeyCode::PageUp)), Command::Nop);
        assert_eq!(translate_key_event(&ctrl('z')), Command::Nop);
        assert_eq!(
            translate_key_event(&KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT)),
            Command::Nop
        );
    }

    #[test]
    fn test_resize_translates_to_refresh() {
        assert_eq!(translate_event(&Event::Resize(120, 40)), Command::Refresh);
    }
}
