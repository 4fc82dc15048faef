//! UI events - intents from the terminal shell to the sync controller

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Session
    Connect,
    Disconnect,

    // Remote state
    InitializeAccount,
    SubmitPendingInput,
    Refresh,

    // Pending input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // List navigation
    ScrollUp,
    ScrollDown,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, input_mode: InputMode, show_help: bool) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('c') => Some(UiEvent::Connect),
            KeyCode::Char('d') => Some(UiEvent::Disconnect),
            KeyCode::Char('i') => Some(UiEvent::InitializeAccount),
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('s') | KeyCode::Enter => Some(UiEvent::SubmitPendingInput),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::SubmitPendingInput),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letters_are_text_while_editing() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('c')), InputMode::Normal, false),
            Some(UiEvent::Connect)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('c')), InputMode::Editing, false),
            Some(UiEvent::CharInput('c'))
        );
    }

    #[test]
    fn test_help_swallows_keys() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), InputMode::Normal, true),
            Some(UiEvent::CloseHelp)
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(key, InputMode::Editing, true), Some(UiEvent::Quit));
    }
}
