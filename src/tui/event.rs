//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::HookError;
use crate::tui::app::{Action, Mode, SetupField};

/// How long to wait for input before the next frame.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Wait briefly for a key and map it to an action.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn next_action(mode: Mode, field: SetupField) -> Result<Option<Action>, HookError> {
    if !event::poll(POLL_INTERVAL).map_err(|e| HookError::Terminal(format!("Event poll failed: {e}")))? {
        return Ok(None);
    }

    match event::read().map_err(|e| HookError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(map_key(key, mode, field)),
        _ => Ok(None),
    }
}

/// Map a key press to an action for the current screen.
#[must_use]
pub fn map_key(key: KeyEvent, mode: Mode, field: SetupField) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Handle Ctrl+C
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Setup => map_setup(key.code, ctrl, field),
        Mode::Running => map_running(key.code),
        Mode::Feedback => map_feedback(key.code),
        Mode::Editing => map_editing(key.code),
    }
}

fn map_setup(code: KeyCode, ctrl: bool, field: SetupField) -> Option<Action> {
    match code {
        KeyCode::Char('r') if ctrl => Some(Action::StartReading),
        KeyCode::Char('e') if ctrl => Some(Action::EditDomains),
        KeyCode::Char('l') if ctrl => Some(Action::ReloadDomains),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::F(n) if n >= 1 => Some(Action::Preset(usize::from(n - 1))),
        KeyCode::Char(' ') if !field.is_text() => Some(Action::Toggle),
        KeyCode::Char(c) if !ctrl => Some(Action::Input(c)),
        _ => None,
    }
}

fn map_running(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ' | 'p') => Some(Action::Pause),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('d') => Some(Action::Dismiss),
        KeyCode::Char('e') => Some(Action::EditDomains),
        KeyCode::Char('l') => Some(Action::ReloadDomains),
        _ => None,
    }
}

fn map_feedback(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('x') => Some(Action::Reset),
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Char(c) if c.is_ascii_digit() => Some(Action::Input(c)),
        _ => None,
    }
}

fn map_editing(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => Some(Action::Close),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::Input(c)),
        _ => None,
    }
}

/// Key hints for the status bar.
#[must_use]
pub const fn help(mode: Mode) -> &'static str {
    match mode {
        Mode::Setup => "Tab:field | ←/→/Space:choose | F1-F4:preset | Enter:start | ^R:read | ^E:distractions | ^L:reload | Esc:quit",
        Mode::Running => "Space:pause | s:stop | r:reset | d:dismiss lock | e:distractions | l:reload | q:quit",
        Mode::Feedback => "Tab:field | ←/→:adjust | 1-5:rating | Enter:submit | x:discard | q:quit",
        Mode::Editing => "Comma-separated domains | Enter:save | Esc:close",
    }
}
