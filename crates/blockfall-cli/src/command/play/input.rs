use blockfall_engine::Action;
use crossterm::event::{Event, KeyCode, KeyEventKind};

/// Maps a terminal event to a game action.
///
/// Only presses of bound keys produce an action.
pub(super) fn action_for_event(event: &Event) -> Option<Action> {
    let key = event.as_key_event()?;
    if key.kind != KeyEventKind::Press {
        return None;
    }
    action_for_key(key.code)
}

pub(super) fn action_for_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Left | KeyCode::Char('a' | 'A') => Action::Left,
        KeyCode::Right | KeyCode::Char('d' | 'D') => Action::Right,
        KeyCode::Up | KeyCode::Char('w' | 'W') => Action::Rotate,
        KeyCode::Down | KeyCode::Char('s' | 'S') => Action::SoftDrop,
        KeyCode::Char(' ') => Action::HardDrop,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p' | 'P') => Action::TogglePause,
        _ => return None,
    };
    Some(action)
}
