use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::TextField;

/// Shift+letter arrives from some terminals as lowercase with SHIFT set.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

/// Apply an editing key to a text field. Returns false for keys that are
/// not edits (including Ctrl/Alt chords, which are swallowed by the caller).
pub(super) fn edit_text(field: &mut TextField, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            field.insert(c)
        }
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        _ => return false,
    }
    true
}

/// Move a list cursor by one, staying inside `[0, len - 1]`.
pub(super) fn step(index: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (index + 1).min(len - 1)
    } else {
        index.saturating_sub(1).min(len - 1)
    }
}

/// j/k and the arrow keys as a direction: `Some(true)` is down.
pub(super) fn vertical(key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => Some(true),
        KeyCode::Up | KeyCode::Char('k') => Some(false),
        _ => None,
    }
}
