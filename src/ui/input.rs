use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Drain pending terminal events and report whether any of them asks to quit.
///
/// Never blocks; q, Esc and Ctrl-C all close the window.
pub fn close_requested() -> Result<bool, std::io::Error> {
    let mut close = false;

    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            close |= is_close_key(&key);
        }
    }

    Ok(close)
}

fn is_close_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
