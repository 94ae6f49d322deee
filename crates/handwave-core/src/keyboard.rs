//! Keyboard fallback for running without a camera
//!
//! Produces the same gesture vocabulary as the recognizer so downstream
//! consumers cannot tell the two sources apart.
//!
//! | Key            | Gesture      |
//! |----------------|--------------|
//! | `←`            | SCROLL_LEFT  |
//! | `→`            | SCROLL_RIGHT |
//! | `Enter`/`Space`| CONFIRM      |
//! | `m` / `M`      | SUMMON       |
//! | `Esc`          | DISMISS      |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::recognizer::Gesture;

/// Map a terminal key press to a gesture. Releases and repeats are ignored.
pub fn gesture_for_key(key: &KeyEvent) -> Option<Gesture> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(Gesture::ScrollLeft),
        KeyCode::Right => Some(Gesture::ScrollRight),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Gesture::Confirm),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Gesture::Summon),
        KeyCode::Esc => Some(Gesture::Dismiss),
        _ => None,
    }
}

/// Map a DOM-style key name (`"ArrowLeft"`, `"Enter"`, ...) to a gesture
pub fn gesture_for_key_name(name: &str) -> Option<Gesture> {
    match name {
        "ArrowLeft" => Some(Gesture::ScrollLeft),
        "ArrowRight" => Some(Gesture::ScrollRight),
        "Enter" | " " | "Spacebar" => Some(Gesture::Confirm),
        "m" | "M" => Some(Gesture::Summon),
        "Escape" => Some(Gesture::Dismiss),
        _ => None,
    }
}
