//! Logical key identifiers
//!
//! Keys are stored in chord bindings and persisted in the configuration by
//! name, so the set stays independent of the windowing backend. The winit
//! translation lives here so nothing outside this module touches raw
//! keycodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use winit::keyboard::{KeyCode, PhysicalKey};

/// A physical key that can take part in a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Ctrl,
    Shift,
    Alt,
    Meta,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Minus,
    Equal,
    Comma,
    Period,
}

impl Key {
    /// Translate a winit physical key. Left/right modifier variants
    /// collapse into one logical key; keys outside the bindable set map to
    /// None and are ignored by the router.
    pub fn from_winit(physical: PhysicalKey) -> Option<Self> {
        let PhysicalKey::Code(code) = physical else {
            return None;
        };
        let key = match code {
            KeyCode::ControlLeft | KeyCode::ControlRight => Key::Ctrl,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
            KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyB => Key::B,
            KeyCode::KeyC => Key::C,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyE => Key::E,
            KeyCode::KeyF => Key::F,
            KeyCode::KeyG => Key::G,
            KeyCode::KeyH => Key::H,
            KeyCode::KeyI => Key::I,
            KeyCode::KeyJ => Key::J,
            KeyCode::KeyK => Key::K,
            KeyCode::KeyL => Key::L,
            KeyCode::KeyM => Key::M,
            KeyCode::KeyN => Key::N,
            KeyCode::KeyO => Key::O,
            KeyCode::KeyP => Key::P,
            KeyCode::KeyQ => Key::Q,
            KeyCode::KeyR => Key::R,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyT => Key::T,
            KeyCode::KeyU => Key::U,
            KeyCode::KeyV => Key::V,
            KeyCode::KeyW => Key::W,
            KeyCode::KeyX => Key::X,
            KeyCode::KeyY => Key::Y,
            KeyCode::KeyZ => Key::Z,
            KeyCode::Digit0 => Key::Digit0,
            KeyCode::Digit1 => Key::Digit1,
            KeyCode::Digit2 => Key::Digit2,
            KeyCode::Digit3 => Key::Digit3,
            KeyCode::Digit4 => Key::Digit4,
            KeyCode::Digit5 => Key::Digit5,
            KeyCode::Digit6 => Key::Digit6,
            KeyCode::Digit7 => Key::Digit7,
            KeyCode::Digit8 => Key::Digit8,
            KeyCode::Digit9 => Key::Digit9,
            KeyCode::F1 => Key::F1,
            KeyCode::F2 => Key::F2,
            KeyCode::F3 => Key::F3,
            KeyCode::F4 => Key::F4,
            KeyCode::F5 => Key::F5,
            KeyCode::F6 => Key::F6,
            KeyCode::F7 => Key::F7,
            KeyCode::F8 => Key::F8,
            KeyCode::F9 => Key::F9,
            KeyCode::F10 => Key::F10,
            KeyCode::F11 => Key::F11,
            KeyCode::F12 => Key::F12,
            KeyCode::ArrowUp => Key::Up,
            KeyCode::ArrowDown => Key::Down,
            KeyCode::ArrowLeft => Key::Left,
            KeyCode::ArrowRight => Key::Right,
            KeyCode::Space => Key::Space,
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Minus => Key::Minus,
            KeyCode::Equal => Key::Equal,
            KeyCode::Comma => Key::Comma,
            KeyCode::Period => Key::Period,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Ctrl => write!(f, "Ctrl"),
            Key::Shift => write!(f, "Shift"),
            Key::Alt => write!(f, "Alt"),
            Key::Meta => write!(f, "Meta"),
            Key::Digit0 => write!(f, "0"),
            Key::Digit1 => write!(f, "1"),
            Key::Digit2 => write!(f, "2"),
            Key::Digit3 => write!(f, "3"),
            Key::Digit4 => write!(f, "4"),
            Key::Digit5 => write!(f, "5"),
            Key::Digit6 => write!(f, "6"),
            Key::Digit7 => write!(f, "7"),
            Key::Digit8 => write!(f, "8"),
            Key::Digit9 => write!(f, "9"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Format a chord for display, e.g. "Ctrl+Shift+N"
pub fn format_chord(keys: &[Key]) -> String {
    keys.iter()
        .map(Key::to_string)
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_sides_collapse() {
        assert_eq!(
            Key::from_winit(PhysicalKey::Code(KeyCode::ControlLeft)),
            Some(Key::Ctrl)
        );
        assert_eq!(
            Key::from_winit(PhysicalKey::Code(KeyCode::ControlRight)),
            Some(Key::Ctrl)
        );
    }

    #[test]
    fn test_unbindable_key_maps_to_none() {
        assert_eq!(Key::from_winit(PhysicalKey::Code(KeyCode::CapsLock)), None);
    }

    #[test]
    fn test_key_serde_round_trip() {
        let keys = vec![Key::Ctrl, Key::Shift, Key::N];
        let json = serde_json::to_string(&keys).unwrap();
        let parsed: Vec<Key> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, keys);
    }

    #[test]
    fn test_format_chord() {
        assert_eq!(format_chord(&[Key::Ctrl, Key::Digit1]), "Ctrl+1");
        assert_eq!(format_chord(&[]), "");
    }
}
