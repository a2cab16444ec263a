//! Pointer and keyboard events delivered to the engine.
//!
//! Positions are already in document space; the view collaborator applies
//! pan/zoom before handing events over.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer down/move/up event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    /// Position in document coordinates.
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// Left-button event without modifiers.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn shift(self) -> Self {
        self.with_modifiers(Modifiers::SHIFT)
    }
}

/// Logical key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Delete,
    Backspace,
    Tab,
    /// Function key F1..F12.
    Function(u8),
    /// A printable character, lowercased.
    Char(char),
}

impl Key {
    /// Parse a logical key name such as `"escape"`, `"del"`, `"f8"` or `"l"`.
    pub fn parse(name: &str) -> Option<Key> {
        if name == " " {
            return Some(Key::Space);
        }
        let lower = name.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "escape" | "esc" => Key::Escape,
            "enter" | "return" => Key::Enter,
            "space" | "spacebar" => Key::Space,
            "delete" | "del" => Key::Delete,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    (Some('f'), Some(_)) => {
                        let number: u8 = lower[1..].parse().ok()?;
                        if !(1..=12).contains(&number) {
                            return None;
                        }
                        Key::Function(number)
                    }
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Keys that confirm or repeat a command.
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }

    pub fn is_delete(self) -> bool {
        matches!(self, Key::Delete | Key::Backspace)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Escape => f.write_str("esc"),
            Key::Enter => f.write_str("enter"),
            Key::Space => f.write_str("space"),
            Key::Delete => f.write_str("del"),
            Key::Backspace => f.write_str("backspace"),
            Key::Tab => f.write_str("tab"),
            Key::Function(n) => write!(f, "f{n}"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(Key::parse("escape"), Some(Key::Escape));
        assert_eq!(Key::parse("Esc"), Some(Key::Escape));
        assert_eq!(Key::parse(" "), Some(Key::Space));
        assert_eq!(Key::parse("del"), Some(Key::Delete));
        assert_eq!(Key::parse("backspace"), Some(Key::Backspace));
        assert_eq!(Key::parse("F8"), Some(Key::Function(8)));
        assert_eq!(Key::parse("L"), Some(Key::Char('l')));
        assert_eq!(Key::parse("f13"), None);
        assert_eq!(Key::parse("shiftleft"), None);
        assert_eq!(Key::parse(""), None);
    }

    #[test]
    fn test_key_display_round_trips() {
        for key in [Key::Escape, Key::Space, Key::Function(3), Key::Char('c')] {
            assert_eq!(Key::parse(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::CTRL.command());
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.command());
        assert!(!Modifiers::SHIFT.command());
    }
}
