//! Keyboard shortcut registry and sequence matching.

use crate::input::{Key, KeyInput, Modifiers};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "tool", rename_all = "camelCase")]
pub enum Command {
    ActivateTool(ToolKind),
    /// Back to the select tool, forgetting the last command.
    Cancel,
    RepeatLastCommand,
    DeleteSelection,
    Undo,
    Redo,
    ToggleGrid,
    ToggleOrtho,
    ToggleOsnap,
    ToggleLayerPanel,
}

/// A key with the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    /// Parse a chord such as `"ctrl+z"`, `"command+shift+z"` or `"f8"`.
    ///
    /// `command` maps to the meta key.
    pub fn parse(text: &str) -> Option<KeyChord> {
        let mut modifiers = Modifiers::NONE;
        let mut parts: Vec<&str> = text.split('+').collect();
        let key = Key::parse(parts.pop()?)?;
        for part in parts {
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                "command" | "cmd" | "meta" => modifiers.meta = true,
                _ => return None,
            }
        }
        Some(KeyChord { key, modifiers })
    }

    fn matches(&self, input: &KeyInput) -> bool {
        self.key == input.key && self.modifiers == input.modifiers
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.ctrl, "ctrl+"),
            (m.alt, "alt+"),
            (m.meta, "command+"),
            (m.shift, "shift+"),
        ] {
            if held {
                f.write_str(name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// A key sequence bound to a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortcut {
    pub sequence: Vec<KeyChord>,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    /// Parse a space separated sequence such as `"l space"`.
    pub fn parse(sequence: &str, command: Command, description: &'static str) -> Option<Self> {
        let sequence = sequence
            .split_whitespace()
            .map(KeyChord::parse)
            .collect::<Option<Vec<_>>>()?;
        if sequence.is_empty() {
            return None;
        }
        Some(Self {
            sequence,
            command,
            description,
        })
    }

    /// Format the sequence for display (e.g., "l space").
    pub fn format(&self) -> String {
        self.sequence
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Table of keyboard shortcuts.
#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    shortcuts: Vec<Shortcut>,
}

const DEFAULT_BINDINGS: &[(&str, Command, &str)] = &[
    ("v space", Command::ActivateTool(ToolKind::Select), "Select tool"),
    ("l space", Command::ActivateTool(ToolKind::Line), "Line"),
    ("c space", Command::ActivateTool(ToolKind::Circle), "Circle"),
    ("a space", Command::ActivateTool(ToolKind::Arc), "Arc"),
    ("p space", Command::ActivateTool(ToolKind::Polyline), "Polyline"),
    ("r space", Command::ActivateTool(ToolKind::Rectangle), "Rectangle"),
    ("g", Command::ToggleGrid, "Toggle grid"),
    ("f8", Command::ToggleOrtho, "Toggle ortho mode"),
    ("f3", Command::ToggleOsnap, "Toggle object snap"),
    ("ctrl+l", Command::ToggleLayerPanel, "Toggle layer panel"),
    ("del", Command::DeleteSelection, "Delete selected entities"),
    ("backspace", Command::DeleteSelection, "Delete selected entities"),
    ("esc", Command::Cancel, "Cancel current command"),
    ("space", Command::RepeatLastCommand, "Repeat last command"),
    ("enter", Command::RepeatLastCommand, "Repeat last command"),
    ("ctrl+z", Command::Undo, "Undo"),
    ("command+z", Command::Undo, "Undo"),
    ("ctrl+y", Command::Redo, "Redo"),
    ("command+shift+z", Command::Redo, "Redo"),
];

impl Default for ShortcutRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for &(sequence, command, description) in DEFAULT_BINDINGS {
            registry.bind(sequence, command, description);
        }
        registry
    }
}

impl ShortcutRegistry {
    /// A registry with no bindings.
    pub fn empty() -> Self {
        Self {
            shortcuts: Vec::new(),
        }
    }

    /// Bind a sequence. Returns false if it does not parse.
    pub fn bind(&mut self, sequence: &str, command: Command, description: &'static str) -> bool {
        match Shortcut::parse(sequence, command, description) {
            Some(shortcut) => {
                self.shortcuts.retain(|s| s.sequence != shortcut.sequence);
                self.shortcuts.push(shortcut);
                true
            }
            None => {
                log::warn!("Ignoring unparseable shortcut {sequence:?}");
                false
            }
        }
    }

    /// All registered shortcuts.
    pub fn all(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    fn exact(&self, keys: &[KeyInput]) -> Option<Command> {
        self.shortcuts
            .iter()
            .find(|s| {
                s.sequence.len() == keys.len()
                    && s.sequence.iter().zip(keys).all(|(chord, key)| chord.matches(key))
            })
            .map(|s| s.command)
    }

    fn is_prefix(&self, keys: &[KeyInput]) -> bool {
        self.shortcuts.iter().any(|s| {
            s.sequence.len() > keys.len()
                && s.sequence.iter().zip(keys).all(|(chord, key)| chord.matches(key))
        })
    }
}

/// Buffers key presses until they form a bound sequence.
#[derive(Debug, Clone, Default)]
pub struct ShortcutMatcher {
    pending: Vec<KeyInput>,
}

impl ShortcutMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key press. Returns a command once a sequence completes.
    pub fn feed(&mut self, registry: &ShortcutRegistry, input: KeyInput) -> Option<Command> {
        self.pending.push(input);
        loop {
            if let Some(command) = registry.exact(&self.pending) {
                self.pending.clear();
                return Some(command);
            }
            if registry.is_prefix(&self.pending) {
                return None;
            }
            if self.pending.len() == 1 {
                self.pending.clear();
                return None;
            }
            // The buffered prefix went nowhere; retry the new key alone.
            self.pending.clear();
            self.pending.push(input);
        }
    }

    /// Keys waiting for the rest of a sequence.
    pub fn pending(&self) -> &[KeyInput] {
        &self.pending
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
