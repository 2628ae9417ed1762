//! Core types for the keymap system: Keystroke, Modifiers, KeyCode

use std::fmt;
use std::str::FromStr;

use super::config::KeymapError;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// The platform "command" modifier (Cmd on macOS, Ctrl elsewhere)
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }

    /// Check if the platform command key is held
    pub fn has_cmd(self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta()
        } else {
            self.ctrl()
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push(if cfg!(target_os = "macos") {
                "Cmd"
            } else {
                "Win"
            });
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code representing a logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key (normalized to lowercase)
    Char(char),

    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    Up,
    Down,
    Left,
    Right,

    Home,
    End,
    PageUp,
    PageDown,

    F(u8),
}

impl KeyCode {
    fn parse(key: &str) -> Option<KeyCode> {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c.to_ascii_lowercase()));
        }

        let code = match key {
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" | "back" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Space,
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
            _ => {
                let n: u8 = key.strip_prefix('f')?.parse().ok()?;
                return (1..=24).contains(&n).then_some(KeyCode::F(n));
            }
        };
        Some(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Up => write!(f, "↑"),
            KeyCode::Down => write!(f, "↓"),
            KeyCode::Left => write!(f, "←"),
            KeyCode::Right => write!(f, "→"),
            KeyCode::F(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Create a keystroke with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Create a keystroke with a character key
    pub fn char(c: char) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            mods: if c.is_ascii_uppercase() {
                Modifiers::SHIFT
            } else {
                Modifiers::NONE
            },
        }
    }

    /// The character this keystroke types into a cell, if any.
    ///
    /// Only bare or shifted keys type; anything with Ctrl/Alt/Meta is a shortcut.
    pub fn printable_char(&self) -> Option<char> {
        if !(self.mods.is_empty() || self.mods == Modifiers::SHIFT) {
            return None;
        }
        match self.key {
            KeyCode::Char(c) if self.mods.shift() => Some(c.to_ascii_uppercase()),
            KeyCode::Char(c) => Some(c),
            KeyCode::Space => Some(' '),
            _ => None,
        }
    }

    /// Display the keystroke using platform-specific symbols
    pub fn display_string(&self) -> String {
        let mac = cfg!(target_os = "macos");
        let mut out = String::new();
        for (held, symbol, text) in [
            (self.mods.ctrl(), "⌃", "Ctrl+"),
            (self.mods.alt(), "⌥", "Alt+"),
            (self.mods.shift(), "⇧", "Shift+"),
            (self.mods.meta(), "⌘", "Win+"),
        ] {
            if held {
                out.push_str(if mac { symbol } else { text });
            }
        }
        out.push_str(&self.key.to_string());
        out
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{}+{}", self.mods, self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// Parse a key string like "cmd+shift+s" or "shift+tab"
impl FromStr for Keystroke {
    type Err = KeymapError;

    fn from_str(key_str: &str) -> Result<Self, Self::Err> {
        let mut mods = Modifiers::NONE;
        let mut key = None;

        for part in key_str.split('+').map(str::trim) {
            let part = part.to_lowercase();
            match part.as_str() {
                "cmd" => mods = mods | Modifiers::cmd(),
                "ctrl" | "control" => mods = mods | Modifiers::CTRL,
                "shift" => mods = mods | Modifiers::SHIFT,
                "alt" | "option" | "opt" => mods = mods | Modifiers::ALT,
                "meta" | "super" | "win" => mods = mods | Modifiers::META,
                _ if key.is_some() => {
                    return Err(KeymapError::InvalidKey(format!(
                        "multiple keys in binding: {}",
                        key_str
                    )))
                }
                _ => {
                    key = Some(KeyCode::parse(&part).ok_or_else(|| {
                        KeymapError::InvalidKey(format!("unknown key: {}", part))
                    })?)
                }
            }
        }

        let key = key
            .ok_or_else(|| KeymapError::InvalidKey(format!("no key in binding: {}", key_str)))?;
        Ok(Keystroke::new(key, mods))
    }
}
