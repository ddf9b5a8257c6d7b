//! Core hotkey value types.
//!
//! This module provides:
//! - `Modifiers` - Win32-style modifier flags (Ctrl, Shift, Alt, Win)
//! - `Key` - virtual-key enum for the primary key of a combination
//! - `Hotkey` - an immutable modifier-set + key value with a canonical text form
//! - `HotkeyBinding` - a registered hotkey with its service id and display name
//! - `HotkeyParseError` - detailed parse errors for user feedback

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a hotkey string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HotkeyParseError {
    #[error("hotkey must contain at least one modifier and one key")]
    Incomplete,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

bitflags! {
    /// Modifier keys for a hotkey combination.
    ///
    /// Values match the Win32 `RegisterHotKey` modifier constants so the set
    /// can be handed to a native registrar unchanged. An empty set is a
    /// legal value (key-only binding), though the text grammar never
    /// produces one (see [`Hotkey::parse`]).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const ALT = 0x0001;
        const CONTROL = 0x0002;
        const SHIFT = 0x0004;
        const WIN = 0x0008;
    }
}

impl Modifiers {
    /// Parse a single modifier token, case-insensitively.
    ///
    /// Both `ctrl` and `control` are accepted for the Control flag; older
    /// saved hotkey text uses the long form.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifiers::CONTROL),
            "shift" => Some(Modifiers::SHIFT),
            "alt" => Some(Modifiers::ALT),
            "win" => Some(Modifiers::WIN),
            _ => None,
        }
    }
}

/// A virtual key usable as the primary key of a hotkey.
///
/// Discriminants are Win32 virtual-key codes. `None` is a sentinel for
/// "unset": it can be constructed and formats as `"None"`, but the parser
/// rejects it and it is never a valid registration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Key {
    None = 0x00,
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    Space = 0x20,
    Enter = 0x0D,
    Escape = 0x1B,
    Tab = 0x09,
}

impl Key {
    /// Every key the parser accepts, in name-lookup order. `None` is
    /// deliberately absent so `"none"` never parses.
    const ALL: [Key; 42] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::Space,
        Key::Enter,
        Key::Escape,
        Key::Tab,
    ];

    /// The Win32 virtual-key code for this key.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Canonical display name, as used in the hotkey text form.
    pub fn name(self) -> &'static str {
        match self {
            Key::None => "None",
            Key::A => "A",
            Key::B => "B",
            Key::C => "C",
            Key::D => "D",
            Key::E => "E",
            Key::F => "F",
            Key::G => "G",
            Key::H => "H",
            Key::I => "I",
            Key::J => "J",
            Key::K => "K",
            Key::L => "L",
            Key::M => "M",
            Key::N => "N",
            Key::O => "O",
            Key::P => "P",
            Key::Q => "Q",
            Key::R => "R",
            Key::S => "S",
            Key::T => "T",
            Key::U => "U",
            Key::V => "V",
            Key::W => "W",
            Key::X => "X",
            Key::Y => "Y",
            Key::Z => "Z",
            Key::F1 => "F1",
            Key::F2 => "F2",
            Key::F3 => "F3",
            Key::F4 => "F4",
            Key::F5 => "F5",
            Key::F6 => "F6",
            Key::F7 => "F7",
            Key::F8 => "F8",
            Key::F9 => "F9",
            Key::F10 => "F10",
            Key::F11 => "F11",
            Key::F12 => "F12",
            Key::Space => "Space",
            Key::Enter => "Enter",
            Key::Escape => "Escape",
            Key::Tab => "Tab",
        }
    }

    /// Parse a single key token, case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        Key::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A hotkey combination: a set of modifiers plus a primary key.
///
/// Equality is structural. The canonical text form is the bare key name when
/// no modifiers are set, otherwise `Modifier+...+Key` with modifiers in the
/// fixed order Ctrl, Shift, Alt, Win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl Hotkey {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    /// Parse a hotkey from its text form, e.g. `"Ctrl+Shift+N"`.
    ///
    /// Tokens are split on `+`, trimmed, and matched case-insensitively;
    /// empty tokens are dropped. Every token but the last must be a
    /// modifier, the last must be a key, and both must be present: a bare
    /// key is a parse error even though a modifier-less [`Hotkey`] value is
    /// legal when constructed directly. [`Display`](fmt::Display) and
    /// `parse` are therefore inverses only for hotkeys with at least one
    /// modifier.
    pub fn parse(text: &str) -> Result<Self, HotkeyParseError> {
        let tokens: Vec<&str> = text
            .split('+')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.len() < 2 {
            return Err(HotkeyParseError::Incomplete);
        }

        let mut modifiers = Modifiers::empty();
        for token in &tokens[..tokens.len() - 1] {
            let modifier = Modifiers::from_token(token)
                .ok_or_else(|| HotkeyParseError::UnknownModifier(token.to_string()))?;
            modifiers |= modifier;
        }

        let key_token = tokens[tokens.len() - 1];
        let key = Key::from_token(key_token)
            .ok_or_else(|| HotkeyParseError::UnknownKey(key_token.to_string()))?;

        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            return f.write_str(self.key.name());
        }

        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.contains(Modifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            parts.push("Shift");
        }
        if self.modifiers.contains(Modifiers::ALT) {
            parts.push("Alt");
        }
        if self.modifiers.contains(Modifiers::WIN) {
            parts.push("Win");
        }
        parts.push(self.key.name());
        f.write_str(&parts.join("+"))
    }
}

/// A registered hotkey: the combination, the service-assigned id, and the
/// stable display name consumers use to refer to the binding.
///
/// Equality and hashing consider only the `hotkey` value: two bindings with
/// the same combination are the same binding for deduplication purposes,
/// regardless of id or name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyBinding {
    pub id: u32,
    pub hotkey: Hotkey,
    pub name: String,
}

impl HotkeyBinding {
    pub fn new(id: u32, hotkey: Hotkey, name: impl Into<String>) -> Self {
        Self {
            id,
            hotkey,
            name: name.into(),
        }
    }
}

impl PartialEq for HotkeyBinding {
    fn eq(&self, other: &Self) -> bool {
        self.hotkey == other.hotkey
    }
}

impl Eq for HotkeyBinding {}

impl Hash for HotkeyBinding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hotkey.hash(state);
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hotkey)
    }
}
