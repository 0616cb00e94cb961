// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Represents a keyboard modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Represents a key symbol, independent of the windowing system.
///
/// Only the keys the viewer can react to get their own variant; printable
/// keys arrive as `Char` and everything else collapses into `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    Char(char),

    // Navigation keys
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,

    // Other common keys
    Enter,
    Backspace,
    Tab,
    Escape,

    // Modifier keys pressed on their own
    Shift,
    Control,
    Alt,
    Super,

    #[default]
    Unknown,
}

impl KeySymbol {
    /// Returns true if the key symbol represents a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            KeySymbol::Shift | KeySymbol::Control | KeySymbol::Alt | KeySymbol::Super
        )
    }

    /// Compares two symbols, treating letters case-insensitively.
    ///
    /// Holding Shift turns `a` into `A`; bindings configured as `a` should
    /// still fire.
    pub fn matches(&self, other: &KeySymbol) -> bool {
        match (self, other) {
            (KeySymbol::Char(a), KeySymbol::Char(b)) => a.to_lowercase().eq(b.to_lowercase()),
            (a, b) => a == b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_match_regardless_of_case() {
        assert!(KeySymbol::Char('A').matches(&KeySymbol::Char('a')));
        assert!(KeySymbol::Char('l').matches(&KeySymbol::Char('L')));
        assert!(!KeySymbol::Char('a').matches(&KeySymbol::Char('l')));
    }

    #[test]
    fn non_char_symbols_match_exactly() {
        assert!(KeySymbol::Left.matches(&KeySymbol::Left));
        assert!(!KeySymbol::Left.matches(&KeySymbol::Right));
        assert!(!KeySymbol::Home.matches(&KeySymbol::Char('a')));
    }

    #[test]
    fn modifier_keys_are_reported() {
        assert!(KeySymbol::Shift.is_modifier());
        assert!(!KeySymbol::Escape.is_modifier());
    }
}
