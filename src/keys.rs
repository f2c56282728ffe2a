//! Logical keys
//!
//! Backend-independent key identifiers and their display strings. A letter
//! key is one constant for both cases; `Key::as_str(capitalize)` picks the
//! case when formatting.

use strum::{EnumCount, EnumIter, IntoStaticStr};

#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Key {
    #[default]
    Unknown,

    #[strum(serialize = "1")]
    Digit1,
    #[strum(serialize = "2")]
    Digit2,
    #[strum(serialize = "3")]
    Digit3,
    #[strum(serialize = "4")]
    Digit4,
    #[strum(serialize = "5")]
    Digit5,
    #[strum(serialize = "6")]
    Digit6,
    #[strum(serialize = "7")]
    Digit7,
    #[strum(serialize = "8")]
    Digit8,
    #[strum(serialize = "9")]
    Digit9,
    #[strum(serialize = "0")]
    Digit0,

    // Letters must stay contiguous, A through Z.
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

    Escape,
    Backspace,
    #[strum(serialize = "TABSPACE")]
    Tab,
    Enter,
    Decimal,

    #[strum(serialize = "LCONTROL")]
    LControl,
    #[strum(serialize = "RCONTROL")]
    RControl,
    #[strum(serialize = "LSHIFT")]
    LShift,
    #[strum(serialize = "RSHIFT")]
    RShift,
    #[strum(serialize = "LALT")]
    LAlt,
    #[strum(serialize = "RALT")]
    RAlt,
    #[strum(serialize = "LWIN")]
    LWin,
    #[strum(serialize = "RWIN")]
    RWin,
    Apps,

    #[strum(serialize = "=")]
    Equals,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,

    #[strum(serialize = "~")]
    Tilde,
    #[strum(serialize = "`")]
    GraveAccent,
    #[strum(serialize = "!")]
    Exclamation,
    #[strum(serialize = "@")]
    At,
    #[strum(serialize = "#")]
    Hash,
    #[strum(serialize = "$")]
    Currency,
    #[strum(serialize = "%")]
    Percent,
    #[strum(serialize = "^")]
    Hat,
    #[strum(serialize = "&")]
    And,
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "(")]
    LParen,
    #[strum(serialize = ")")]
    RParen,
    #[strum(serialize = "-")]
    Hyphen,
    #[strum(serialize = "_")]
    Underscore,
    #[strum(serialize = ";")]
    Semicolon,
    #[strum(serialize = ":")]
    Colon,
    #[strum(serialize = "'")]
    SingleQuote,
    #[strum(serialize = "\"")]
    DoubleQuotes,
    #[strum(serialize = "\\")]
    BackSlash,
    #[strum(serialize = "/")]
    FwdSlash,
    #[strum(serialize = "|")]
    Pipe,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ".")]
    Period,
    #[strum(serialize = " ")]
    Space,
    #[strum(serialize = "[")]
    LBracket,
    #[strum(serialize = "]")]
    RBracket,
    #[strum(serialize = "{")]
    LBrace,
    #[strum(serialize = "}")]
    RBrace,
    #[strum(serialize = "<")]
    LAngle,
    #[strum(serialize = ">")]
    RAngle,
    #[strum(serialize = "?")]
    Question,

    Up,
    Down,
    Left,
    Right,

    CapsLock,
    NumLock,
    ScrollLock,
    #[strum(serialize = "PRINTSCREEN")]
    PrintScreen,
    #[strum(serialize = "SYSREQ")]
    SysReq,
    Pause,
    Insert,
    #[strum(serialize = "DEL")]
    Delete,
    Home,
    End,
    #[strum(serialize = "PGUP")]
    PageUp,
    #[strum(serialize = "PGDN")]
    PageDown,

    #[strum(serialize = "NUM0")]
    Numpad0,
    #[strum(serialize = "NUM1")]
    Numpad1,
    #[strum(serialize = "NUM2")]
    Numpad2,
    #[strum(serialize = "NUM3")]
    Numpad3,
    #[strum(serialize = "NUM4")]
    Numpad4,
    #[strum(serialize = "NUM5")]
    Numpad5,
    #[strum(serialize = "NUM6")]
    Numpad6,
    #[strum(serialize = "NUM7")]
    Numpad7,
    #[strum(serialize = "NUM8")]
    Numpad8,
    #[strum(serialize = "NUM9")]
    Numpad9,
    NumpadEnter,
}

const LOWERCASE_LETTERS: [&str; 26] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z",
];

impl Key {
    pub fn is_letter(self) -> bool {
        (Key::A as u8..=Key::Z as u8).contains(&(self as u8))
    }

    /// Display string. `capitalize` only matters for letters.
    pub fn as_str(self, capitalize: bool) -> &'static str {
        if self.is_letter() && !capitalize {
            return LOWERCASE_LETTERS[(self as u8 - Key::A as u8) as usize];
        }
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn letters_format_in_both_cases() {
        assert_eq!(Key::A.as_str(false), "a");
        assert_eq!(Key::A.as_str(true), "A");
        assert_eq!(Key::Z.as_str(false), "z");
        assert_eq!(Key::Q.as_str(true), "Q");
    }

    #[test]
    fn capitalize_is_ignored_for_non_letters() {
        assert_eq!(Key::Tab.as_str(true), "TABSPACE");
        assert_eq!(Key::Tab.as_str(false), "TABSPACE");
        assert_eq!(Key::Digit7.as_str(true), "7");
        assert_eq!(Key::Unknown.as_str(false), "UNKNOWN");
        assert_eq!(Key::NumpadEnter.as_str(false), "NUMPAD_ENTER");
        assert_eq!(Key::CapsLock.as_str(false), "CAPS_LOCK");
    }

    #[test]
    fn exactly_twenty_six_letters() {
        let letters = Key::iter().filter(|k| k.is_letter()).count();
        assert_eq!(letters, 26);
        assert!(!Key::F1.is_letter());
        assert!(!Key::Digit0.is_letter());
    }

    #[test]
    fn every_key_has_a_display_string() {
        for key in Key::iter() {
            assert!(!key.as_str(false).is_empty(), "{key:?}");
            assert!(!key.as_str(true).is_empty(), "{key:?}");
        }
        assert!(Key::COUNT > 90);
    }
}
