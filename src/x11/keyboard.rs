//! Keyboard Module
//!
//! Keycode to logical key translation. The table is built from the
//! server's keyboard mapping the first time a key event needs it.

use tracing::debug;
use x11rb::protocol::xproto::Keycode;

use crate::error::Result;
use crate::keys::Key;
use crate::x11::transport::Transport;

// Keysym values from X11/keysymdef.h
const XK_SPACE: u32 = 0x0020;
const XK_EXCLAM: u32 = 0x0021;
const XK_QUOTEDBL: u32 = 0x0022;
const XK_NUMBERSIGN: u32 = 0x0023;
const XK_DOLLAR: u32 = 0x0024;
const XK_PERCENT: u32 = 0x0025;
const XK_AMPERSAND: u32 = 0x0026;
const XK_APOSTROPHE: u32 = 0x0027;
const XK_PARENLEFT: u32 = 0x0028;
const XK_PARENRIGHT: u32 = 0x0029;
const XK_ASTERISK: u32 = 0x002a;
const XK_PLUS: u32 = 0x002b;
const XK_COMMA: u32 = 0x002c;
const XK_MINUS: u32 = 0x002d;
const XK_PERIOD: u32 = 0x002e;
const XK_SLASH: u32 = 0x002f;
const XK_0: u32 = 0x0030;
const XK_9: u32 = 0x0039;
const XK_COLON: u32 = 0x003a;
const XK_SEMICOLON: u32 = 0x003b;
const XK_LESS: u32 = 0x003c;
const XK_EQUAL: u32 = 0x003d;
const XK_GREATER: u32 = 0x003e;
const XK_QUESTION: u32 = 0x003f;
const XK_AT: u32 = 0x0040;
const XK_UPPER_A: u32 = 0x0041;
const XK_UPPER_Z: u32 = 0x005a;
const XK_BRACKETLEFT: u32 = 0x005b;
const XK_BACKSLASH: u32 = 0x005c;
const XK_BRACKETRIGHT: u32 = 0x005d;
const XK_ASCIICIRCUM: u32 = 0x005e;
const XK_UNDERSCORE: u32 = 0x005f;
const XK_GRAVE: u32 = 0x0060;
const XK_LOWER_A: u32 = 0x0061;
const XK_LOWER_Z: u32 = 0x007a;
const XK_BRACELEFT: u32 = 0x007b;
const XK_BAR: u32 = 0x007c;
const XK_BRACERIGHT: u32 = 0x007d;
const XK_ASCIITILDE: u32 = 0x007e;

const XK_BACKSPACE: u32 = 0xff08;
const XK_TAB: u32 = 0xff09;
const XK_RETURN: u32 = 0xff0d;
const XK_PAUSE: u32 = 0xff13;
const XK_SCROLL_LOCK: u32 = 0xff14;
const XK_SYS_REQ: u32 = 0xff15;
const XK_ESCAPE: u32 = 0xff1b;
const XK_HOME: u32 = 0xff50;
const XK_LEFT: u32 = 0xff51;
const XK_UP: u32 = 0xff52;
const XK_RIGHT: u32 = 0xff53;
const XK_DOWN: u32 = 0xff54;
const XK_PAGE_UP: u32 = 0xff55;
const XK_PAGE_DOWN: u32 = 0xff56;
const XK_END: u32 = 0xff57;
const XK_PRINT: u32 = 0xff61;
const XK_INSERT: u32 = 0xff63;
const XK_MENU: u32 = 0xff67;
const XK_NUM_LOCK: u32 = 0xff7f;
const XK_KP_ENTER: u32 = 0xff8d;
const XK_KP_MULTIPLY: u32 = 0xffaa;
const XK_KP_ADD: u32 = 0xffab;
const XK_KP_SUBTRACT: u32 = 0xffad;
const XK_KP_DECIMAL: u32 = 0xffae;
const XK_KP_DIVIDE: u32 = 0xffaf;
const XK_KP_0: u32 = 0xffb0;
const XK_KP_9: u32 = 0xffb9;
const XK_F1: u32 = 0xffbe;
const XK_F12: u32 = 0xffc9;
const XK_SHIFT_L: u32 = 0xffe1;
const XK_SHIFT_R: u32 = 0xffe2;
const XK_CONTROL_L: u32 = 0xffe3;
const XK_CONTROL_R: u32 = 0xffe4;
const XK_CAPS_LOCK: u32 = 0xffe5;
const XK_ALT_L: u32 = 0xffe9;
const XK_ALT_R: u32 = 0xffea;
const XK_SUPER_L: u32 = 0xffeb;
const XK_SUPER_R: u32 = 0xffec;
const XK_DELETE: u32 = 0xffff;

const DIGITS: [Key; 10] = [
    Key::Digit0,
    Key::Digit1,
    Key::Digit2,
    Key::Digit3,
    Key::Digit4,
    Key::Digit5,
    Key::Digit6,
    Key::Digit7,
    Key::Digit8,
    Key::Digit9,
];

const NUMPAD: [Key; 10] = [
    Key::Numpad0,
    Key::Numpad1,
    Key::Numpad2,
    Key::Numpad3,
    Key::Numpad4,
    Key::Numpad5,
    Key::Numpad6,
    Key::Numpad7,
    Key::Numpad8,
    Key::Numpad9,
];

const LETTERS: [Key; 26] = [
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
];

const FUNCTION_KEYS: [Key; 12] = [
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
];

/// Logical key for a keysym. Upper- and lowercase letters resolve to the
/// same key.
pub fn key_for_keysym(keysym: u32) -> Key {
    match keysym {
        XK_0..=XK_9 => DIGITS[(keysym - XK_0) as usize],
        XK_UPPER_A..=XK_UPPER_Z => LETTERS[(keysym - XK_UPPER_A) as usize],
        XK_LOWER_A..=XK_LOWER_Z => LETTERS[(keysym - XK_LOWER_A) as usize],
        XK_KP_0..=XK_KP_9 => NUMPAD[(keysym - XK_KP_0) as usize],
        XK_F1..=XK_F12 => FUNCTION_KEYS[(keysym - XK_F1) as usize],

        XK_SPACE => Key::Space,
        XK_EXCLAM => Key::Exclamation,
        XK_QUOTEDBL => Key::DoubleQuotes,
        XK_NUMBERSIGN => Key::Hash,
        XK_DOLLAR => Key::Currency,
        XK_PERCENT => Key::Percent,
        XK_AMPERSAND => Key::And,
        XK_APOSTROPHE => Key::SingleQuote,
        XK_PARENLEFT => Key::LParen,
        XK_PARENRIGHT => Key::RParen,
        XK_ASTERISK => Key::Star,
        XK_PLUS => Key::Add,
        XK_COMMA => Key::Comma,
        XK_MINUS => Key::Hyphen,
        XK_PERIOD => Key::Period,
        XK_SLASH => Key::FwdSlash,
        XK_COLON => Key::Colon,
        XK_SEMICOLON => Key::Semicolon,
        XK_LESS => Key::LAngle,
        XK_EQUAL => Key::Equals,
        XK_GREATER => Key::RAngle,
        XK_QUESTION => Key::Question,
        XK_AT => Key::At,
        XK_BRACKETLEFT => Key::LBracket,
        XK_BACKSLASH => Key::BackSlash,
        XK_BRACKETRIGHT => Key::RBracket,
        XK_ASCIICIRCUM => Key::Hat,
        XK_UNDERSCORE => Key::Underscore,
        XK_GRAVE => Key::GraveAccent,
        XK_BRACELEFT => Key::LBrace,
        XK_BAR => Key::Pipe,
        XK_BRACERIGHT => Key::RBrace,
        XK_ASCIITILDE => Key::Tilde,

        XK_BACKSPACE => Key::Backspace,
        XK_TAB => Key::Tab,
        XK_RETURN => Key::Enter,
        XK_ESCAPE => Key::Escape,
        XK_DELETE => Key::Delete,
        XK_HOME => Key::Home,
        XK_END => Key::End,
        XK_PAGE_UP => Key::PageUp,
        XK_PAGE_DOWN => Key::PageDown,
        XK_INSERT => Key::Insert,
        XK_PRINT => Key::PrintScreen,
        XK_SYS_REQ => Key::SysReq,
        XK_PAUSE => Key::Pause,
        XK_MENU => Key::Apps,

        XK_LEFT => Key::Left,
        XK_UP => Key::Up,
        XK_RIGHT => Key::Right,
        XK_DOWN => Key::Down,

        XK_CAPS_LOCK => Key::CapsLock,
        XK_NUM_LOCK => Key::NumLock,
        XK_SCROLL_LOCK => Key::ScrollLock,

        XK_SHIFT_L => Key::LShift,
        XK_SHIFT_R => Key::RShift,
        XK_CONTROL_L => Key::LControl,
        XK_CONTROL_R => Key::RControl,
        XK_ALT_L => Key::LAlt,
        XK_ALT_R => Key::RAlt,
        XK_SUPER_L => Key::LWin,
        XK_SUPER_R => Key::RWin,

        XK_KP_ENTER => Key::NumpadEnter,
        XK_KP_MULTIPLY => Key::Multiply,
        XK_KP_ADD => Key::Add,
        XK_KP_SUBTRACT => Key::Subtract,
        XK_KP_DECIMAL => Key::Decimal,
        XK_KP_DIVIDE => Key::Divide,

        _ => Key::Unknown,
    }
}

/// Keycode to key table, filled on first use.
#[derive(Debug, Default)]
pub struct KeyboardMapper {
    table: Option<Vec<Key>>,
}

impl KeyboardMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.table.is_some()
    }

    /// Resolve `keycode`, fetching the server keymap first if this is the
    /// first lookup.
    pub fn resolve<T: Transport>(&mut self, transport: &T, keycode: Keycode) -> Result<Key> {
        if self.table.is_none() {
            self.table = Some(Self::build(transport)?);
        }
        Ok(self
            .table
            .as_ref()
            .and_then(|table| table.get(keycode as usize))
            .copied()
            .unwrap_or(Key::Unknown))
    }

    /// Forget the table. The next lookup fetches the keymap again.
    pub fn reset(&mut self) {
        self.table = None;
    }

    fn build<T: Transport>(transport: &T) -> Result<Vec<Key>> {
        let (min_keycode, max_keycode) = transport.keycode_range();
        let count = max_keycode.saturating_sub(min_keycode).saturating_add(1);
        let mapping = transport.keyboard_mapping(min_keycode, count)?;

        let mut table = vec![Key::Unknown; max_keycode as usize + 1];
        for keycode in min_keycode..=max_keycode {
            if let Some(keysym) = mapping.primary_keysym(keycode) {
                table[keycode as usize] = key_for_keysym(keysym);
            }
        }

        debug!(
            "Built keymap for keycodes {}..={} ({} resolved)",
            min_keycode,
            max_keycode,
            table.iter().filter(|k| **k != Key::Unknown).count()
        );
        Ok(table)
    }
}
