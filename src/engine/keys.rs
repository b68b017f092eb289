//! Keyboard keys and their xterm encodings
//!
//! Different keys produce different sequences depending on:
//! - Application cursor mode (DECCKM)
//! - Application keypad mode (DECKPAM/DECKPNM)
//! - Modifier keys (Shift, Ctrl, Alt)

use serde::{Deserialize, Serialize};

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Get the modifier parameter for CSI sequences (1 + bitmask)
    /// Shift=1, Alt=2, Ctrl=4
    pub fn as_csi_param(&self) -> u8 {
        let mut param = 1;
        if self.shift {
            param += 1;
        }
        if self.alt {
            param += 2;
        }
        if self.ctrl {
            param += 4;
        }
        param
    }

    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// A key as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character
    Char(char),

    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,

    // Function keys
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

    // Editing
    Backspace,
    Tab,
    Enter,
    Escape,
}

/// Encode a key press into the bytes an xterm would send
///
/// Returns `None` for keys with no encoding (e.g. a control chord on a
/// non-letter).
pub fn encode_key(key: Key, modifiers: Modifiers, application_cursor: bool) -> Option<Vec<u8>> {
    let bytes = match key {
        Key::Char(c) => return encode_char(c, modifiers),

        // Cursor keys
        Key::Up => encode_cursor_key(b'A', modifiers, application_cursor),
        Key::Down => encode_cursor_key(b'B', modifiers, application_cursor),
        Key::Right => encode_cursor_key(b'C', modifiers, application_cursor),
        Key::Left => encode_cursor_key(b'D', modifiers, application_cursor),

        // Navigation keys
        Key::Home => encode_special_key(1, modifiers),
        Key::Insert => encode_special_key(2, modifiers),
        Key::Delete => encode_special_key(3, modifiers),
        Key::End => encode_special_key(4, modifiers),
        Key::PageUp => encode_special_key(5, modifiers),
        Key::PageDown => encode_special_key(6, modifiers),

        // Function keys
        Key::F1 => encode_function_key(b'P', modifiers),
        Key::F2 => encode_function_key(b'Q', modifiers),
        Key::F3 => encode_function_key(b'R', modifiers),
        Key::F4 => encode_function_key(b'S', modifiers),
        Key::F5 => encode_special_key(15, modifiers),
        Key::F6 => encode_special_key(17, modifiers),
        Key::F7 => encode_special_key(18, modifiers),
        Key::F8 => encode_special_key(19, modifiers),
        Key::F9 => encode_special_key(20, modifiers),
        Key::F10 => encode_special_key(21, modifiers),
        Key::F11 => encode_special_key(23, modifiers),
        Key::F12 => encode_special_key(24, modifiers),

        // Editing keys
        Key::Backspace => {
            if modifiers.ctrl {
                vec![0x08] // Ctrl+Backspace = BS
            } else if modifiers.alt {
                vec![0x1b, 0x7f] // Alt+Backspace = ESC DEL
            } else {
                vec![0x7f] // DEL
            }
        }
        Key::Tab => {
            if modifiers.shift {
                vec![0x1b, b'[', b'Z'] // Shift+Tab = CSI Z (backtab)
            } else {
                vec![0x09]
            }
        }
        Key::Enter => {
            if modifiers.alt {
                vec![0x1b, 0x0d]
            } else {
                vec![0x0d]
            }
        }
        Key::Escape => vec![0x1b],
    };
    Some(bytes)
}

/// Encode a cursor key (arrow keys)
fn encode_cursor_key(code: u8, modifiers: Modifiers, application_mode: bool) -> Vec<u8> {
    if modifiers.any() {
        // With modifiers: CSI 1 ; modifier code
        format!("\x1b[1;{}{}", modifiers.as_csi_param(), code as char).into_bytes()
    } else if application_mode {
        // Application mode: SS3 code
        vec![0x1b, b'O', code]
    } else {
        vec![0x1b, b'[', code]
    }
}

/// Encode a tilde key (Home, End, PgUp, PgDn, Insert, Delete, F5-F12)
fn encode_special_key(number: u8, modifiers: Modifiers) -> Vec<u8> {
    if modifiers.any() {
        format!("\x1b[{};{}~", number, modifiers.as_csi_param()).into_bytes()
    } else {
        format!("\x1b[{}~", number).into_bytes()
    }
}

/// Encode F1-F4, which use SS3 when unmodified
fn encode_function_key(code: u8, modifiers: Modifiers) -> Vec<u8> {
    if modifiers.any() {
        format!("\x1b[1;{}{}", modifiers.as_csi_param(), code as char).into_bytes()
    } else {
        vec![0x1b, b'O', code]
    }
}

/// Encode a character with modifiers
///
/// Ctrl is only meaningful on letters and a handful of punctuation keys;
/// other ctrl chords have no encoding.
pub fn encode_char(c: char, modifiers: Modifiers) -> Option<Vec<u8>> {
    if modifiers.ctrl {
        let ctrl_char = match c {
            'a'..='z' | 'A'..='Z' => (c.to_ascii_uppercase() as u8) - b'@',
            '@' | ' ' | '2' => 0x00,
            '[' | '3' => 0x1b,
            '\\' | '4' => 0x1c,
            ']' | '5' => 0x1d,
            '^' | '6' => 0x1e,
            '_' | '7' | '/' => 0x1f,
            '8' | '?' => 0x7f,
            _ => return None,
        };
        return Some(if modifiers.alt {
            vec![0x1b, ctrl_char]
        } else {
            vec![ctrl_char]
        });
    }

    let mut buf = [0u8; 4];
    let encoded = c.encode_utf8(&mut buf).as_bytes();
    if modifiers.alt {
        // Alt+char sends ESC prefix
        let mut bytes = Vec::with_capacity(encoded.len() + 1);
        bytes.push(0x1b);
        bytes.extend_from_slice(encoded);
        Some(bytes)
    } else {
        Some(encoded.to_vec())
    }
}

/// Bracketed paste start/end markers
pub fn bracketed_paste_markers() -> (&'static [u8], &'static [u8]) {
    (b"\x1b[200~", b"\x1b[201~")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift() -> Modifiers {
        Modifiers {
            shift: true,
            ..Modifiers::NONE
        }
    }

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        }
    }

    #[test]
    fn test_cursor_keys_normal() {
        let mods = Modifiers::default();
        assert_eq!(encode_key(Key::Up, mods, false).unwrap(), b"\x1b[A");
        assert_eq!(encode_key(Key::Down, mods, false).unwrap(), b"\x1b[B");
        assert_eq!(encode_key(Key::Right, mods, false).unwrap(), b"\x1b[C");
        assert_eq!(encode_key(Key::Left, mods, false).unwrap(), b"\x1b[D");
    }

    #[test]
    fn test_cursor_keys_application() {
        let mods = Modifiers::default();
        assert_eq!(encode_key(Key::Up, mods, true).unwrap(), b"\x1bOA");
        assert_eq!(encode_key(Key::Down, mods, true).unwrap(), b"\x1bOB");
    }

    #[test]
    fn test_cursor_keys_with_modifiers() {
        assert_eq!(encode_key(Key::Up, shift(), false).unwrap(), b"\x1b[1;2A");
        assert_eq!(encode_key(Key::Up, ctrl(), false).unwrap(), b"\x1b[1;5A");

        let both = Modifiers {
            shift: true,
            ctrl: true,
            alt: false,
        };
        assert_eq!(encode_key(Key::Up, both, false).unwrap(), b"\x1b[1;6A");
    }

    #[test]
    fn test_function_keys() {
        let mods = Modifiers::default();
        assert_eq!(encode_key(Key::F1, mods, false).unwrap(), b"\x1bOP");
        assert_eq!(encode_key(Key::F2, mods, false).unwrap(), b"\x1bOQ");
        assert_eq!(encode_key(Key::F5, mods, false).unwrap(), b"\x1b[15~");
        assert_eq!(encode_key(Key::F12, mods, false).unwrap(), b"\x1b[24~");
        assert_eq!(encode_key(Key::F5, shift(), false).unwrap(), b"\x1b[15;2~");
    }

    #[test]
    fn test_editing_keys() {
        let mods = Modifiers::default();
        assert_eq!(encode_key(Key::Backspace, mods, false).unwrap(), b"\x7f");
        assert_eq!(encode_key(Key::Tab, mods, false).unwrap(), b"\x09");
        assert_eq!(encode_key(Key::Enter, mods, false).unwrap(), b"\x0d");
        assert_eq!(encode_key(Key::Escape, mods, false).unwrap(), b"\x1b");
        assert_eq!(encode_key(Key::Tab, shift(), false).unwrap(), b"\x1b[Z");
    }

    #[test]
    fn test_encode_char() {
        let mods = Modifiers::default();
        assert_eq!(encode_char('a', mods).unwrap(), b"a");
        assert_eq!(encode_char('é', mods).unwrap(), "é".as_bytes());

        assert_eq!(encode_char('c', ctrl()).unwrap(), vec![0x03]); // Ctrl+C
        assert_eq!(encode_char('A', ctrl()).unwrap(), vec![0x01]);
        assert_eq!(encode_char('[', ctrl()).unwrap(), vec![0x1b]);
        assert_eq!(encode_char('é', ctrl()), None);

        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert_eq!(encode_char('x', alt).unwrap(), b"\x1bx");
    }
}
