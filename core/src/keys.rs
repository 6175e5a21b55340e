//! Fixed keyboard layout enumeration.
//!
//! Key codes follow the macOS virtual key numbering that the host delivers
//! with each key event. The buffer and codec never interpret characters
//! directly; everything downstream of the host works in terms of these codes.

// Letters
pub const KEY_A: u16 = 0x00;
pub const KEY_S: u16 = 0x01;
pub const KEY_D: u16 = 0x02;
pub const KEY_F: u16 = 0x03;
pub const KEY_H: u16 = 0x04;
pub const KEY_G: u16 = 0x05;
pub const KEY_Z: u16 = 0x06;
pub const KEY_X: u16 = 0x07;
pub const KEY_C: u16 = 0x08;
pub const KEY_V: u16 = 0x09;
pub const KEY_B: u16 = 0x0B;
pub const KEY_Q: u16 = 0x0C;
pub const KEY_W: u16 = 0x0D;
pub const KEY_E: u16 = 0x0E;
pub const KEY_R: u16 = 0x0F;
pub const KEY_Y: u16 = 0x10;
pub const KEY_T: u16 = 0x11;
pub const KEY_O: u16 = 0x1F;
pub const KEY_U: u16 = 0x20;
pub const KEY_I: u16 = 0x22;
pub const KEY_P: u16 = 0x23;
pub const KEY_L: u16 = 0x25;
pub const KEY_J: u16 = 0x26;
pub const KEY_K: u16 = 0x28;
pub const KEY_N: u16 = 0x2D;
pub const KEY_M: u16 = 0x2E;

// Digits
pub const KEY_1: u16 = 0x12;
pub const KEY_2: u16 = 0x13;
pub const KEY_3: u16 = 0x14;
pub const KEY_4: u16 = 0x15;
pub const KEY_6: u16 = 0x16;
pub const KEY_5: u16 = 0x17;
pub const KEY_9: u16 = 0x19;
pub const KEY_7: u16 = 0x1A;
pub const KEY_8: u16 = 0x1C;
pub const KEY_0: u16 = 0x1D;

// Control keys
pub const KEY_RETURN: u16 = 0x24;
pub const KEY_TAB: u16 = 0x30;
pub const KEY_SPACE: u16 = 0x31;
pub const KEY_DELETE: u16 = 0x33;
pub const KEY_ESCAPE: u16 = 0x35;

// Punctuation
pub const KEY_EQUALS: u16 = 0x18;
pub const KEY_MINUS: u16 = 0x1B;
pub const KEY_RIGHT_BRACKET: u16 = 0x1E;
pub const KEY_LEFT_BRACKET: u16 = 0x21;
pub const KEY_QUOTE: u16 = 0x27;
pub const KEY_SEMICOLON: u16 = 0x29;
pub const KEY_BACKSLASH: u16 = 0x2A;
pub const KEY_COMMA: u16 = 0x2B;
pub const KEY_SLASH: u16 = 0x2C;
pub const KEY_PERIOD: u16 = 0x2F;
pub const KEY_GRAVE: u16 = 0x32;

/// Map a key code to the character it produces on the base layout.
///
/// Letters honor the caps flag; digits and punctuation ignore it (the host
/// reports shifted punctuation as distinct characters, which the engine
/// treats as word boundaries before they reach the buffer).
pub fn char_for_key(key_code: u16, caps: bool) -> Option<char> {
    let ch = match key_code {
        KEY_A => 'a',
        KEY_B => 'b',
        KEY_C => 'c',
        KEY_D => 'd',
        KEY_E => 'e',
        KEY_F => 'f',
        KEY_G => 'g',
        KEY_H => 'h',
        KEY_I => 'i',
        KEY_J => 'j',
        KEY_K => 'k',
        KEY_L => 'l',
        KEY_M => 'm',
        KEY_N => 'n',
        KEY_O => 'o',
        KEY_P => 'p',
        KEY_Q => 'q',
        KEY_R => 'r',
        KEY_S => 's',
        KEY_T => 't',
        KEY_U => 'u',
        KEY_V => 'v',
        KEY_W => 'w',
        KEY_X => 'x',
        KEY_Y => 'y',
        KEY_Z => 'z',
        KEY_0 => '0',
        KEY_1 => '1',
        KEY_2 => '2',
        KEY_3 => '3',
        KEY_4 => '4',
        KEY_5 => '5',
        KEY_6 => '6',
        KEY_7 => '7',
        KEY_8 => '8',
        KEY_9 => '9',
        KEY_SPACE => ' ',
        KEY_MINUS => '-',
        KEY_EQUALS => '=',
        KEY_LEFT_BRACKET => '[',
        KEY_RIGHT_BRACKET => ']',
        KEY_BACKSLASH => '\\',
        KEY_SEMICOLON => ';',
        KEY_QUOTE => '\'',
        KEY_COMMA => ',',
        KEY_PERIOD => '.',
        KEY_SLASH => '/',
        KEY_GRAVE => '`',
        _ => return None,
    };
    if caps && ch.is_ascii_lowercase() {
        Some(ch.to_ascii_uppercase())
    } else {
        Some(ch)
    }
}

/// Map a character back to its key code and caps flag.
pub fn key_for_char(ch: char) -> Option<(u16, bool)> {
    let caps = ch.is_ascii_uppercase();
    let key = match ch.to_ascii_lowercase() {
        'a' => KEY_A,
        'b' => KEY_B,
        'c' => KEY_C,
        'd' => KEY_D,
        'e' => KEY_E,
        'f' => KEY_F,
        'g' => KEY_G,
        'h' => KEY_H,
        'i' => KEY_I,
        'j' => KEY_J,
        'k' => KEY_K,
        'l' => KEY_L,
        'm' => KEY_M,
        'n' => KEY_N,
        'o' => KEY_O,
        'p' => KEY_P,
        'q' => KEY_Q,
        'r' => KEY_R,
        's' => KEY_S,
        't' => KEY_T,
        'u' => KEY_U,
        'v' => KEY_V,
        'w' => KEY_W,
        'x' => KEY_X,
        'y' => KEY_Y,
        'z' => KEY_Z,
        '0' => KEY_0,
        '1' => KEY_1,
        '2' => KEY_2,
        '3' => KEY_3,
        '4' => KEY_4,
        '5' => KEY_5,
        '6' => KEY_6,
        '7' => KEY_7,
        '8' => KEY_8,
        '9' => KEY_9,
        ' ' => KEY_SPACE,
        '-' => KEY_MINUS,
        '=' => KEY_EQUALS,
        '[' => KEY_LEFT_BRACKET,
        ']' => KEY_RIGHT_BRACKET,
        '\\' => KEY_BACKSLASH,
        ';' => KEY_SEMICOLON,
        '\'' => KEY_QUOTE,
        ',' => KEY_COMMA,
        '.' => KEY_PERIOD,
        '/' => KEY_SLASH,
        '`' => KEY_GRAVE,
        _ => return None,
    };
    Some((key, caps))
}

/// True for the keys whose base character is one of the six plain vowels.
pub fn is_vowel_key(key_code: u16) -> bool {
    matches!(key_code, KEY_A | KEY_E | KEY_I | KEY_O | KEY_U | KEY_Y)
}
