//! Per-convention key classification.
//!
//! Decides which keys carry tones and which request shape changes under
//! each input method. The Telex family spells tones with letters (s f r x j,
//! z to clear); VNI spells them with digits (1-5, 0 to clear). Shape
//! requests are doubled letters and w for Telex, digits 6-9 for VNI.

use libviet_core::keys::*;
use libviet_core::{InputMethod, Tone};

/// Tone index per Telex tone letter.
static TELEX_TONES: phf::Map<u16, u8> = phf::phf_map! {
    0x01u16 => 1, // s → sắc
    0x03u16 => 2, // f → huyền
    0x0Fu16 => 3, // r → hỏi
    0x07u16 => 4, // x → ngã
    0x26u16 => 5, // j → nặng
    0x06u16 => 0, // z clears
};

/// Tone index per VNI digit.
static VNI_TONES: phf::Map<u16, u8> = phf::phf_map! {
    0x12u16 => 1, // 1 → sắc
    0x13u16 => 2, // 2 → huyền
    0x14u16 => 3, // 3 → hỏi
    0x15u16 => 4, // 4 → ngã
    0x17u16 => 5, // 5 → nặng
    0x1Du16 => 0, // 0 clears
};

/// The tone a key spells under the given method, if any. `Tone::None` means
/// the key clears an existing mark.
pub fn tone_for_key(method: InputMethod, key_code: u16) -> Option<Tone> {
    let map = match method {
        InputMethod::Vni => &VNI_TONES,
        InputMethod::Telex | InputMethod::SimpleTelex1 | InputMethod::SimpleTelex2 => &TELEX_TONES,
    };
    map.get(&key_code).map(|&idx| Tone::from_index(u32::from(idx)))
}

/// A shape change requested by a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRequest {
    /// Telex doubled letter: the key repeats an earlier a/e/o for the
    /// circumflex family, or d for đ. Carries the repeated key code.
    Doubled(u16),
    /// Telex w: horn on o/u, breve on a, ươ on a uo pair.
    HornBreve,
    /// VNI digit 6: circumflex on a/e/o.
    Circumflex,
    /// VNI digit 7: horn on o/u.
    Horn,
    /// VNI digit 8: breve on a.
    Breve,
    /// VNI digit 9: đ.
    DStroke,
}

/// The shape request a key spells under the given method.
///
/// For the Telex family the doubled-letter request is contextual: the
/// caller still has to find an earlier entry with the same letter. VNI
/// shapes are unconditional digits.
pub fn shape_for_key(method: InputMethod, key_code: u16) -> Option<ShapeRequest> {
    match method {
        InputMethod::Telex | InputMethod::SimpleTelex2 => match key_code {
            KEY_A | KEY_E | KEY_O | KEY_D => Some(ShapeRequest::Doubled(key_code)),
            KEY_W => Some(ShapeRequest::HornBreve),
            _ => None,
        },
        InputMethod::SimpleTelex1 => match key_code {
            // w stays a literal letter in Simple Telex 1
            KEY_A | KEY_E | KEY_O | KEY_D => Some(ShapeRequest::Doubled(key_code)),
            _ => None,
        },
        InputMethod::Vni => match key_code {
            KEY_6 => Some(ShapeRequest::Circumflex),
            KEY_7 => Some(ShapeRequest::Horn),
            KEY_8 => Some(ShapeRequest::Breve),
            KEY_9 => Some(ShapeRequest::DStroke),
            _ => None,
        },
    }
}

/// Standalone w produces ư under Telex and Simple Telex 2.
pub fn standalone_w_is_vowel(method: InputMethod) -> bool {
    matches!(method, InputMethod::Telex | InputMethod::SimpleTelex2)
}

/// The [ and ] shortcuts for ơ and ư are full-Telex only.
pub fn brackets_are_vowels(method: InputMethod) -> bool {
    method == InputMethod::Telex
}

/// Quick-telex doubled-consonant expansions: the second press of one of
/// these consonants expands it to the compound spelling.
pub fn quick_telex_doubles(key_code: u16) -> bool {
    matches!(
        key_code,
        KEY_C | KEY_G | KEY_K | KEY_N | KEY_P | KEY_Q | KEY_T
    )
}

/// Quick start-consonant expansions at the beginning of a word.
pub fn quick_start_expansion(key_code: u16) -> bool {
    matches!(key_code, KEY_F | KEY_J)
}

/// Quick end-consonant expansions after the vowel nucleus.
pub fn quick_end_expansion(key_code: u16) -> bool {
    matches!(key_code, KEY_G | KEY_H)
}

/// Word-boundary characters: whitespace and sentence punctuation arrive as
/// discrete break events, never as buffer content.
pub fn is_word_break_char(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '.' | ',' | ';' | ':' | '!' | '?' | '"' | '(' | ')' | '<' | '>' | '/' | '\\'
        )
}

/// Sentence-ending characters, used by the uppercase-first-letter fix.
pub fn ends_sentence(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '\n')
}
