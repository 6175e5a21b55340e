//! Character and tone codec.
//!
//! Pure mapping from abstract graphemes to output text, per code table:
//!
//! - **Unicode** renders a single precomposed scalar from a full
//!   12 vowels × 6 tones × 2 cases table.
//! - **Unicode Compound** fully decomposes: base Latin letter, then an
//!   optional shape mark (circumflex / breve / horn), then an optional tone
//!   mark.
//! - **CP1258** partially decomposes the way the Windows Vietnamese locale
//!   does: a precomposed shape-carrying base (â, ă, ơ, ...) followed by a
//!   combining tone mark only.
//! - **TCVN3** and **VNI Windows** fall back to the Unicode table. The full
//!   8-bit legacy tables are intentionally not implemented; do not "complete"
//!   them here without updating the tables' callers.
//!
//! Đ/đ has no combining form and maps to itself in every table.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;

use crate::vnchar::{CodeTable, Consonant, Tone, VnChar, Vowel};

// Combining diacritical marks
pub const COMBINING_ACUTE: char = '\u{0301}';
pub const COMBINING_GRAVE: char = '\u{0300}';
pub const COMBINING_HOOK_ABOVE: char = '\u{0309}';
pub const COMBINING_TILDE: char = '\u{0303}';
pub const COMBINING_DOT_BELOW: char = '\u{0323}';
pub const COMBINING_CIRCUMFLEX: char = '\u{0302}';
pub const COMBINING_BREVE: char = '\u{0306}';
pub const COMBINING_HORN: char = '\u{031B}';

/// Precomposed scalar for a (vowel, tone, case) triple.
///
/// This is the Unicode table: every cell is a distinct assigned scalar, so
/// the match is total. An unreachable combination cannot be expressed.
pub fn precomposed(vowel: Vowel, tone: Tone, uppercase: bool) -> char {
    let (lower, upper) = match (vowel, tone) {
        (Vowel::A, Tone::None) => ('a', 'A'),
        (Vowel::A, Tone::Acute) => ('á', 'Á'),
        (Vowel::A, Tone::Grave) => ('à', 'À'),
        (Vowel::A, Tone::HookAbove) => ('ả', 'Ả'),
        (Vowel::A, Tone::Tilde) => ('ã', 'Ã'),
        (Vowel::A, Tone::DotBelow) => ('ạ', 'Ạ'),

        (Vowel::ACircumflex, Tone::None) => ('â', 'Â'),
        (Vowel::ACircumflex, Tone::Acute) => ('ấ', 'Ấ'),
        (Vowel::ACircumflex, Tone::Grave) => ('ầ', 'Ầ'),
        (Vowel::ACircumflex, Tone::HookAbove) => ('ẩ', 'Ẩ'),
        (Vowel::ACircumflex, Tone::Tilde) => ('ẫ', 'Ẫ'),
        (Vowel::ACircumflex, Tone::DotBelow) => ('ậ', 'Ậ'),

        (Vowel::ABreve, Tone::None) => ('ă', 'Ă'),
        (Vowel::ABreve, Tone::Acute) => ('ắ', 'Ắ'),
        (Vowel::ABreve, Tone::Grave) => ('ằ', 'Ằ'),
        (Vowel::ABreve, Tone::HookAbove) => ('ẳ', 'Ẳ'),
        (Vowel::ABreve, Tone::Tilde) => ('ẵ', 'Ẵ'),
        (Vowel::ABreve, Tone::DotBelow) => ('ặ', 'Ặ'),

        (Vowel::E, Tone::None) => ('e', 'E'),
        (Vowel::E, Tone::Acute) => ('é', 'É'),
        (Vowel::E, Tone::Grave) => ('è', 'È'),
        (Vowel::E, Tone::HookAbove) => ('ẻ', 'Ẻ'),
        (Vowel::E, Tone::Tilde) => ('ẽ', 'Ẽ'),
        (Vowel::E, Tone::DotBelow) => ('ẹ', 'Ẹ'),

        (Vowel::ECircumflex, Tone::None) => ('ê', 'Ê'),
        (Vowel::ECircumflex, Tone::Acute) => ('ế', 'Ế'),
        (Vowel::ECircumflex, Tone::Grave) => ('ề', 'Ề'),
        (Vowel::ECircumflex, Tone::HookAbove) => ('ể', 'Ể'),
        (Vowel::ECircumflex, Tone::Tilde) => ('ễ', 'Ễ'),
        (Vowel::ECircumflex, Tone::DotBelow) => ('ệ', 'Ệ'),

        (Vowel::I, Tone::None) => ('i', 'I'),
        (Vowel::I, Tone::Acute) => ('í', 'Í'),
        (Vowel::I, Tone::Grave) => ('ì', 'Ì'),
        (Vowel::I, Tone::HookAbove) => ('ỉ', 'Ỉ'),
        (Vowel::I, Tone::Tilde) => ('ĩ', 'Ĩ'),
        (Vowel::I, Tone::DotBelow) => ('ị', 'Ị'),

        (Vowel::O, Tone::None) => ('o', 'O'),
        (Vowel::O, Tone::Acute) => ('ó', 'Ó'),
        (Vowel::O, Tone::Grave) => ('ò', 'Ò'),
        (Vowel::O, Tone::HookAbove) => ('ỏ', 'Ỏ'),
        (Vowel::O, Tone::Tilde) => ('õ', 'Õ'),
        (Vowel::O, Tone::DotBelow) => ('ọ', 'Ọ'),

        (Vowel::OCircumflex, Tone::None) => ('ô', 'Ô'),
        (Vowel::OCircumflex, Tone::Acute) => ('ố', 'Ố'),
        (Vowel::OCircumflex, Tone::Grave) => ('ồ', 'Ồ'),
        (Vowel::OCircumflex, Tone::HookAbove) => ('ổ', 'Ổ'),
        (Vowel::OCircumflex, Tone::Tilde) => ('ỗ', 'Ỗ'),
        (Vowel::OCircumflex, Tone::DotBelow) => ('ộ', 'Ộ'),

        (Vowel::OHorn, Tone::None) => ('ơ', 'Ơ'),
        (Vowel::OHorn, Tone::Acute) => ('ớ', 'Ớ'),
        (Vowel::OHorn, Tone::Grave) => ('ờ', 'Ờ'),
        (Vowel::OHorn, Tone::HookAbove) => ('ở', 'Ở'),
        (Vowel::OHorn, Tone::Tilde) => ('ỡ', 'Ỡ'),
        (Vowel::OHorn, Tone::DotBelow) => ('ợ', 'Ợ'),

        (Vowel::U, Tone::None) => ('u', 'U'),
        (Vowel::U, Tone::Acute) => ('ú', 'Ú'),
        (Vowel::U, Tone::Grave) => ('ù', 'Ù'),
        (Vowel::U, Tone::HookAbove) => ('ủ', 'Ủ'),
        (Vowel::U, Tone::Tilde) => ('ũ', 'Ũ'),
        (Vowel::U, Tone::DotBelow) => ('ụ', 'Ụ'),

        (Vowel::UHorn, Tone::None) => ('ư', 'Ư'),
        (Vowel::UHorn, Tone::Acute) => ('ứ', 'Ứ'),
        (Vowel::UHorn, Tone::Grave) => ('ừ', 'Ừ'),
        (Vowel::UHorn, Tone::HookAbove) => ('ử', 'Ử'),
        (Vowel::UHorn, Tone::Tilde) => ('ữ', 'Ữ'),
        (Vowel::UHorn, Tone::DotBelow) => ('ự', 'Ự'),

        (Vowel::Y, Tone::None) => ('y', 'Y'),
        (Vowel::Y, Tone::Acute) => ('ý', 'Ý'),
        (Vowel::Y, Tone::Grave) => ('ỳ', 'Ỳ'),
        (Vowel::Y, Tone::HookAbove) => ('ỷ', 'Ỷ'),
        (Vowel::Y, Tone::Tilde) => ('ỹ', 'Ỹ'),
        (Vowel::Y, Tone::DotBelow) => ('ỵ', 'Ỵ'),
    };
    if uppercase {
        upper
    } else {
        lower
    }
}

/// Combining mark for a tone, `None` for the level tone.
pub fn combining_tone(tone: Tone) -> Option<char> {
    match tone {
        Tone::None => None,
        Tone::Acute => Some(COMBINING_ACUTE),
        Tone::Grave => Some(COMBINING_GRAVE),
        Tone::HookAbove => Some(COMBINING_HOOK_ABOVE),
        Tone::Tilde => Some(COMBINING_TILDE),
        Tone::DotBelow => Some(COMBINING_DOT_BELOW),
    }
}

/// Combining mark for a vowel's shape, `None` for plain vowels.
pub fn combining_shape(vowel: Vowel) -> Option<char> {
    if vowel.has_circumflex() {
        Some(COMBINING_CIRCUMFLEX)
    } else if vowel.has_breve() {
        Some(COMBINING_BREVE)
    } else if vowel.has_horn() {
        Some(COMBINING_HORN)
    } else {
        None
    }
}

/// Full decomposition: base letter + shape mark + tone mark, in that order.
fn compound(vowel: Vowel, tone: Tone, uppercase: bool) -> String {
    let base = vowel.base_char();
    let mut out = String::with_capacity(4);
    out.push(if uppercase {
        base.to_ascii_uppercase()
    } else {
        base
    });
    if let Some(mark) = combining_shape(vowel) {
        out.push(mark);
    }
    if let Some(mark) = combining_tone(tone) {
        out.push(mark);
    }
    out
}

/// Partial decomposition: shape-carrying precomposed base + tone mark.
fn cp1258(vowel: Vowel, tone: Tone, uppercase: bool) -> String {
    let mut out = String::with_capacity(4);
    out.push(precomposed(vowel, Tone::None, uppercase));
    if let Some(mark) = combining_tone(tone) {
        out.push(mark);
    }
    out
}

/// Render a vowel grapheme for the given code table.
pub fn render_vowel(vowel: Vowel, tone: Tone, uppercase: bool, table: CodeTable) -> String {
    match table {
        CodeTable::Unicode => precomposed(vowel, tone, uppercase).to_string(),
        CodeTable::UnicodeCompound => compound(vowel, tone, uppercase),
        CodeTable::VietnameseLocaleCp1258 => cp1258(vowel, tone, uppercase),
        // Legacy 8-bit tables fall back to Unicode output.
        CodeTable::Tcvn3 | CodeTable::VniWindows => precomposed(vowel, tone, uppercase).to_string(),
    }
}

/// Render a consonant. Uppercase capitalizes only the first letter of a
/// compound spelling ("tr" → "Tr", never "TR").
pub fn render_consonant(consonant: Consonant, uppercase: bool) -> String {
    let spelling = consonant.spelling();
    if !uppercase {
        return spelling.to_string();
    }
    let mut chars = spelling.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Decompositions of every precomposed Vietnamese letter, keyed by scalar.
/// Built once from the canonical tables above; values are (full, cp1258).
static DECOMPOSED: Lazy<HashMap<char, (String, String)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for vowel in Vowel::ALL {
        for tone in [
            Tone::None,
            Tone::Acute,
            Tone::Grave,
            Tone::HookAbove,
            Tone::Tilde,
            Tone::DotBelow,
        ] {
            for uppercase in [false, true] {
                let key = precomposed(vowel, tone, uppercase);
                if key.is_ascii() {
                    continue;
                }
                map.insert(
                    key,
                    (compound(vowel, tone, uppercase), cp1258(vowel, tone, uppercase)),
                );
            }
        }
    }
    // No combining form exists for the stroked d.
    map.insert('đ', ("đ".to_string(), "đ".to_string()));
    map.insert('Đ', ("Đ".to_string(), "Đ".to_string()));
    map
});

/// Convert precomposed Vietnamese letters inside a pass-through string into
/// combining sequences for the decomposing tables. Input is NFC-normalized
/// first so hosts that deliver decomposed text still hit the lookup.
pub fn decompose_passthrough(input: &str, table: CodeTable) -> String {
    let normalized: String = input.nfc().collect();
    let mut out = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        match DECOMPOSED.get(&ch) {
            Some((full, partial)) => match table {
                CodeTable::UnicodeCompound => out.push_str(full),
                CodeTable::VietnameseLocaleCp1258 => out.push_str(partial),
                _ => out.push(ch),
            },
            None => out.push(ch),
        }
    }
    out
}

/// Render any grapheme for the given code table.
pub fn render(ch: &VnChar, table: CodeTable) -> String {
    match *ch {
        VnChar::Vowel {
            vowel,
            tone,
            uppercase,
        } => render_vowel(vowel, tone, uppercase, table),
        VnChar::Consonant {
            consonant,
            uppercase,
        } => render_consonant(consonant, uppercase),
        VnChar::Plain(plain) => {
            if matches!(
                table,
                CodeTable::UnicodeCompound | CodeTable::VietnameseLocaleCp1258
            ) {
                decompose_passthrough(&plain.to_string(), table)
            } else {
                plain.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precomposed_scalars() {
        assert_eq!(precomposed(Vowel::OHorn, Tone::Acute, false), 'ớ');
        assert_eq!(precomposed(Vowel::UHorn, Tone::Grave, true), 'Ừ');
        assert_eq!(precomposed(Vowel::ABreve, Tone::Tilde, false), 'ẵ');
        assert_eq!(precomposed(Vowel::I, Tone::Tilde, false), 'ĩ');
    }

    #[test]
    fn test_o_horn_acute_three_ways() {
        // Unicode: one precomposed scalar.
        assert_eq!(
            render_vowel(Vowel::OHorn, Tone::Acute, false, CodeTable::Unicode),
            "ớ"
        );
        // Compound: o + horn + acute, three scalars.
        let full = render_vowel(Vowel::OHorn, Tone::Acute, false, CodeTable::UnicodeCompound);
        assert_eq!(full.chars().count(), 3);
        assert_eq!(full, format!("o{}{}", COMBINING_HORN, COMBINING_ACUTE));
        // CP1258: ơ + acute, two scalars.
        let partial = render_vowel(
            Vowel::OHorn,
            Tone::Acute,
            false,
            CodeTable::VietnameseLocaleCp1258,
        );
        assert_eq!(partial.chars().count(), 2);
        assert_eq!(partial, format!("ơ{}", COMBINING_ACUTE));
    }

    #[test]
    fn test_legacy_tables_fall_back_to_unicode() {
        for table in [CodeTable::Tcvn3, CodeTable::VniWindows] {
            assert_eq!(render_vowel(Vowel::ECircumflex, Tone::DotBelow, false, table), "ệ");
        }
    }

    #[test]
    fn test_compound_consonant_capitalization() {
        assert_eq!(render_consonant(Consonant::Tr, true), "Tr");
        assert_eq!(render_consonant(Consonant::Ngh, true), "Ngh");
        assert_eq!(render_consonant(Consonant::Tr, false), "tr");
    }

    #[test]
    fn test_compound_matches_nfd() {
        use unicode_normalization::UnicodeNormalization;
        for vowel in Vowel::ALL {
            for tone in [Tone::Acute, Tone::Grave, Tone::HookAbove, Tone::Tilde, Tone::DotBelow] {
                let composed = precomposed(vowel, tone, false).to_string();
                let nfd: String = composed.nfd().collect();
                assert_eq!(
                    compound(vowel, tone, false),
                    nfd,
                    "full decomposition diverges from NFD for {:?} {:?}",
                    vowel,
                    tone
                );
            }
        }
    }

    #[test]
    fn test_passthrough_decomposition() {
        assert_eq!(
            decompose_passthrough("ấ", CodeTable::UnicodeCompound),
            format!("a{}{}", COMBINING_CIRCUMFLEX, COMBINING_ACUTE)
        );
        assert_eq!(
            decompose_passthrough("ấ", CodeTable::VietnameseLocaleCp1258),
            format!("â{}", COMBINING_ACUTE)
        );
        // Plain ASCII and unknown characters pass through unchanged.
        assert_eq!(decompose_passthrough("xin chao!", CodeTable::UnicodeCompound), "xin chao!");
    }

    #[test]
    fn test_stroked_d_never_decomposes() {
        for table in CodeTable::ALL {
            assert_eq!(render(&VnChar::Plain('đ'), table), "đ");
            assert_eq!(render(&VnChar::Plain('Đ'), table), "Đ");
        }
    }

    #[test]
    fn test_decomposed_input_is_normalized_first() {
        // "a" + combining acute arrives decomposed; NFC folds it to á before
        // the lookup, so CP1258 still emits the partial form.
        let decomposed_input = format!("a{}", COMBINING_ACUTE);
        assert_eq!(
            decompose_passthrough(&decomposed_input, CodeTable::VietnameseLocaleCp1258),
            format!("a{}", COMBINING_ACUTE)
        );
    }
}
