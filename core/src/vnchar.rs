//! Semantic Vietnamese graphemes.
//!
//! A `VnChar` is the abstract description of one output grapheme: a vowel
//! with tone and case, a consonant with case, or a plain pass-through
//! character. The codec in [`charmap`](crate::charmap) turns these into
//! concrete text per code table.

use serde::{Deserialize, Serialize};

use crate::entry::CharacterEntry;
use crate::keys;

/// The six pitch-contour tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tone {
    /// Không dấu
    #[default]
    None = 0,
    /// Sắc (á)
    Acute = 1,
    /// Huyền (à)
    Grave = 2,
    /// Hỏi (ả)
    HookAbove = 3,
    /// Ngã (ã)
    Tilde = 4,
    /// Nặng (ạ)
    DotBelow = 5,
}

impl Tone {
    /// Decode from the 3-bit value used by the packed legacy format.
    /// Out-of-range values degrade to `Tone::None`.
    pub fn from_index(value: u32) -> Self {
        match value {
            1 => Tone::Acute,
            2 => Tone::Grave,
            3 => Tone::HookAbove,
            4 => Tone::Tilde,
            5 => Tone::DotBelow,
            _ => Tone::None,
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Tone::None => "Không dấu",
            Tone::Acute => "Sắc",
            Tone::Grave => "Huyền",
            Tone::HookAbove => "Hỏi",
            Tone::Tilde => "Ngã",
            Tone::DotBelow => "Nặng",
        }
    }
}

/// The twelve vowel identities of the codec tables.
///
/// Shape marks (circumflex, breve, horn) are part of the identity; the tone
/// is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vowel {
    A,
    ACircumflex,
    ABreve,
    E,
    ECircumflex,
    I,
    O,
    OCircumflex,
    OHorn,
    U,
    UHorn,
    Y,
}

impl Vowel {
    pub const ALL: [Vowel; 12] = [
        Vowel::A,
        Vowel::ACircumflex,
        Vowel::ABreve,
        Vowel::E,
        Vowel::ECircumflex,
        Vowel::I,
        Vowel::O,
        Vowel::OCircumflex,
        Vowel::OHorn,
        Vowel::U,
        Vowel::UHorn,
        Vowel::Y,
    ];

    /// The unadorned Latin letter this vowel is built on.
    pub fn base_char(self) -> char {
        match self {
            Vowel::A | Vowel::ACircumflex | Vowel::ABreve => 'a',
            Vowel::E | Vowel::ECircumflex => 'e',
            Vowel::I => 'i',
            Vowel::O | Vowel::OCircumflex | Vowel::OHorn => 'o',
            Vowel::U | Vowel::UHorn => 'u',
            Vowel::Y => 'y',
        }
    }

    pub fn has_circumflex(self) -> bool {
        matches!(self, Vowel::ACircumflex | Vowel::ECircumflex | Vowel::OCircumflex)
    }

    pub fn has_breve(self) -> bool {
        self == Vowel::ABreve
    }

    pub fn has_horn(self) -> bool {
        matches!(self, Vowel::OHorn | Vowel::UHorn)
    }
}

/// Consonants, including the stroked đ and the compound spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consonant {
    B,
    C,
    D,
    G,
    H,
    K,
    L,
    M,
    N,
    P,
    Q,
    R,
    S,
    T,
    V,
    X,
    /// đ
    DStroke,
    Ch,
    Gh,
    Gi,
    Kh,
    Ng,
    Ngh,
    Nh,
    Ph,
    Qu,
    Th,
    Tr,
}

impl Consonant {
    /// Canonical lowercase spelling.
    pub fn spelling(self) -> &'static str {
        match self {
            Consonant::B => "b",
            Consonant::C => "c",
            Consonant::D => "d",
            Consonant::G => "g",
            Consonant::H => "h",
            Consonant::K => "k",
            Consonant::L => "l",
            Consonant::M => "m",
            Consonant::N => "n",
            Consonant::P => "p",
            Consonant::Q => "q",
            Consonant::R => "r",
            Consonant::S => "s",
            Consonant::T => "t",
            Consonant::V => "v",
            Consonant::X => "x",
            Consonant::DStroke => "đ",
            Consonant::Ch => "ch",
            Consonant::Gh => "gh",
            Consonant::Gi => "gi",
            Consonant::Kh => "kh",
            Consonant::Ng => "ng",
            Consonant::Ngh => "ngh",
            Consonant::Nh => "nh",
            Consonant::Ph => "ph",
            Consonant::Qu => "qu",
            Consonant::Th => "th",
            Consonant::Tr => "tr",
        }
    }

    pub fn is_compound(self) -> bool {
        self.spelling().chars().count() > 1
    }
}

/// One abstract output grapheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VnChar {
    Vowel {
        vowel: Vowel,
        tone: Tone,
        uppercase: bool,
    },
    Consonant {
        consonant: Consonant,
        uppercase: bool,
    },
    /// Anything the entry model does not interpret (digits, punctuation,
    /// letters outside the Vietnamese alphabet).
    Plain(char),
}

impl VnChar {
    pub fn vowel(vowel: Vowel, tone: Tone, uppercase: bool) -> Self {
        VnChar::Vowel {
            vowel,
            tone,
            uppercase,
        }
    }

    pub fn consonant(consonant: Consonant, uppercase: bool) -> Self {
        VnChar::Consonant {
            consonant,
            uppercase,
        }
    }

    /// Render this grapheme as output text for the given code table.
    pub fn render(&self, table: CodeTable) -> String {
        crate::charmap::render(self, table)
    }

    /// Interpret a composition entry as a grapheme.
    ///
    /// The entry's shape flags select the vowel identity (`has_tone` is the
    /// circumflex / doubled-letter family, `has_tone_w` the horn / breve
    /// family); `mark` carries the pitch tone. On consonant entries the same
    /// two flags select expanded compound spellings: `has_tone` for the
    /// doubled-letter expansions (cc → ch, dd → đ, ...), `has_tone_w` for the
    /// quick start/end expansions (f → ph, g → ng, ...).
    pub fn from_entry(entry: &CharacterEntry) -> Self {
        let upper = entry.caps;
        match entry.key_code {
            keys::KEY_A => {
                let vowel = if entry.has_tone {
                    Vowel::ACircumflex
                } else if entry.has_tone_w {
                    Vowel::ABreve
                } else {
                    Vowel::A
                };
                VnChar::vowel(vowel, entry.mark, upper)
            }
            keys::KEY_E => {
                let vowel = if entry.has_tone {
                    Vowel::ECircumflex
                } else {
                    Vowel::E
                };
                VnChar::vowel(vowel, entry.mark, upper)
            }
            keys::KEY_O => {
                let vowel = if entry.has_tone {
                    Vowel::OCircumflex
                } else if entry.has_tone_w {
                    Vowel::OHorn
                } else {
                    Vowel::O
                };
                VnChar::vowel(vowel, entry.mark, upper)
            }
            keys::KEY_U => {
                let vowel = if entry.has_tone_w {
                    Vowel::UHorn
                } else {
                    Vowel::U
                };
                VnChar::vowel(vowel, entry.mark, upper)
            }
            keys::KEY_I => VnChar::vowel(Vowel::I, entry.mark, upper),
            keys::KEY_Y => VnChar::vowel(Vowel::Y, entry.mark, upper),
            keys::KEY_D => {
                let consonant = if entry.has_tone {
                    Consonant::DStroke
                } else {
                    Consonant::D
                };
                VnChar::consonant(consonant, upper)
            }
            keys::KEY_B => VnChar::consonant(Consonant::B, upper),
            keys::KEY_C => {
                if entry.has_tone {
                    VnChar::consonant(Consonant::Ch, upper)
                } else {
                    VnChar::consonant(Consonant::C, upper)
                }
            }
            keys::KEY_G => {
                if entry.has_tone {
                    VnChar::consonant(Consonant::Gh, upper)
                } else if entry.has_tone_w {
                    VnChar::consonant(Consonant::Ng, upper)
                } else {
                    VnChar::consonant(Consonant::G, upper)
                }
            }
            keys::KEY_H => {
                if entry.has_tone_w {
                    VnChar::consonant(Consonant::Nh, upper)
                } else {
                    VnChar::consonant(Consonant::H, upper)
                }
            }
            keys::KEY_K => {
                if entry.has_tone {
                    VnChar::consonant(Consonant::Kh, upper)
                } else {
                    VnChar::consonant(Consonant::K, upper)
                }
            }
            keys::KEY_L => VnChar::consonant(Consonant::L, upper),
            keys::KEY_M => VnChar::consonant(Consonant::M, upper),
            keys::KEY_N => {
                if entry.has_tone {
                    VnChar::consonant(Consonant::Ng, upper)
                } else {
                    VnChar::consonant(Consonant::N, upper)
                }
            }
            keys::KEY_P => {
                if entry.has_tone {
                    VnChar::consonant(Consonant::Ph, upper)
                } else {
                    VnChar::consonant(Consonant::P, upper)
                }
            }
            keys::KEY_Q => {
                if entry.has_tone {
                    VnChar::consonant(Consonant::Qu, upper)
                } else {
                    VnChar::consonant(Consonant::Q, upper)
                }
            }
            keys::KEY_R => VnChar::consonant(Consonant::R, upper),
            keys::KEY_S => VnChar::consonant(Consonant::S, upper),
            keys::KEY_T => {
                if entry.has_tone {
                    VnChar::consonant(Consonant::Th, upper)
                } else {
                    VnChar::consonant(Consonant::T, upper)
                }
            }
            keys::KEY_V => VnChar::consonant(Consonant::V, upper),
            keys::KEY_X => VnChar::consonant(Consonant::X, upper),
            keys::KEY_F => {
                if entry.has_tone_w {
                    VnChar::consonant(Consonant::Ph, upper)
                } else {
                    VnChar::Plain(if upper { 'F' } else { 'f' })
                }
            }
            keys::KEY_J => {
                if entry.has_tone_w {
                    VnChar::consonant(Consonant::Gi, upper)
                } else {
                    VnChar::Plain(if upper { 'J' } else { 'j' })
                }
            }
            keys::KEY_W => {
                // Standalone w → ư in the Telex family.
                if entry.has_tone_w {
                    VnChar::vowel(Vowel::UHorn, entry.mark, upper)
                } else {
                    VnChar::Plain(if upper { 'W' } else { 'w' })
                }
            }
            keys::KEY_LEFT_BRACKET => {
                if entry.has_tone_w {
                    VnChar::vowel(Vowel::OHorn, entry.mark, upper)
                } else {
                    VnChar::Plain('[')
                }
            }
            keys::KEY_RIGHT_BRACKET => {
                if entry.has_tone_w {
                    VnChar::vowel(Vowel::UHorn, entry.mark, upper)
                } else {
                    VnChar::Plain(']')
                }
            }
            other => match keys::char_for_key(other, entry.caps) {
                Some(ch) => VnChar::Plain(ch),
                None => VnChar::Plain('\u{FFFD}'),
            },
        }
    }

    /// True when the entry renders as a vowel grapheme.
    pub fn is_vowel(&self) -> bool {
        matches!(self, VnChar::Vowel { .. })
    }

    pub fn is_consonant(&self) -> bool {
        matches!(self, VnChar::Consonant { .. })
    }
}

/// The five output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CodeTable {
    #[default]
    Unicode = 0,
    Tcvn3 = 1,
    VniWindows = 2,
    UnicodeCompound = 3,
    VietnameseLocaleCp1258 = 4,
}

impl CodeTable {
    pub const ALL: [CodeTable; 5] = [
        CodeTable::Unicode,
        CodeTable::Tcvn3,
        CodeTable::VniWindows,
        CodeTable::UnicodeCompound,
        CodeTable::VietnameseLocaleCp1258,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            CodeTable::Unicode => "Unicode",
            CodeTable::Tcvn3 => "TCVN3 (ABC)",
            CodeTable::VniWindows => "VNI Windows",
            CodeTable::UnicodeCompound => "Unicode Compound",
            CodeTable::VietnameseLocaleCp1258 => "Vietnamese Locale CP1258",
        }
    }

    /// Tables whose output units can span more than one scalar, so the host
    /// must delete two scalars per composed unit on backspace.
    pub fn requires_double_backspace(self) -> bool {
        matches!(self, CodeTable::VniWindows | CodeTable::UnicodeCompound)
    }
}

/// The four input conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InputMethod {
    #[default]
    Telex = 0,
    Vni = 1,
    SimpleTelex1 = 2,
    SimpleTelex2 = 3,
}

impl InputMethod {
    pub fn display_name(self) -> &'static str {
        match self {
            InputMethod::Telex => "Telex (w→ư, []→ơư)",
            InputMethod::Vni => "VNI",
            InputMethod::SimpleTelex1 => "Simple Telex 1 (w→w, []→[])",
            InputMethod::SimpleTelex2 => "Simple Telex 2 (w→ư, []→[])",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CharacterEntry;
    use crate::keys;

    #[test]
    fn test_tone_from_index_degrades() {
        assert_eq!(Tone::from_index(3), Tone::HookAbove);
        assert_eq!(Tone::from_index(6), Tone::None);
        assert_eq!(Tone::from_index(7), Tone::None);
    }

    #[test]
    fn test_entry_to_vowel() {
        let mut entry = CharacterEntry::new(keys::KEY_O, false);
        entry.has_tone_w = true;
        entry.mark = Tone::Acute;
        assert_eq!(
            VnChar::from_entry(&entry),
            VnChar::vowel(Vowel::OHorn, Tone::Acute, false)
        );
    }

    #[test]
    fn test_entry_to_stroked_d() {
        let mut entry = CharacterEntry::new(keys::KEY_D, true);
        entry.has_tone = true;
        assert_eq!(
            VnChar::from_entry(&entry),
            VnChar::consonant(Consonant::DStroke, true)
        );
    }

    #[test]
    fn test_plain_w_without_flag() {
        let entry = CharacterEntry::new(keys::KEY_W, false);
        assert_eq!(VnChar::from_entry(&entry), VnChar::Plain('w'));
    }

    #[test]
    fn test_expanded_consonant_flags() {
        let mut cc = CharacterEntry::new(keys::KEY_C, false);
        cc.has_tone = true;
        assert_eq!(VnChar::from_entry(&cc), VnChar::consonant(Consonant::Ch, false));

        let mut coda_g = CharacterEntry::new(keys::KEY_G, false);
        coda_g.has_tone_w = true;
        assert_eq!(VnChar::from_entry(&coda_g), VnChar::consonant(Consonant::Ng, false));
    }
}
