//! Tone placement over the composition buffer.
//!
//! Given the buffered entries of an in-progress word, decide which vowel
//! entry a pitch tone should land on. The rules:
//!
//! - a shape-marked vowel wins (ư in "mưa", ơ in "nước");
//! - one vowel: itself;
//! - two vowels: falling pairs keep the tone on the first ("mái", "nói"),
//!   pairs with a coda consonant take it on the second ("hoán"), and the
//!   oa/oe/uy pairs follow the style toggle ("hòa" vs "hoà");
//! - three vowels: the middle one ("khuỷu");
//! - the glides in qu- and gi- never take the tone.

use libviet_core::keys::{self, *};
use libviet_core::{CharacterEntry, TypingBuffer, VnChar};

/// The trailing vowel run of the buffer: indices of the entries forming the
/// word's nucleus, plus whether a coda consonant follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VowelRun {
    pub indices: Vec<usize>,
    pub has_coda: bool,
}

fn entry_is_vowel(entry: &CharacterEntry) -> bool {
    VnChar::from_entry(entry).is_vowel()
}

/// Base vowel letter of an entry for pair classification, with shape marks
/// collapsed onto their letter (ư → 'u' is NOT collapsed; the horn matters
/// for pair rules, so shaped vowels are reported distinctly).
fn vowel_letter(entry: &CharacterEntry) -> Option<char> {
    if !entry_is_vowel(entry) {
        return None;
    }
    let ch = match entry.key_code {
        KEY_A => {
            if entry.has_tone {
                'â'
            } else if entry.has_tone_w {
                'ă'
            } else {
                'a'
            }
        }
        KEY_E => {
            if entry.has_tone {
                'ê'
            } else {
                'e'
            }
        }
        KEY_O => {
            if entry.has_tone {
                'ô'
            } else if entry.has_tone_w {
                'ơ'
            } else {
                'o'
            }
        }
        KEY_U => {
            if entry.has_tone_w {
                'ư'
            } else {
                'u'
            }
        }
        KEY_I => 'i',
        KEY_Y => 'y',
        // Standalone w and the bracket shortcuts render as horned vowels.
        KEY_W | KEY_RIGHT_BRACKET => 'ư',
        KEY_LEFT_BRACKET => 'ơ',
        _ => return None,
    };
    Some(ch)
}

fn is_shaped(entry: &CharacterEntry) -> bool {
    matches!(vowel_letter(entry), Some('â' | 'ă' | 'ê' | 'ô' | 'ơ' | 'ư'))
}

/// Find the trailing vowel run. Returns `None` when the buffer holds no
/// vowel at all.
pub fn find_vowel_run(buffer: &TypingBuffer) -> Option<VowelRun> {
    let entries = buffer.entries();
    let mut end = entries.len();
    // Skip the coda consonants.
    while end > 0 && !entry_is_vowel(&entries[end - 1]) {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    let mut start = end;
    while start > 0 && entry_is_vowel(&entries[start - 1]) {
        start -= 1;
    }

    let mut indices: Vec<usize> = (start..end).collect();

    // qu-: the u is a glide, not a nucleus vowel ("quỷ" tones the y).
    // gi-: the i is part of the onset when more vowels follow ("giá").
    if start > 0 && indices.len() > 1 {
        let onset = &entries[start - 1];
        let first = &entries[indices[0]];
        let drop_glide = (onset.key_code == KEY_Q && first.key_code == KEY_U)
            || (onset.key_code == KEY_G && first.key_code == KEY_I && !first.has_tone_w);
        if drop_glide {
            indices.remove(0);
        }
    }

    Some(VowelRun {
        indices,
        has_coda: end < entries.len(),
    })
}

/// Falling pairs that keep the tone on the first vowel when no coda
/// follows.
fn is_falling_pair(first: char, second: char) -> bool {
    matches!(
        (first, second),
        ('i', 'a' | 'u')
            | ('u', 'a' | 'e' | 'i')
            | ('ư', 'a' | 'i' | 'u')
            | ('a', 'o' | 'e' | 'i' | 'u' | 'y')
            | ('e', 'o' | 'u')
            | ('o', 'i')
            | ('â', 'y' | 'u')
            | ('ơ', 'i')
    )
}

/// The pairs whose placement is a style choice rather than a rule.
fn is_style_pair(first: char, second: char) -> bool {
    matches!((first, second), ('o', 'a' | 'e') | ('u', 'y'))
}

/// Choose the entry index the tone lands on, or `None` when the buffer has
/// no vowel to carry it.
pub fn find_tone_target(buffer: &TypingBuffer, modern_style: bool) -> Option<usize> {
    let run = find_vowel_run(buffer)?;
    let entries = buffer.entries();

    // A shape-marked vowel always carries the tone; with ươ both are
    // shaped and the later one wins ("nước").
    if let Some(&idx) = run
        .indices
        .iter()
        .rev()
        .find(|&&i| is_shaped(&entries[i]))
    {
        return Some(idx);
    }

    match run.indices.len() {
        0 => None,
        1 => Some(run.indices[0]),
        2 => {
            let first_idx = run.indices[0];
            let second_idx = run.indices[1];
            let first = vowel_letter(&entries[first_idx])?;
            let second = vowel_letter(&entries[second_idx])?;

            if run.has_coda {
                Some(second_idx)
            } else if is_style_pair(first, second) {
                Some(if modern_style { second_idx } else { first_idx })
            } else if is_falling_pair(first, second) {
                Some(first_idx)
            } else {
                Some(second_idx)
            }
        }
        _ => Some(run.indices[run.indices.len() - 2]),
    }
}

/// True when the tail of the buffer is still in tone-marking position: the
/// last entry is a vowel or a legal coda consonant. Used when free marking
/// is off to reject tone keys typed after foreign-looking tails.
pub fn tail_accepts_tone(buffer: &TypingBuffer) -> bool {
    let Some(last) = buffer.last() else {
        return false;
    };
    if entry_is_vowel(last) {
        return true;
    }
    matches!(
        last.key_code,
        keys::KEY_C | keys::KEY_G | keys::KEY_H | keys::KEY_M | keys::KEY_N | keys::KEY_P | keys::KEY_T
    )
}
