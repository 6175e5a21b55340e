//! Character entries and raw keystrokes.
//!
//! A `RawKeystroke` is one physical key event; a `CharacterEntry` is one
//! composed letter position, built from a base keystroke plus any modifier
//! keystrokes that were later attached to it (tone keys, shape keys,
//! doubled letters).
//!
//! The live representation is an explicit struct with named fields. The
//! packed 32-bit legacy format exists only at the serialization boundary
//! (`to_legacy` / `from_legacy`) for compatibility with previously saved
//! state.

use serde::{Deserialize, Serialize};

use crate::vnchar::Tone;

/// Low 16 bits of a packed word: the key code.
pub const CHAR_MASK: u32 = 0x0000_FFFF;
/// Case flag bit.
pub const CAPS_MASK: u32 = 0x0001_0000;
/// Circumflex / doubled-letter shape family flag.
pub const TONE_MASK: u32 = 0x0002_0000;
/// Horn / breve shape family flag.
pub const TONE_W_MASK: u32 = 0x0004_0000;
/// Three bits carrying the pitch-tone index (0..=5).
pub const MARK_SHIFT: u32 = 19;
pub const MARK_MASK: u32 = 0x7 << MARK_SHIFT;

/// One physical key event: key code plus case flag.
///
/// Packs losslessly into a `u32` (key code in the low bits, one caps bit).
/// Equality by fields is equality by packed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawKeystroke {
    pub key_code: u16,
    pub caps: bool,
}

impl RawKeystroke {
    pub fn new(key_code: u16, caps: bool) -> Self {
        Self { key_code, caps }
    }

    /// Pack into the 32-bit wire form.
    pub fn to_packed(self) -> u32 {
        let mut word = u32::from(self.key_code) & CHAR_MASK;
        if self.caps {
            word |= CAPS_MASK;
        }
        word
    }

    /// Unpack from the 32-bit wire form.
    pub fn from_packed(word: u32) -> Self {
        Self {
            key_code: (word & CHAR_MASK) as u16,
            caps: word & CAPS_MASK != 0,
        }
    }
}

/// One composed letter position in the buffer.
///
/// The base key code identifies the letter as typed; `has_tone`,
/// `has_tone_w` and `mark` record what later keystrokes did to it. The two
/// shape flags are independent single bits and are disjoint from `mark`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub key_code: u16,
    pub caps: bool,
    pub has_tone: bool,
    pub has_tone_w: bool,
    pub mark: Tone,
    /// Modifier keystrokes in local attachment order.
    pub modifiers: Vec<RawKeystroke>,
}

impl CharacterEntry {
    pub fn new(key_code: u16, caps: bool) -> Self {
        Self {
            key_code,
            caps,
            has_tone: false,
            has_tone_w: false,
            mark: Tone::None,
            modifiers: Vec::new(),
        }
    }

    /// Decode a persisted packed word. Unknown bits are ignored and an
    /// out-of-range mark degrades to `Tone::None`; malformed input yields a
    /// usable default entry rather than an error.
    pub fn from_legacy(word: u32) -> Self {
        Self {
            key_code: (word & CHAR_MASK) as u16,
            caps: word & CAPS_MASK != 0,
            has_tone: word & TONE_MASK != 0,
            has_tone_w: word & TONE_W_MASK != 0,
            mark: Tone::from_index((word & MARK_MASK) >> MARK_SHIFT),
            modifiers: Vec::new(),
        }
    }

    /// Pack the entry's base letter and flags into the legacy word form.
    /// Modifier keystrokes are not representable there and are dropped.
    pub fn to_legacy(&self) -> u32 {
        let mut word = u32::from(self.key_code) & CHAR_MASK;
        if self.caps {
            word |= CAPS_MASK;
        }
        if self.has_tone {
            word |= TONE_MASK;
        }
        if self.has_tone_w {
            word |= TONE_W_MASK;
        }
        word |= (self.mark.index() << MARK_SHIFT) & MARK_MASK;
        word
    }

    /// Attach a modifier keystroke. The base key code never changes here.
    pub fn add_modifier(&mut self, keystroke: RawKeystroke) {
        self.modifiers.push(keystroke);
    }

    /// Remove and return the most recently attached modifier.
    pub fn remove_last_modifier(&mut self) -> Option<RawKeystroke> {
        self.modifiers.pop()
    }

    /// Replace the base letter, preserving case, shape flags and mark.
    /// Used when an already-typed vowel is reinterpreted by a later
    /// keystroke.
    pub fn set_key_code(&mut self, key_code: u16) {
        self.key_code = key_code;
    }

    /// Base keystroke plus all modifiers: 1 + modifiers.len().
    pub fn keystroke_count(&self) -> usize {
        1 + self.modifiers.len()
    }

    pub fn has_mark(&self) -> bool {
        self.mark != Tone::None
    }

    /// The base key event this entry was created from.
    pub fn base_keystroke(&self) -> RawKeystroke {
        RawKeystroke::new(self.key_code, self.caps)
    }

    /// Base then modifiers, in local attachment order. This is entry-local
    /// order, not global chronological order; the buffer's keystroke
    /// sequence log is the chronological record.
    pub fn all_keystrokes(&self) -> Vec<RawKeystroke> {
        let mut out = Vec::with_capacity(self.keystroke_count());
        out.push(self.base_keystroke());
        out.extend_from_slice(&self.modifiers);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    #[test]
    fn test_keystroke_packing_roundtrip() {
        let ks = RawKeystroke::new(keys::KEY_B, true);
        let word = ks.to_packed();
        assert_eq!(word & CHAR_MASK, u32::from(keys::KEY_B));
        assert_ne!(word & CAPS_MASK, 0);
        assert_eq!(RawKeystroke::from_packed(word), ks);
    }

    #[test]
    fn test_keystroke_equality() {
        let k1 = RawKeystroke::new(keys::KEY_A, false);
        let k2 = RawKeystroke::new(keys::KEY_A, false);
        let k3 = RawKeystroke::new(keys::KEY_A, true);
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
    }

    #[test]
    fn test_new_entry() {
        let entry = CharacterEntry::new(keys::KEY_A, false);
        assert_eq!(entry.key_code, keys::KEY_A);
        assert!(!entry.caps);
        assert!(!entry.has_tone);
        assert!(!entry.has_tone_w);
        assert!(!entry.has_mark());
        assert_eq!(entry.keystroke_count(), 1);
    }

    #[test]
    fn test_legacy_roundtrip() {
        let mut entry = CharacterEntry::new(keys::KEY_U, true);
        entry.has_tone_w = true;
        entry.mark = Tone::Grave;
        let decoded = CharacterEntry::from_legacy(entry.to_legacy());
        assert_eq!(decoded.key_code, keys::KEY_U);
        assert!(decoded.caps);
        assert!(!decoded.has_tone);
        assert!(decoded.has_tone_w);
        assert_eq!(decoded.mark, Tone::Grave);
    }

    #[test]
    fn test_from_legacy_flags() {
        let word = u32::from(keys::KEY_A) | CAPS_MASK | TONE_MASK;
        let entry = CharacterEntry::from_legacy(word);
        assert_eq!(entry.key_code, keys::KEY_A);
        assert!(entry.caps);
        assert!(entry.has_tone);
        assert!(!entry.has_tone_w);
    }

    #[test]
    fn test_from_legacy_malformed_mark() {
        let word = u32::from(keys::KEY_A) | (7 << MARK_SHIFT);
        let entry = CharacterEntry::from_legacy(word);
        assert_eq!(entry.mark, Tone::None);
    }

    #[test]
    fn test_add_modifier() {
        let mut entry = CharacterEntry::new(keys::KEY_A, false);
        entry.add_modifier(RawKeystroke::new(keys::KEY_A, false));
        assert_eq!(entry.keystroke_count(), 2);
        assert_eq!(entry.modifiers.len(), 1);
    }

    #[test]
    fn test_all_keystrokes_local_order() {
        let mut entry = CharacterEntry::new(keys::KEY_A, false);
        entry.add_modifier(RawKeystroke::new(keys::KEY_A, false));
        entry.add_modifier(RawKeystroke::new(keys::KEY_J, false));
        let all = entry.all_keystrokes();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].key_code, keys::KEY_A);
        assert_eq!(all[1].key_code, keys::KEY_A);
        assert_eq!(all[2].key_code, keys::KEY_J);
    }

    #[test]
    fn test_set_key_code_preserves_flags() {
        let mut entry = CharacterEntry::new(keys::KEY_A, true);
        entry.has_tone = true;
        entry.mark = Tone::Acute;
        entry.set_key_code(keys::KEY_E);
        assert_eq!(entry.key_code, keys::KEY_E);
        assert!(entry.caps);
        assert!(entry.has_tone);
        assert_eq!(entry.mark, Tone::Acute);
    }
}
