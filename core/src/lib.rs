//! libviet-core
//!
//! Composition model, keystroke history and character codec shared by
//! Vietnamese input-convention crates (libtelex).
//!
//! The crate covers the convention-independent half of a keystroke-to-text
//! engine: what a composed letter is, how the in-progress word is buffered
//! and logged, how word-level undo snapshots work, and how abstract
//! graphemes render into each supported output encoding. Interpreting
//! keystrokes (which keys carry tones, where a tone lands) belongs to the
//! convention crates built on top.
//!
//! Public API:
//! - `RawKeystroke` / `CharacterEntry` - atomic composition state
//! - `TypingBuffer` / `BufferSnapshot` - the in-progress word and its log
//! - `TypingHistory` - word-granularity undo stack
//! - `VnChar` / `CodeTable` - grapheme model and output encodings
//! - `Config` - configuration and feature flags
//!
//! A `TypingBuffer` and `TypingHistory` belong to exactly one engine
//! instance and are not safe for concurrent access without external
//! synchronization.

use serde::{Deserialize, Serialize};

pub mod keys;

pub mod entry;
pub use entry::{CharacterEntry, RawKeystroke};
pub use entry::{CAPS_MASK, CHAR_MASK, MARK_MASK, MARK_SHIFT, TONE_MASK, TONE_W_MASK};

pub mod buffer;
pub use buffer::{BufferSnapshot, TypingBuffer};

pub mod history;
pub use history::TypingHistory;

pub mod vnchar;
pub use vnchar::{CodeTable, Consonant, InputMethod, Tone, VnChar, Vowel};

pub mod charmap;

/// Engine configuration shared by every input convention.
///
/// The convention crates wrap this in their own config type for
/// convention-specific options. The core never reads global state; callers
/// pass a `Config` (or a reference) into each operation that needs one.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Input convention (Telex, VNI, Simple Telex variants)
    pub input_method: InputMethod,
    /// Output encoding for rendered text
    pub code_table: CodeTable,
    /// Tone placement style for the oa/oe/uy pairs: modern places the tone
    /// on the second vowel ("hoà"), traditional on the first ("hòa")
    pub modern_style: bool,
    /// Allow tone keys to bind to a vowel typed several letters earlier
    pub free_mark: bool,
    /// Classify the raw input for Vietnamese word shape
    pub spell_check: bool,
    /// On a word boundary, revert words that do not look Vietnamese back to
    /// their raw keystrokes
    pub restore_if_wrong_spelling: bool,
    /// Force the first letter after a sentence break to uppercase
    pub upper_case_first_char: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_method: InputMethod::Telex,
            code_table: CodeTable::Unicode,
            // Traditional placement by default ("hòa")
            modern_style: false,
            free_mark: false,
            spell_check: true,
            restore_if_wrong_spelling: false,
            upper_case_first_char: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn set_input_method(&mut self, method: InputMethod) {
        self.input_method = method;
    }

    pub fn set_code_table(&mut self, table: CodeTable) {
        self.code_table = table;
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.input_method, InputMethod::Telex);
        assert_eq!(config.code_table, CodeTable::Unicode);
        assert!(!config.modern_style);
        assert!(config.spell_check);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = Config::default();
        config.input_method = InputMethod::Vni;
        config.code_table = CodeTable::UnicodeCompound;
        config.modern_style = true;

        let toml_str = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed.input_method, InputMethod::Vni);
        assert_eq!(parsed.code_table, CodeTable::UnicodeCompound);
        assert!(parsed.modern_style);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(utils::normalize("  xin chào \n"), "xin chào");
        // Decomposed input folds to precomposed form.
        assert_eq!(utils::normalize("a\u{0301}"), "á");
    }
}
