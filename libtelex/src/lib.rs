//! libtelex crate root
//!
//! Input-convention layer for Vietnamese typing, built on `libviet-core`.
//! This crate interprets keystrokes under the Telex family and VNI
//! conventions: which keys spell tones, which request vowel shapes, where a
//! tone lands in the syllable, and when a finished word should be handed
//! back as raw keystrokes.
//!
//! Public API exported here:
//! - `VietEngine` and `ProcessResult` from `engine`
//! - `TelexConfig` from `config`
//! - tone placement helpers from `placement`
//! - word-shape classification from `spelling`

pub mod config;
pub mod engine;
pub mod keymap;
pub mod placement;
pub mod spelling;

// Re-export the core model types callers need alongside the engine.
pub use libviet_core::{
    BufferSnapshot, CharacterEntry, CodeTable, Config, Consonant, InputMethod, RawKeystroke, Tone,
    TypingBuffer, TypingHistory, VnChar, Vowel,
};

// Convenience re-exports for common types used by callers.
pub use config::TelexConfig;
pub use engine::{ProcessResult, VietEngine};
