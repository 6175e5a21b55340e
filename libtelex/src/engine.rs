//! The Vietnamese composition engine.
//!
//! `VietEngine` consumes one key event at a time and answers with a
//! [`ProcessResult`]: whether the key was consumed, how many previously
//! inserted output units the host must delete, and which graphemes to
//! insert instead. The engine owns the composition buffer and the word
//! history; the host owns the document.
//!
//! Every operation is synchronous, bounded by the buffer capacity and free
//! of I/O. One engine instance serves one text field; instances are not
//! safe for concurrent access without external synchronization.

use tracing::debug;

use libviet_core::keys::{self, *};
use libviet_core::{
    CharacterEntry, Config, RawKeystroke, Tone, TypingBuffer, TypingHistory, VnChar,
};

use crate::config::TelexConfig;
use crate::keymap::{self, ShapeRequest};
use crate::placement;
use crate::spelling;

/// Outcome of processing one key event.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessResult {
    /// True when the engine handled the key; false lets the host insert the
    /// character itself.
    pub consumed: bool,
    /// Output units to delete before inserting `chars`.
    pub backspace_count: usize,
    /// Graphemes to insert, in order.
    pub chars: Vec<VnChar>,
}

impl ProcessResult {
    pub fn pass_through() -> Self {
        Self {
            consumed: false,
            backspace_count: 0,
            chars: Vec::new(),
        }
    }

    /// Render the inserted graphemes for the configured code table.
    pub fn render(&self, config: &Config) -> String {
        self.chars
            .iter()
            .map(|c| c.render(config.code_table))
            .collect()
    }
}

/// Keystroke-to-grapheme engine for one text field.
#[derive(Debug)]
pub struct VietEngine {
    buffer: TypingBuffer,
    history: TypingHistory,
    config: TelexConfig,
    /// Word-separating spaces typed since the last word, folded into one
    /// history unit when the next word starts.
    pending_spaces: usize,
    /// True at the start of input and after sentence punctuation.
    sentence_start: bool,
}

impl Default for VietEngine {
    fn default() -> Self {
        Self::new(TelexConfig::default())
    }
}

impl VietEngine {
    pub fn new(config: TelexConfig) -> Self {
        Self {
            buffer: TypingBuffer::new(),
            history: TypingHistory::new(),
            config,
            pending_spaces: 0,
            sentence_start: true,
        }
    }

    pub fn config(&self) -> &TelexConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TelexConfig {
        &mut self.config
    }

    pub fn buffer(&self) -> &TypingBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &TypingHistory {
        &self.history
    }

    /// Abandon the in-progress word without emitting anything. The history
    /// survives so the last committed word stays undoable.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending_spaces = 0;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Rebuild the composition state from a persisted packed-word array.
    pub fn restore_state_from_legacy(&mut self, words: &[u32]) {
        self.buffer.restore_from_legacy(words);
    }

    /// Process one printable key event.
    pub fn process_key(&mut self, ch: char, key_code: u16, caps: bool) -> ProcessResult {
        if keymap::is_word_break_char(ch) {
            return self.process_word_break(ch);
        }
        self.flush_pending_spaces();

        let method = self.config.base.input_method;
        let keystroke = RawKeystroke::new(key_code, caps);

        if let Some(tone) = keymap::tone_for_key(method, key_code) {
            if let Some(result) = self.try_apply_tone(tone, keystroke) {
                debug!(?tone, key_code, "tone key applied");
                return result;
            }
        }

        if let Some(request) = keymap::shape_for_key(method, key_code) {
            if let Some(result) = self.try_apply_shape(request, keystroke) {
                debug!(?request, key_code, "shape key applied");
                return result;
            }
        }

        // Standalone w types ư when no vowel was there to horn.
        if key_code == KEY_W
            && keymap::standalone_w_is_vowel(method)
            && !self.config.allow_consonant_zfwj
        {
            return self.append_shaped_or_escape(key_code, caps, keystroke);
        }

        if keymap::brackets_are_vowels(method)
            && matches!(key_code, KEY_LEFT_BRACKET | KEY_RIGHT_BRACKET)
        {
            return self.append_shaped_or_escape(key_code, caps, keystroke);
        }

        if let Some(result) = self.try_quick_entry(key_code, caps, keystroke) {
            return result;
        }

        self.append_literal(ch, key_code, caps, keystroke)
    }

    /// Convenience wrapper deriving the key code from the character.
    pub fn process_char(&mut self, ch: char) -> ProcessResult {
        match keys::key_for_char(ch) {
            Some((key_code, caps)) => self.process_key(ch, key_code, caps),
            None => ProcessResult::pass_through(),
        }
    }

    /// Handle a backspace event. The buffer drops the tail entry; the host
    /// deletes one output unit (the engine only takes over the deletion for
    /// code tables whose units span several scalars).
    pub fn process_backspace(&mut self) -> ProcessResult {
        if self.buffer.is_empty() {
            if self.pending_spaces > 0 {
                self.pending_spaces -= 1;
            }
            return ProcessResult::pass_through();
        }
        self.buffer.remove_last();
        ProcessResult {
            consumed: self.config.base.code_table.requires_double_backspace(),
            backspace_count: 1,
            chars: Vec::new(),
        }
    }

    /// Handle a word-boundary event (space, return, tab, punctuation). The
    /// boundary character itself always passes through; the result carries
    /// only the raw-restoration rewrite when the finished word failed the
    /// spelling check.
    pub fn process_word_break(&mut self, ch: char) -> ProcessResult {
        if keymap::ends_sentence(ch) {
            self.sentence_start = true;
        }
        if self.buffer.is_empty() {
            if ch == ' ' {
                self.pending_spaces += 1;
            }
            return ProcessResult::pass_through();
        }

        let mut result = ProcessResult::pass_through();
        if self.config.base.restore_if_wrong_spelling && self.config.base.spell_check {
            let raw = self
                .buffer
                .get_raw_input_string_from_entries(|k| keys::char_for_key(k, false));
            if spelling::is_foreign_word(&raw, self.config.allow_consonant_zfwj) {
                debug!(%raw, "restoring foreign-looking word to raw keystrokes");
                result = self.restore_raw_result();
            }
        }

        self.history.save(self.buffer.create_snapshot());
        self.buffer.clear();
        if ch == ' ' {
            self.pending_spaces = 1;
        }
        result
    }

    /// Escape abandons the Vietnamese transformation: the composed word is
    /// rewritten as the raw keystrokes, in true chronological order.
    pub fn process_escape(&mut self) -> ProcessResult {
        if self.buffer.is_empty() {
            return ProcessResult::pass_through();
        }
        let result = self.restore_raw_result();
        self.buffer.clear();
        result
    }

    /// Undo the most recent word: delete its rendered units and put back
    /// what the user physically typed.
    pub fn undo_last_word(&mut self) -> Option<ProcessResult> {
        self.flush_pending_spaces();
        let snapshot = self.history.pop_last()?;
        let backspace_count = snapshot.count() + snapshot.overflow.len();
        let chars = snapshot
            .keystroke_sequence
            .iter()
            .filter_map(|k| keys::char_for_key(k.key_code, k.caps))
            .map(VnChar::Plain)
            .collect();
        self.buffer.clear();
        Some(ProcessResult {
            consumed: true,
            backspace_count,
            chars,
        })
    }

    // ========== Key interpretation ==========

    fn flush_pending_spaces(&mut self) {
        if self.pending_spaces > 0 {
            self.history.save_spaces(self.pending_spaces);
            self.pending_spaces = 0;
        }
    }

    fn try_apply_tone(&mut self, tone: Tone, keystroke: RawKeystroke) -> Option<ProcessResult> {
        if self.buffer.is_empty() {
            return None;
        }
        if !self.config.base.free_mark && !placement::tail_accepts_tone(&self.buffer) {
            return None;
        }
        let target = placement::find_tone_target(&self.buffer, self.config.base.modern_style)?;
        let current = self.buffer.entry(target)?.mark;
        let count_before = self.buffer.count();

        if tone == Tone::None {
            // The clear key only acts when there is a mark to clear.
            if current == Tone::None {
                return None;
            }
            self.buffer.entry_mut(target)?.mark = Tone::None;
            self.buffer.add_modifier(target, keystroke);
            self.buffer.record_keystroke(keystroke);
            return Some(self.rerender_from(target, count_before));
        }

        if current == tone {
            // Repeating the tone key escapes it: the mark comes off and the
            // key reverts to a literal letter.
            self.buffer.entry_mut(target)?.mark = Tone::None;
            self.buffer.append(keystroke.key_code, keystroke.caps);
            self.buffer.record_keystroke(keystroke);
            return Some(self.rerender_from(target, count_before));
        }

        self.buffer.entry_mut(target)?.mark = tone;
        self.buffer.add_modifier(target, keystroke);
        self.buffer.record_keystroke(keystroke);
        Some(self.rerender_from(target, count_before))
    }

    fn try_apply_shape(
        &mut self,
        request: ShapeRequest,
        keystroke: RawKeystroke,
    ) -> Option<ProcessResult> {
        match request {
            ShapeRequest::Doubled(letter) => self.apply_doubled(letter, keystroke),
            ShapeRequest::Circumflex => self.apply_circumflex(keystroke),
            ShapeRequest::DStroke => self.apply_dstroke(keystroke),
            ShapeRequest::HornBreve => self.apply_horn_breve(&[KEY_U, KEY_O, KEY_A], keystroke),
            ShapeRequest::Horn => self.apply_horn_breve(&[KEY_U, KEY_O], keystroke),
            ShapeRequest::Breve => self.apply_horn_breve(&[KEY_A], keystroke),
        }
    }

    /// Telex doubled letter: a second a/e/o circumflexes the earlier vowel,
    /// a second d strokes the d. A coda consonant closes the syllable, so
    /// the doubling never reaches back across one ("bana" stays literal).
    fn apply_doubled(&mut self, letter: u16, keystroke: RawKeystroke) -> Option<ProcessResult> {
        if letter == KEY_D {
            return self.apply_dstroke(keystroke);
        }
        let run = placement::find_vowel_run(&self.buffer)?;
        if run.has_coda {
            return None;
        }
        let target = *run.indices.iter().rev().find(|&&i| {
            self.buffer
                .entry(i)
                .is_some_and(|e| e.key_code == letter && !e.has_tone_w)
        })?;
        self.toggle_shape_flag(target, true, keystroke)
    }

    /// VNI digit 6: circumflex on the rightmost a/e/o of the nucleus.
    fn apply_circumflex(&mut self, keystroke: RawKeystroke) -> Option<ProcessResult> {
        let run = placement::find_vowel_run(&self.buffer)?;
        let target = *run.indices.iter().rev().find(|&&i| {
            self.buffer.entry(i).is_some_and(|e| {
                matches!(e.key_code, KEY_A | KEY_E | KEY_O) && !e.has_tone_w
            })
        })?;
        self.toggle_shape_flag(target, true, keystroke)
    }

    /// dd (Telex) or digit 9 (VNI): đ is onset-only, so the first d in the
    /// buffer takes the stroke.
    fn apply_dstroke(&mut self, keystroke: RawKeystroke) -> Option<ProcessResult> {
        let target = (0..self.buffer.count())
            .find(|&i| self.buffer.entry(i).is_some_and(|e| e.key_code == KEY_D))?;
        self.toggle_shape_flag(target, true, keystroke)
    }

    /// w (Telex) or digits 7/8 (VNI): horn on o/u, breve on a. An adjacent
    /// u-o pair horns as a unit (ươ) unless the u is the qu- glide.
    fn apply_horn_breve(
        &mut self,
        accepted: &[u16],
        keystroke: RawKeystroke,
    ) -> Option<ProcessResult> {
        let run = placement::find_vowel_run(&self.buffer)?;

        // ươ pair: u immediately followed by o inside the nucleus.
        if accepted.contains(&KEY_U) && accepted.contains(&KEY_O) {
            if let Some(pair) = self.find_uo_pair(&run.indices) {
                let (u_idx, o_idx) = pair;
                let both_horned = self.horned(u_idx) && self.horned(o_idx);
                let count_before = self.buffer.count();
                if both_horned {
                    self.buffer.entry_mut(u_idx)?.has_tone_w = false;
                    self.buffer.entry_mut(o_idx)?.has_tone_w = false;
                    self.buffer.append(keystroke.key_code, keystroke.caps);
                    self.buffer.record_keystroke(keystroke);
                } else {
                    self.buffer.entry_mut(u_idx)?.has_tone_w = true;
                    self.buffer.entry_mut(o_idx)?.has_tone_w = true;
                    self.buffer.add_modifier(o_idx, keystroke);
                    self.buffer.record_keystroke(keystroke);
                }
                return Some(self.rerender_from(u_idx, count_before));
            }
        }

        let target = *run.indices.iter().rev().find(|&&i| {
            self.buffer
                .entry(i)
                .is_some_and(|e| accepted.contains(&e.key_code) && !e.has_tone)
        })?;
        self.toggle_shape_flag(target, false, keystroke)
    }

    /// Set or escape a shape flag on `target`. A set attaches the keystroke
    /// as a modifier; a repeat clears the flag and the key reverts to a
    /// literal letter.
    fn toggle_shape_flag(
        &mut self,
        target: usize,
        circumflex_family: bool,
        keystroke: RawKeystroke,
    ) -> Option<ProcessResult> {
        let count_before = self.buffer.count();
        let entry = self.buffer.entry(target)?;
        let already_set = if circumflex_family {
            entry.has_tone
        } else {
            entry.has_tone_w
        };

        if already_set {
            let entry = self.buffer.entry_mut(target)?;
            if circumflex_family {
                entry.has_tone = false;
            } else {
                entry.has_tone_w = false;
            }
            self.buffer.append(keystroke.key_code, keystroke.caps);
            self.buffer.record_keystroke(keystroke);
        } else {
            let entry = self.buffer.entry_mut(target)?;
            if circumflex_family {
                entry.has_tone = true;
            } else {
                entry.has_tone_w = true;
            }
            self.buffer.add_modifier(target, keystroke);
            self.buffer.record_keystroke(keystroke);
        }
        Some(self.rerender_from(target, count_before))
    }

    fn find_uo_pair(&self, run: &[usize]) -> Option<(usize, usize)> {
        for pair in run.windows(2) {
            let (i, j) = (pair[0], pair[1]);
            let u = self.buffer.entry(i)?;
            let o = self.buffer.entry(j)?;
            if u.key_code == KEY_U && o.key_code == KEY_O && !u.has_tone && !o.has_tone {
                // qu-: the u is a glide, leave it alone.
                let after_q = i > 0
                    && self
                        .buffer
                        .entry(i - 1)
                        .is_some_and(|e| e.key_code == KEY_Q);
                if !after_q {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Standalone shaped vowels: w → ư and the bracket shortcuts. The entry
    /// keeps the physical key code so raw reconstruction replays what was
    /// typed; only the shape flag makes it render as a vowel. Repeating the
    /// key escapes back to the literal character ("ww" → "w").
    fn append_shaped_or_escape(
        &mut self,
        key_code: u16,
        caps: bool,
        keystroke: RawKeystroke,
    ) -> ProcessResult {
        let escape = self
            .buffer
            .last()
            .is_some_and(|e| e.key_code == key_code && e.has_tone_w);
        if escape {
            let count_before = self.buffer.count();
            if let Some(entry) = self.buffer.last_mut() {
                entry.has_tone_w = false;
            }
            self.buffer.add_modifier_to_last(keystroke);
            self.buffer.record_keystroke(keystroke);
            return self.rerender_from(count_before - 1, count_before);
        }

        self.buffer.append(key_code, caps);
        if let Some(entry) = self.buffer.last_mut() {
            entry.has_tone_w = true;
        }
        self.buffer.record_keystroke(keystroke);
        self.sentence_start = false;
        let chars = self.buffer.last().map(VnChar::from_entry).into_iter().collect();
        ProcessResult {
            consumed: true,
            backspace_count: 0,
            chars,
        }
    }

    fn try_quick_entry(
        &mut self,
        key_code: u16,
        caps: bool,
        keystroke: RawKeystroke,
    ) -> Option<ProcessResult> {
        // Doubled consonant expansion: cc → ch, tt → th, ...
        if self.config.quick_telex && keymap::quick_telex_doubles(key_code) {
            let eligible = self
                .buffer
                .last()
                .is_some_and(|e| e.key_code == key_code && !e.has_tone && !e.has_tone_w);
            if eligible {
                let count_before = self.buffer.count();
                self.buffer.last_mut()?.has_tone = true;
                self.buffer.add_modifier_to_last(keystroke);
                self.buffer.record_keystroke(keystroke);
                return Some(self.rerender_from(count_before - 1, count_before));
            }
        }

        // Word-initial expansion: f → ph, j → gi.
        if self.config.quick_start_consonant
            && self.buffer.is_empty()
            && keymap::quick_start_expansion(key_code)
        {
            self.buffer.append(key_code, caps);
            self.buffer.last_mut()?.has_tone_w = true;
            self.buffer.record_keystroke(keystroke);
            self.sentence_start = false;
            let chars = self.buffer.last().map(VnChar::from_entry).into_iter().collect();
            return Some(ProcessResult {
                consumed: true,
                backspace_count: 0,
                chars,
            });
        }

        // Post-nucleus expansion: g → ng, h → nh.
        if self.config.quick_end_consonant && keymap::quick_end_expansion(key_code) {
            let after_vowel = self
                .buffer
                .last()
                .map(VnChar::from_entry)
                .is_some_and(|c| c.is_vowel());
            if after_vowel {
                self.buffer.append(key_code, caps);
                self.buffer.last_mut()?.has_tone_w = true;
                self.buffer.record_keystroke(keystroke);
                let chars = self.buffer.last().map(VnChar::from_entry).into_iter().collect();
                return Some(ProcessResult {
                    consumed: true,
                    backspace_count: 0,
                    chars,
                });
            }
        }

        None
    }

    fn append_literal(
        &mut self,
        ch: char,
        key_code: u16,
        caps: bool,
        keystroke: RawKeystroke,
    ) -> ProcessResult {
        let force_caps = self.config.base.upper_case_first_char
            && self.sentence_start
            && self.buffer.is_empty()
            && ch.is_ascii_alphabetic();
        self.buffer.append(key_code, caps || force_caps);
        self.buffer.record_keystroke(keystroke);
        self.sentence_start = false;

        let rendered = match self.buffer.last() {
            Some(entry) => VnChar::from_entry(entry),
            None => return ProcessResult::pass_through(),
        };
        // Plain letters that render as themselves pass through untouched.
        if rendered.render(self.config.base.code_table) == ch.to_string() {
            return ProcessResult::pass_through();
        }
        ProcessResult {
            consumed: true,
            backspace_count: 0,
            chars: vec![rendered],
        }
    }

    // ========== Rendering ==========

    fn horned(&self, index: usize) -> bool {
        self.buffer.entry(index).is_some_and(|e| e.has_tone_w)
    }

    /// Re-render the entries from `start` to the tail after a retroactive
    /// change; the host deletes the units that were displayed for that span
    /// before the mutation.
    fn rerender_from(&self, start: usize, count_before: usize) -> ProcessResult {
        let chars = self.buffer.entries()[start..]
            .iter()
            .map(VnChar::from_entry)
            .collect();
        ProcessResult {
            consumed: true,
            backspace_count: count_before.saturating_sub(start),
            chars,
        }
    }

    /// Rewrite the whole composed word as its raw keystrokes, chronological
    /// order, case preserved.
    fn restore_raw_result(&self) -> ProcessResult {
        let backspace_count = self.buffer.count() + self.buffer.overflow_count();
        let chars = self
            .buffer
            .get_keystroke_sequence()
            .iter()
            .filter_map(|k| keys::char_for_key(k.key_code, k.caps))
            .map(VnChar::Plain)
            .collect();
        ProcessResult {
            consumed: true,
            backspace_count,
            chars,
        }
    }

    /// Current composition rendered for display (debugging and the demo
    /// binary; the host normally tracks its own document).
    pub fn composed_text(&self) -> String {
        let entry_text = |e: &CharacterEntry| {
            VnChar::from_entry(e).render(self.config.base.code_table)
        };
        self.buffer.entries().iter().map(entry_text).collect()
    }
}
