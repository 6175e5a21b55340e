//! Composition buffer with a chronological keystroke log.
//!
//! The buffer holds the in-progress word as ordered [`CharacterEntry`]
//! values, capped at [`TypingBuffer::MAX_SIZE`]. When capacity is exceeded
//! the oldest entry spills into an overflow side-list: it is kept verbatim
//! for raw-text reconstruction but is no longer considered for tone
//! placement.
//!
//! Alongside the structural entries the buffer keeps a chronological log of
//! every physical keystroke. The two orderings diverge under late-binding
//! modifiers: typing t,h,u,w,e,f (f toning the ư two entries back) groups
//! structurally as t,h,u,w,f,e while the log stays t,h,u,w,e,f. Undo and
//! restore-to-raw must replay the log, not the structural order, or they
//! reconstruct the wrong word.
//!
//! Each log slot is tagged with the serial of the entry whose mutation it
//! accompanied. Deleting an entry removes exactly its own slots, wherever
//! they sit in the log; a trailing count would delete the wrong keystrokes
//! in the late-binding case.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::entry::{CharacterEntry, RawKeystroke};
use crate::keys;

/// One slot of the chronological log. `owner` is the serial of the entry
/// whose structural mutation this keystroke accompanied; slots recorded
/// with no accompanying mutation stay untagged and are only removed by
/// `remove_last_from_sequence`, `clear` or `restore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogSlot {
    keystroke: RawKeystroke,
    owner: Option<u64>,
}

/// Immutable capture of the buffer: entries, overflow and the chronological
/// log as it stood at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSnapshot {
    pub entries: Vec<CharacterEntry>,
    pub overflow: Vec<CharacterEntry>,
    pub keystroke_sequence: Vec<RawKeystroke>,
}

impl BufferSnapshot {
    pub fn new(
        entries: Vec<CharacterEntry>,
        overflow: Vec<CharacterEntry>,
        keystroke_sequence: Vec<RawKeystroke>,
    ) -> Self {
        Self {
            entries,
            overflow,
            keystroke_sequence,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    /// Number of entries (overflow excluded, matching the buffer's `count`).
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.overflow.is_empty()
    }

    /// Total keystrokes across entries and overflow.
    pub fn keystroke_count(&self) -> usize {
        self.entries
            .iter()
            .chain(self.overflow.iter())
            .map(CharacterEntry::keystroke_count)
            .sum()
    }

    pub fn first_key_code(&self) -> Option<u16> {
        self.entries.first().map(|e| e.key_code)
    }

    /// True iff the snapshot is exactly one space entry.
    pub fn is_space(&self) -> bool {
        self.overflow.is_empty()
            && self.entries.len() == 1
            && self.entries[0].key_code == keys::KEY_SPACE
    }

    /// Serialize for persistence across engine instances.
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Default for BufferSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// The composition buffer for one in-progress word.
#[derive(Debug, Clone, Default)]
pub struct TypingBuffer {
    entries: Vec<CharacterEntry>,
    /// Serial of each entry, parallel to `entries`.
    serials: Vec<u64>,
    overflow: Vec<CharacterEntry>,
    overflow_serials: Vec<u64>,
    has_overflow: bool,
    sequence: Vec<LogSlot>,
    next_serial: u64,
    /// Serial of the entry mutated by the most recent structural call,
    /// consumed by the next `record_keystroke`.
    pending_owner: Option<u64>,
}

impl TypingBuffer {
    /// Maximum number of active entries; appends beyond this spill the
    /// oldest entry into overflow.
    pub const MAX_SIZE: usize = 32;

    pub fn new() -> Self {
        Self::default()
    }

    // ========== Structural mutations ==========

    /// Push a new entry. Never fails: at capacity the oldest entry moves to
    /// the overflow list and the new entry still lands at the tail.
    pub fn append(&mut self, key_code: u16, caps: bool) {
        if self.entries.len() >= Self::MAX_SIZE {
            let spilled = self.entries.remove(0);
            let serial = self.serials.remove(0);
            trace!(key_code = spilled.key_code, "composition buffer overflow");
            self.overflow.push(spilled);
            self.overflow_serials.push(serial);
            self.has_overflow = true;
        }
        let serial = self.alloc_serial();
        self.entries.push(CharacterEntry::new(key_code, caps));
        self.serials.push(serial);
        self.pending_owner = Some(serial);
    }

    /// Attach a modifier to the entry at `index`. Silent no-op on an empty
    /// buffer or invalid index; callers that need to distinguish must check
    /// the buffer state beforehand.
    pub fn add_modifier(&mut self, index: usize, keystroke: RawKeystroke) {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.add_modifier(keystroke);
                self.pending_owner = self.serials.get(index).copied();
            }
            None => {
                self.pending_owner = None;
            }
        }
    }

    /// Attach a modifier to the most recent entry.
    pub fn add_modifier_to_last(&mut self, keystroke: RawKeystroke) {
        if self.entries.is_empty() {
            self.pending_owner = None;
            return;
        }
        let index = self.entries.len() - 1;
        self.add_modifier(index, keystroke);
    }

    /// Pop the tail entry, together with every log slot it owns, wherever
    /// those slots sit chronologically. If the pop reopens a slot that an
    /// earlier append had spilled for, the most recently spilled entry moves
    /// back in at the front, so append followed by `remove_last` is an exact
    /// round-trip even at capacity.
    pub fn remove_last(&mut self) -> Option<CharacterEntry> {
        let (removed, serial) = match (self.entries.pop(), self.serials.pop()) {
            (Some(entry), Some(serial)) => {
                if self.entries.len() == Self::MAX_SIZE - 1 {
                    if let (Some(spilled), Some(spilled_serial)) =
                        (self.overflow.pop(), self.overflow_serials.pop())
                    {
                        self.entries.insert(0, spilled);
                        self.serials.insert(0, spilled_serial);
                    }
                }
                (entry, serial)
            }
            _ => match (self.overflow.pop(), self.overflow_serials.pop()) {
                (Some(entry), Some(serial)) => (entry, serial),
                _ => return None,
            },
        };
        self.has_overflow = !self.overflow.is_empty();
        self.sequence.retain(|slot| slot.owner != Some(serial));
        self.pending_owner = None;
        Some(removed)
    }

    /// Pop only the most recently attached modifier of the tail entry,
    /// removing exactly the one log slot it owns. Returns `None` and leaves
    /// the log untouched when the buffer is empty or the tail has no
    /// modifiers.
    pub fn remove_last_modifier_from_last(&mut self) -> Option<RawKeystroke> {
        let index = self.entries.len().checked_sub(1)?;
        let serial = self.serials.get(index).copied()?;
        let removed = self.entries.get_mut(index)?.remove_last_modifier()?;
        // Modifiers are recorded after the base, so the entry's last owned
        // slot is the modifier being detached.
        if let Some(pos) = self
            .sequence
            .iter()
            .rposition(|slot| slot.owner == Some(serial))
        {
            self.sequence.remove(pos);
        }
        self.pending_owner = None;
        Some(removed)
    }

    /// Empty entries, overflow and the keystroke log together.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.serials.clear();
        self.overflow.clear();
        self.overflow_serials.clear();
        self.has_overflow = false;
        self.sequence.clear();
        self.pending_owner = None;
    }

    // ========== Keystroke sequence log ==========

    /// Record one physical key event in the chronological log. Call exactly
    /// once per key event, after the structural mutation it accompanies; the
    /// slot is tagged with the entry that mutation touched.
    pub fn record_keystroke(&mut self, keystroke: RawKeystroke) {
        let owner = self.pending_owner.take();
        self.sequence.push(LogSlot { keystroke, owner });
    }

    /// Pop exactly one keystroke from the log tail.
    pub fn remove_last_from_sequence(&mut self) -> Option<RawKeystroke> {
        self.sequence.pop().map(|slot| slot.keystroke)
    }

    pub fn keystroke_sequence_count(&self) -> usize {
        self.sequence.len()
    }

    /// The chronological log, in true input order.
    pub fn get_keystroke_sequence(&self) -> Vec<RawKeystroke> {
        self.sequence.iter().map(|slot| slot.keystroke).collect()
    }

    /// The chronological log in packed 32-bit form.
    pub fn get_keystroke_sequence_packed(&self) -> Vec<u32> {
        self.sequence
            .iter()
            .map(|slot| slot.keystroke.to_packed())
            .collect()
    }

    // ========== Reads ==========

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.overflow.is_empty()
    }

    /// Number of active entries; overflow excluded.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= Self::MAX_SIZE
    }

    pub fn has_overflow(&self) -> bool {
        self.has_overflow
    }

    pub fn overflow_count(&self) -> usize {
        self.overflow.len()
    }

    /// Total keystrokes across entries and overflow. Equals the log length
    /// when the caller has kept recording in lockstep.
    pub fn total_keystroke_count(&self) -> usize {
        self.entries
            .iter()
            .chain(self.overflow.iter())
            .map(CharacterEntry::keystroke_count)
            .sum()
    }

    /// Bounds-checked key code read; out of range yields the zero sentinel.
    pub fn key_code(&self, index: usize) -> u16 {
        self.entries.get(index).map_or(0, |e| e.key_code)
    }

    pub fn entry(&self, index: usize) -> Option<&CharacterEntry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut CharacterEntry> {
        self.entries.get_mut(index)
    }

    pub fn last(&self) -> Option<&CharacterEntry> {
        self.entries.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut CharacterEntry> {
        self.entries.last_mut()
    }

    pub fn entries(&self) -> &[CharacterEntry] {
        &self.entries
    }

    /// Flatten entries then overflow in entry-local order. This is the
    /// structural ordering; it is what `restore` rebuilds the log from.
    pub fn get_all_raw_keystrokes(&self) -> Vec<RawKeystroke> {
        self.entries
            .iter()
            .chain(self.overflow.iter())
            .flat_map(CharacterEntry::all_keystrokes)
            .collect()
    }

    /// Render the buffered letters to plain text, overflow first (the
    /// overflow list holds the oldest spilled entries). Used by callers for
    /// word-shape heuristics.
    pub fn get_raw_input_string<F>(&self, mapper: F) -> String
    where
        F: Fn(u16) -> Option<char>,
    {
        self.overflow
            .iter()
            .chain(self.entries.iter())
            .filter_map(|e| mapper(e.key_code))
            .collect()
    }

    /// As `get_raw_input_string` but excluding overflow, so stale overflow
    /// surviving a restore cannot pollute the heuristic.
    pub fn get_raw_input_string_from_entries<F>(&self, mapper: F) -> String
    where
        F: Fn(u16) -> Option<char>,
    {
        self.entries
            .iter()
            .filter_map(|e| mapper(e.key_code))
            .collect()
    }

    // ========== Snapshot & restore ==========

    /// Capture entries, overflow and the live chronological log verbatim.
    pub fn create_snapshot(&self) -> BufferSnapshot {
        BufferSnapshot::new(
            self.entries.clone(),
            self.overflow.clone(),
            self.get_keystroke_sequence(),
        )
    }

    /// Replace the buffer contents from a snapshot. The log is rebuilt from
    /// structural order, not from the snapshot's stored sequence: chronology
    /// is authoritative only within one continuous typing session, and any
    /// late-binding information is deliberately dropped across the
    /// round-trip.
    pub fn restore(&mut self, snapshot: &BufferSnapshot) {
        debug!(
            entries = snapshot.entries.len(),
            overflow = snapshot.overflow.len(),
            "restoring composition buffer from snapshot"
        );
        self.clear();
        for entry in &snapshot.entries {
            let serial = self.alloc_serial();
            self.entries.push(entry.clone());
            self.serials.push(serial);
        }
        for entry in &snapshot.overflow {
            let serial = self.alloc_serial();
            self.overflow.push(entry.clone());
            self.overflow_serials.push(serial);
        }
        self.has_overflow = !self.overflow.is_empty();
        self.rebuild_sequence_from_entries();
    }

    /// Rebuild the buffer from an older persisted packed-word array. Words
    /// that decode to nonsense still produce default entries; the operation
    /// never fails.
    pub fn restore_from_legacy(&mut self, words: &[u32]) {
        self.clear();
        for &word in words {
            let entry = CharacterEntry::from_legacy(word);
            if self.entries.len() >= Self::MAX_SIZE {
                let spilled = self.entries.remove(0);
                let serial = self.serials.remove(0);
                self.overflow.push(spilled);
                self.overflow_serials.push(serial);
                self.has_overflow = true;
            }
            let serial = self.alloc_serial();
            self.entries.push(entry);
            self.serials.push(serial);
        }
        self.rebuild_sequence_from_entries();
    }

    fn rebuild_sequence_from_entries(&mut self) {
        self.sequence.clear();
        let entries = self.entries.iter().zip(self.serials.iter());
        let overflow = self.overflow.iter().zip(self.overflow_serials.iter());
        for (entry, &serial) in entries.chain(overflow) {
            for keystroke in entry.all_keystrokes() {
                self.sequence.push(LogSlot {
                    keystroke,
                    owner: Some(serial),
                });
            }
        }
        self.pending_owner = None;
    }

    fn alloc_serial(&mut self) -> u64 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }
}
