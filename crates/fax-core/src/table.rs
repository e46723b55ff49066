//! Open-addressing hash table, keyed by `Value` (spec §3.3/§4.4).

use crate::context::VmContext;
use crate::error::CoreError;
use crate::value::{self, Value};

/// A single slot. See spec §3.3 for the key/value state table:
///
/// | key            | value           | meaning |
/// |----------------|-----------------|---------|
/// | `Kwargs(0)`    | `None`          | empty (never used) |
/// | `Kwargs(0)`    | `Boolean(true)` | tombstone |
/// | anything else  | anything        | live |
#[derive(Clone, Copy)]
struct Entry {
    key: Value,
    value: Value,
}

impl Entry {
    fn empty() -> Entry {
        Entry {
            key: Value::kwargs_empty(),
            value: Value::None,
        }
    }

    fn tombstone() -> Entry {
        Entry {
            key: Value::kwargs_empty(),
            value: Value::Boolean(true),
        }
    }

    fn is_empty(&self) -> bool {
        self.key.is_kwargs_empty() && matches!(self.value, Value::None)
    }

    fn is_tombstone(&self) -> bool {
        self.key.is_kwargs_empty() && matches!(self.value, Value::Boolean(true))
    }

    fn is_live(&self) -> bool {
        !self.key.is_kwargs_empty()
    }
}

/// Max load factor before a grow is forced (spec §3.3).
const MAX_LOAD: f64 = 0.75;

/// `Table::set`'s grow schedule (spec §4.4: "implementation-chosen",
/// fixed here per SPEC_FULL.md §5).
fn grown_capacity(capacity: usize) -> usize {
    (capacity * 2).max(8)
}

/// `capacity` is `entries.len()`; `count` tracks live **and** tombstone
/// slots, since both occupy probe chains (spec §3.3).
pub struct Table {
    entries: Vec<Entry>,
    count: usize,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// `init` (spec §4.4).
    pub fn new() -> Table {
        Table {
            entries: Vec::new(),
            count: 0,
        }
    }

    /// `free` (spec §4.4): release entries, reset to init state.
    pub fn free(&mut self) {
        self.entries = Vec::new();
        self.count = 0;
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of live **and** tombstone slots — the load-factor
    /// denominator's numerator (spec §3.3).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of slots whose key is live (not a sentinel at all).
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_live()).count()
    }

    /// `find_entry` (spec §4.4): locate the slot `k` belongs in. Returns
    /// the index of a live match, or of the first empty/tombstone slot
    /// seen (preferring a tombstone so deletions get reclaimed), or
    /// `Err` if hashing `k` failed.
    ///
    /// Pure: this function never mutates `entries`, which matters because
    /// computing `hash(k)` for a general object can re-enter user code
    /// (spec §9, "Re-entrancy during hashing") — the table must never be
    /// observed mid-mutation from that callback.
    fn find_entry(
        entries: &[Entry],
        ctx: &mut dyn VmContext,
        k: Value,
    ) -> Result<usize, CoreError> {
        debug_assert!(!entries.is_empty());
        let capacity = entries.len();
        let h = value::hash(ctx, k)?;
        let mut index = (h as usize) % capacity;
        let mut tombstone: Option<usize> = None;
        loop {
            let entry = &entries[index];
            if entry.is_empty() {
                return Ok(tombstone.unwrap_or(index));
            } else if entry.is_tombstone() {
                if tombstone.is_none() {
                    tombstone = Some(index);
                }
            } else if value::equals(ctx, entry.key, k)? {
                return Ok(index);
            }
            index = (index + 1) % capacity;
        }
    }

    /// `adjust_capacity` (spec §4.4): rehash into a fresh array of the
    /// given capacity, dropping tombstones and recomputing `count` as the
    /// live-entry count.
    fn adjust_capacity(&mut self, ctx: &mut dyn VmContext, new_capacity: usize) -> Result<(), CoreError> {
        let mut new_entries = vec![Entry::empty(); new_capacity];
        let mut new_count = 0;
        for entry in self.entries.iter().filter(|e| e.is_live()) {
            let idx = Table::find_entry(&new_entries, ctx, entry.key)?;
            new_entries[idx] = *entry;
            new_count += 1;
        }
        log::debug!(
            "table: rehashed {} live entries into capacity {}, dropping tombstones",
            new_count,
            new_capacity
        );
        self.entries = new_entries;
        self.count = new_count;
        Ok(())
    }

    /// `set` (spec §4.4). Returns whether the slot was newly occupied
    /// (`new_key`), i.e. false if it overwrote a live entry.
    pub fn set(
        &mut self,
        ctx: &mut dyn VmContext,
        key: Value,
        val: Value,
    ) -> Result<bool, CoreError> {
        if self.count + 1 > ((self.capacity() as f64) * MAX_LOAD) as usize {
            let new_cap = grown_capacity(self.capacity());
            log::trace!("table: growing {} -> {}", self.capacity(), new_cap);
            self.adjust_capacity(ctx, new_cap)?;
        }
        let idx = Table::find_entry(&self.entries, ctx, key)?;
        let entry = &mut self.entries[idx];
        let was_live = entry.is_live();
        let was_empty = entry.is_empty();
        entry.key = key;
        entry.value = val;
        if was_empty {
            self.count += 1;
        }
        Ok(!was_live)
    }

    /// `get` (spec §4.4).
    pub fn get(&self, ctx: &mut dyn VmContext, key: Value) -> Result<Option<Value>, CoreError> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let idx = Table::find_entry(&self.entries, ctx, key)?;
        let entry = &self.entries[idx];
        if entry.is_live() {
            Ok(Some(entry.value))
        } else {
            Ok(None)
        }
    }

    /// `get_fast` (spec §4.4): optimised lookup for an interned string
    /// whose `VALID_HASH` is known set. Probes using `hash` directly and
    /// compares keys by pointer identity — only valid when the producer
    /// interns strings, which is why this takes the hash rather than
    /// recomputing it.
    pub fn get_fast(&self, key: Value, hash: u32) -> Option<Value> {
        if self.entries.is_empty() {
            return None;
        }
        let capacity = self.entries.len();
        let mut index = (hash as usize) % capacity;
        loop {
            let entry = &self.entries[index];
            if entry.is_empty() {
                return None;
            }
            if entry.is_live() && Value::same_object(entry.key, key) {
                return Some(entry.value);
            }
            index = (index + 1) % capacity;
        }
    }

    /// `delete` (spec §4.4): converts a live slot into a tombstone;
    /// `count` is unchanged (the tombstone still occupies the probe
    /// chain).
    pub fn delete(&mut self, ctx: &mut dyn VmContext, key: Value) -> Result<bool, CoreError> {
        if self.entries.is_empty() {
            return Ok(false);
        }
        let idx = Table::find_entry(&self.entries, ctx, key)?;
        if !self.entries[idx].is_live() {
            return Ok(false);
        }
        self.entries[idx] = Entry::tombstone();
        Ok(true)
    }

    /// `add_all` (spec §4.4): copy every live entry of `self` into `to`.
    pub fn add_all(&self, ctx: &mut dyn VmContext, to: &mut Table) -> Result<(), CoreError> {
        for entry in self.entries.iter().filter(|e| e.is_live()) {
            to.set(ctx, entry.key, entry.value)?;
        }
        Ok(())
    }

    /// `find_string` (spec §4.4): the string-interning hook. Probes like
    /// `get`, but compares `(len, hash, bytes)` directly against each
    /// live string-keyed entry rather than calling back into `equals`, and
    /// stops at a truly empty slot (not a tombstone) — matching the
    /// source's probe that a tombstone might be hiding the string further
    /// down the chain.
    pub fn find_string(&self, bytes: &[u8], hash: u32) -> Option<Value> {
        if self.entries.is_empty() {
            return None;
        }
        let capacity = self.entries.len();
        let mut index = (hash as usize) % capacity;
        loop {
            let entry = &self.entries[index];
            if entry.is_empty() {
                return None;
            }
            if entry.is_live() {
                if let Some(s) = entry.key.as_fax_string() {
                    if s.len() == bytes.len()
                        && value::hash_of_string(s) == hash
                        && s.as_bytes() == bytes
                    {
                        return Some(entry.key);
                    }
                }
            }
            index = (index + 1) % capacity;
        }
    }
}
