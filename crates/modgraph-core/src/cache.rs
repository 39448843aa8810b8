//! Compile-time value stores used by metaprogramming facilities
//!
//! Three independent families of named stores: append-only sequences,
//! counters and key-ordered tables. They live for the whole session and are
//! only emptied by `GraphSession::reset`.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::error::CacheError;

pub type CacheValue = Value;

#[derive(Debug, Default)]
pub struct CompileTimeCache {
    sequences: HashMap<String, Vec<CacheValue>>,
    counters: HashMap<String, i64>,
    tables: HashMap<String, BTreeMap<String, CacheValue>>,
}

impl CompileTimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Sequences ───────────────────────────────────────────

    pub fn seq_add(&mut self, name: &str, value: CacheValue) {
        self.sequences.entry(name.to_string()).or_default().push(value);
    }

    /// Contents of sequence `name`; empty if it was never written.
    pub fn seq(&self, name: &str) -> &[CacheValue] {
        self.sequences.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn seq_len(&self, name: &str) -> usize {
        self.seq(name).len()
    }

    // ── Counters ────────────────────────────────────────────

    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Add `by` to counter `name` and return the new value. On overflow the
    /// counter keeps its old value.
    pub fn inc(&mut self, name: &str, by: i64) -> Result<i64, CacheError> {
        let counter = self.counters.entry(name.to_string()).or_insert(0);
        *counter = counter
            .checked_add(by)
            .ok_or_else(|| CacheError::CounterOverflow {
                counter: name.to_string(),
            })?;
        Ok(*counter)
    }

    // ── Tables ──────────────────────────────────────────────

    /// Insert `key` into table `name`. Keys are write-once.
    pub fn table_put(&mut self, name: &str, key: &str, value: CacheValue) -> Result<(), CacheError> {
        let table = self.tables.entry(name.to_string()).or_default();
        if table.contains_key(key) {
            return Err(CacheError::DuplicateKey {
                table: name.to_string(),
                key: key.to_string(),
            });
        }
        table.insert(key.to_string(), value);
        Ok(())
    }

    pub fn table_get(&self, name: &str, key: &str) -> Option<&CacheValue> {
        self.tables.get(name).and_then(|table| table.get(key))
    }

    pub fn table_len(&self, name: &str) -> usize {
        self.tables.get(name).map_or(0, BTreeMap::len)
    }

    /// Entries of table `name` in key order.
    pub fn table_iter(&self, name: &str) -> impl Iterator<Item = (&str, &CacheValue)> {
        self.tables
            .get(name)
            .into_iter()
            .flat_map(|table| table.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty() && self.counters.is_empty() && self.tables.is_empty()
    }

    pub fn clear(&mut self) {
        self.sequences.clear();
        self.counters.clear();
        self.tables.clear();
    }
}
