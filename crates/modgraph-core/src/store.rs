//! Persistent incremental store interface
//!
//! Every dependency the session learns about is forwarded here, whatever the
//! compile mode, so on-disk incremental builds stay correct across restarts.
//! The storage format belongs entirely to the implementation.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::model::{EdgeKind, FileId};

/// One forwarded dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub dependent: FileId,
    pub dependency: FileId,
    pub kind: EdgeKind,
}

/// Sink for dependency edges that outlive the process.
pub trait IncrementalStore: Send {
    fn record_edge(&mut self, dependent: FileId, dependency: FileId, kind: EdgeKind);
}

/// Store that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl IncrementalStore for NullStore {
    fn record_edge(&mut self, _dependent: FileId, _dependency: FileId, _kind: EdgeKind) {}
}

/// In-memory recorder. Clones share the same log, so a caller can keep a
/// handle while the session owns another.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<EdgeRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in arrival order.
    pub fn records(&self) -> Vec<EdgeRecord> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IncrementalStore for MemoryStore {
    fn record_edge(&mut self, dependent: FileId, dependency: FileId, kind: EdgeKind) {
        let record = EdgeRecord {
            dependent,
            dependency,
            kind,
        };
        match self.records.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shares_log() {
        let handle = MemoryStore::new();
        let mut owned = handle.clone();
        owned.record_edge(FileId(1), FileId(0), EdgeKind::Direct);
        owned.record_edge(FileId(1), FileId(2), EdgeKind::Include);

        let records = handle.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].kind, EdgeKind::Include);
    }

    #[test]
    fn test_edge_record_serialization() {
        let record = EdgeRecord {
            dependent: FileId(3),
            dependency: FileId(1),
            kind: EdgeKind::Include,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"dependent":3,"dependency":1,"kind":"include"}"#);
    }
}
