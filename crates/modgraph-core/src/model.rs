//! Core identifiers and entities shared by every part of the graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense identifier of one source file (a module or an include file).
///
/// Ids are handed out by [`crate::FileInterner`] starting at zero and stay
/// stable for the lifetime of a session. Negative values never name a file;
/// [`FileId::UNKNOWN`] is the sentinel for "no such file".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub i32);

impl FileId {
    pub const UNKNOWN: FileId = FileId(-1);

    /// Largest id the interner will ever hand out.
    pub const MAX: FileId = FileId(i32::MAX);

    pub fn is_known(self) -> bool {
        self.0 >= 0
    }

    /// Slot index for dense tables, `None` for negative ids.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    pub(crate) fn from_index(index: usize) -> Self {
        assert!(index <= i32::MAX as usize, "file index {index} exceeds FileId range");
        FileId(index as i32)
    }
}

impl Default for FileId {
    fn default() -> Self {
        FileId::UNKNOWN
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#unknown")
        }
    }
}

/// A compiled module as seen by the graph: its identity and its dirty marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntity {
    /// Registry slot of the module.
    pub id: FileId,
    /// File the module was elaborated from. Equal to `id` for any module the
    /// driver built correctly.
    pub origin: FileId,
    pub name: String,
    dirty: bool,
}

impl ModuleEntity {
    pub fn new(id: FileId, name: impl Into<String>) -> Self {
        ModuleEntity {
            id,
            origin: id,
            name: name.into(),
            dirty: false,
        }
    }

    pub fn with_origin(mut self, origin: FileId) -> Self {
        self.origin = origin;
        self
    }

    /// Raw marker, independent of the session mode.
    pub fn is_marked_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

/// How a dependency edge came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `import`-style dependency on another module.
    Direct,
    /// Textual inclusion of another file.
    Include,
}

/// Operating mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    /// Whole-program build; the in-memory graph is not maintained.
    #[default]
    Batch,
    /// Editing-assistant mode; edges, closure and dirty markers are live.
    Suggest,
}

impl CompileMode {
    pub fn is_suggest(self) -> bool {
        self == CompileMode::Suggest
    }
}

/// Content handed back by an include loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeContent {
    pub file: FileId,
    pub source: String,
}
