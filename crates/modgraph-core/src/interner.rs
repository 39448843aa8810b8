//! Path interning: every source file gets a dense, stable `FileId`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::GraphError;
use crate::model::FileId;

/// Bidirectional path ⇄ `FileId` table. Survives `GraphSession::reset`.
#[derive(Debug, Default)]
pub struct FileInterner {
    ids: HashMap<PathBuf, FileId>,
    paths: Vec<PathBuf>,
}

impl FileInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `path`, assigning the next free one on first sight.
    pub fn intern(&mut self, path: impl AsRef<Path>) -> Result<FileId, GraphError> {
        let path = path.as_ref();
        if let Some(id) = self.ids.get(path) {
            return Ok(*id);
        }
        if self.paths.len() > FileId::MAX.0 as usize {
            return Err(GraphError::FileLimitExceeded(path.to_path_buf()));
        }
        let id = FileId::from_index(self.paths.len());
        self.paths.push(path.to_path_buf());
        self.ids.insert(path.to_path_buf(), id);
        Ok(id)
    }

    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.ids.get(path).copied()
    }

    pub fn path(&self, id: FileId) -> Option<&Path> {
        id.index()
            .and_then(|idx| self.paths.get(idx))
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &Path)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(idx, path)| (FileId::from_index(idx), path.as_path()))
    }
}
