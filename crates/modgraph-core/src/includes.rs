//! Include file → owning module

use std::collections::HashMap;

use crate::model::FileId;

/// First-writer-wins ownership of include files.
#[derive(Debug, Default)]
pub struct IncludeOwnership {
    owners: HashMap<FileId, FileId>,
}

impl IncludeOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `module` as owner of `include` unless an owner already exists.
    /// Returns the owner in effect afterwards.
    pub fn record(&mut self, include: FileId, module: FileId) -> FileId {
        *self.owners.entry(include).or_insert(module)
    }

    pub fn owner(&self, include: FileId) -> Option<FileId> {
        self.owners.get(&include).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_owner_wins() {
        let mut owners = IncludeOwnership::new();
        assert_eq!(owners.record(FileId(9), FileId(1)), FileId(1));
        assert_eq!(owners.record(FileId(9), FileId(2)), FileId(1));
        assert_eq!(owners.owner(FileId(9)), Some(FileId(1)));
        assert_eq!(owners.owner(FileId(8)), None);
    }
}
