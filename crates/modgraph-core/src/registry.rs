//! Module registry: `FileId` → loaded module

use crate::model::{FileId, ModuleEntity};

/// Dense table of loaded modules indexed by `FileId`.
///
/// Empty slots are include files or modules that have not been compiled yet.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    slots: Vec<Option<ModuleEntity>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished module in the slot named by its own id, growing the
    /// table as needed. Returns the module previously in that slot.
    pub fn register(&mut self, module: ModuleEntity) -> Option<ModuleEntity> {
        let idx = module
            .id
            .index()
            .unwrap_or_else(|| panic!("cannot register module `{}` with id {}", module.name, module.id));
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx].replace(module)
    }

    pub fn unregister(&mut self, id: FileId) -> Option<ModuleEntity> {
        id.index()
            .and_then(|idx| self.slots.get_mut(idx))
            .and_then(Option::take)
    }

    /// The module at `id`, or `None` for absent slots and out-of-range ids.
    pub fn get(&self, id: FileId) -> Option<&ModuleEntity> {
        id.index()
            .and_then(|idx| self.slots.get(idx))
            .and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: FileId) -> Option<&mut ModuleEntity> {
        id.index()
            .and_then(|idx| self.slots.get_mut(idx))
            .and_then(Option::as_mut)
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.get(id).is_some()
    }

    /// Number of slots, including empty ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Loaded modules in id order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleEntity> {
        self.slots.iter().flatten()
    }

    pub fn modules_mut(&mut self) -> impl Iterator<Item = &mut ModuleEntity> {
        self.slots.iter_mut().flatten()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
