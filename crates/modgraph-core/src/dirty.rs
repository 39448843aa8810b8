//! Dirty propagation: which modules need recompiling after a file changed

use tracing::debug;

use crate::model::FileId;
use crate::session::GraphSession;

impl GraphSession {
    /// Flag the module at `id` for recompilation. Include files and modules
    /// that are not loaded are ignored.
    pub fn mark_dirty(&mut self, id: FileId) {
        if let Some(module) = self.registry.get_mut(id) {
            module.set_dirty(true);
        }
    }

    /// Flag every loaded module that transitively depends on `id`.
    ///
    /// The closed edge set already encodes every indirect path, so this is a
    /// single scan over the registry with one membership test per module.
    /// Returns the ids marked, ascending.
    pub fn mark_clients_dirty(&mut self, id: FileId) -> Vec<FileId> {
        self.graph.close_transitively();
        let mut marked = Vec::new();
        for module in self.registry.modules_mut() {
            if self.graph.contains(module.id, id) {
                module.set_dirty(true);
                marked.push(module.id);
            }
        }
        debug!("{} clients of {} marked dirty", marked.len(), id);
        marked
    }

    /// Whether the module at `id` needs recompiling. Dirtiness is only
    /// tracked in suggest mode; batch sessions always answer `false`.
    pub fn is_dirty(&self, id: FileId) -> bool {
        self.is_suggest_mode()
            && self
                .registry
                .get(id)
                .is_some_and(|module| module.is_marked_dirty())
    }

    /// Dirty → clean, once the driver has recompiled the module.
    pub fn clear_dirty(&mut self, id: FileId) {
        if let Some(module) = self.registry.get_mut(id) {
            module.set_dirty(false);
        }
    }

    /// Every module currently marked dirty, ascending.
    pub fn dirty_modules(&self) -> Vec<FileId> {
        if !self.is_suggest_mode() {
            return Vec::new();
        }
        self.registry
            .modules()
            .filter(|module| module.is_marked_dirty())
            .map(|module| module.id)
            .collect()
    }

    /// React to a content change of `file`: the module it belongs to and
    /// every client of either becomes dirty. Returns the modules touched,
    /// ascending and deduplicated; always empty outside suggest mode.
    pub fn invalidate(&mut self, file: FileId) -> Vec<FileId> {
        if !self.is_suggest_mode() {
            return Vec::new();
        }
        let owner = self.parent_module(file);
        let mut touched = Vec::new();
        if owner.is_known() {
            self.mark_dirty(owner);
            if self.registry.contains(owner) {
                touched.push(owner);
            }
            touched.extend(self.mark_clients_dirty(owner));
        }
        if file != owner {
            touched.extend(self.mark_clients_dirty(file));
        }
        touched.sort();
        touched.dedup();
        debug!("{} changed: {} modules dirty", file, touched.len());
        touched
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SessionConfig;
    use crate::model::{FileId, ModuleEntity};
    use crate::session::GraphSession;

    const A: FileId = FileId(0);
    const B: FileId = FileId(1);
    const C: FileId = FileId(2);
    const D: FileId = FileId(3);

    fn session_with(ids: &[FileId]) -> (GraphSession, Vec<ModuleEntity>) {
        let mut session = GraphSession::new(SessionConfig::suggest());
        let modules: Vec<ModuleEntity> = ids
            .iter()
            .map(|&id| ModuleEntity::new(id, format!("m{}", id.0)))
            .collect();
        for module in &modules {
            session.register_module(module.clone());
        }
        (session, modules)
    }

    #[test]
    fn test_chain_scenario() {
        let (mut session, modules) = session_with(&[A, B, C, D]);
        session.add_dep(&modules[1], A);
        session.add_dep(&modules[2], B);

        session.mark_dirty(A);
        let marked = session.mark_clients_dirty(A);

        assert_eq!(marked, vec![B, C]);
        assert!(session.is_dirty(A));
        assert!(session.is_dirty(B));
        assert!(session.is_dirty(C));
        assert!(!session.is_dirty(D));
    }

    #[test]
    fn test_mark_dirty_absent_is_noop() {
        let (mut session, _) = session_with(&[A]);
        session.mark_dirty(FileId(42));
        session.mark_dirty(FileId::UNKNOWN);
        assert!(session.dirty_modules().is_empty());
    }

    #[test]
    fn test_batch_mode_never_reports_dirty() {
        let mut session = GraphSession::new(SessionConfig::default());
        session.register_module(ModuleEntity::new(A, "a"));
        session.mark_dirty(A);

        assert!(!session.is_dirty(A));
        assert!(session.dirty_modules().is_empty());
        assert!(session.get_module(A).unwrap().is_marked_dirty());
    }

    #[test]
    fn test_clear_dirty() {
        let (mut session, _) = session_with(&[A]);
        session.mark_dirty(A);
        session.clear_dirty(A);
        assert!(!session.is_dirty(A));
    }

    #[test]
    fn test_closure_recomputed_after_new_edges() {
        let (mut session, modules) = session_with(&[A, B, C]);
        session.add_dep(&modules[1], A);
        assert_eq!(session.mark_clients_dirty(A), vec![B]);

        session.clear_dirty(B);
        session.add_dep(&modules[2], B);
        assert_eq!(session.mark_clients_dirty(A), vec![B, C]);
    }

    #[test]
    fn test_invalidate_include_file() {
        let (mut session, modules) = session_with(&[A, B]);
        let include = FileId(7);
        session.add_include_dep(A, include);
        session.add_dep(&modules[1], A);

        let touched = session.invalidate(include);
        assert_eq!(touched, vec![A, B]);
        assert_eq!(session.dirty_modules(), vec![A, B]);
    }

    #[test]
    fn test_invalidate_in_batch_mode_touches_nothing() {
        let mut session = GraphSession::new(SessionConfig::default());
        let a = ModuleEntity::new(A, "a");
        let b = ModuleEntity::new(B, "b");
        session.register_module(a);
        session.register_module(b.clone());
        session.add_dep(&b, A);

        assert!(session.invalidate(A).is_empty());
        assert!(!session.get_module(A).unwrap().is_marked_dirty());
        assert!(session.dirty_modules().is_empty());
    }

    #[test]
    fn test_invalidate_unknown_file() {
        let (mut session, _) = session_with(&[A]);
        assert!(session.invalidate(FileId(9)).is_empty());
        assert!(session.dirty_modules().is_empty());
    }
}
