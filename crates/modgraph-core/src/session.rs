//! The graph session: one long-lived context owning every table

use std::path::Path;

use tracing::{debug, info};

use crate::cache::CompileTimeCache;
use crate::config::SessionConfig;
use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::hooks::{NoHooks, SessionHooks};
use crate::includes::IncludeOwnership;
use crate::interner::FileInterner;
use crate::model::{EdgeKind, FileId, ModuleEntity};
use crate::registry::ModuleRegistry;
use crate::store::{IncrementalStore, NullStore};
use crate::symbols::PackageSymbols;

/// Chain of modules currently being imported, innermost last.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStack {
    frames: Vec<FileId>,
}

impl ImportStack {
    pub fn push(&mut self, id: FileId) {
        self.frames.push(id);
    }

    pub fn pop(&mut self) -> Option<FileId> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<FileId> {
        self.frames.last().copied()
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.frames.contains(&id)
    }

    pub fn as_slice(&self) -> &[FileId] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

/// Compiler-wide state shared by every stage of one process.
///
/// All mutation of the registry, the edge set and the dirty markers goes
/// through methods on this type. Dirty propagation lives in `dirty.rs`.
pub struct GraphSession {
    pub(crate) config: SessionConfig,
    pub(crate) interner: FileInterner,
    pub(crate) registry: ModuleRegistry,
    pub(crate) includes: IncludeOwnership,
    pub(crate) graph: DependencyGraph,
    import_stack: ImportStack,
    owners: Vec<FileId>,
    package_symbols: PackageSymbols,
    cache: CompileTimeCache,
    store: Box<dyn IncrementalStore>,
    hooks: Box<dyn SessionHooks>,
}

impl std::fmt::Debug for GraphSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSession")
            .field("mode", &self.config.mode)
            .field("files", &self.interner.len())
            .field("modules", &self.registry.modules().count())
            .field("edges", &self.graph.len())
            .finish()
    }
}

impl GraphSession {
    pub fn new(config: SessionConfig) -> Self {
        GraphSession {
            config,
            interner: FileInterner::new(),
            registry: ModuleRegistry::new(),
            includes: IncludeOwnership::new(),
            graph: DependencyGraph::new(),
            import_stack: ImportStack::default(),
            owners: Vec::new(),
            package_symbols: PackageSymbols::new(),
            cache: CompileTimeCache::new(),
            store: Box::new(NullStore),
            hooks: Box::new(NoHooks),
        }
    }

    /// Forward dependencies to `store`.
    pub fn with_store(mut self, store: impl IncrementalStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Install driver callbacks.
    pub fn with_hooks(mut self, hooks: impl SessionHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_suggest_mode(&self) -> bool {
        self.config.mode.is_suggest()
    }

    // ── Identity layer ──────────────────────────────────────

    pub fn intern(&mut self, path: impl AsRef<Path>) -> Result<FileId, GraphError> {
        self.interner.intern(path)
    }

    pub fn file_id(&self, path: &Path) -> Result<FileId, GraphError> {
        self.interner
            .lookup(path)
            .ok_or_else(|| GraphError::UnknownFile(path.to_path_buf()))
    }

    pub fn interner(&self) -> &FileInterner {
        &self.interner
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Record a finished module.
    pub fn register_module(&mut self, module: ModuleEntity) -> Option<ModuleEntity> {
        debug!("registering module `{}` as {}", module.name, module.id);
        self.registry.register(module)
    }

    /// The loaded module at `id`; `None` for include files, modules not yet
    /// loaded, and ids outside the registry.
    pub fn get_module(&self, id: FileId) -> Option<&ModuleEntity> {
        self.registry.get(id)
    }

    /// The module a file belongs to for dependency purposes: `id` itself for a
    /// loaded module, the recorded owner for an include file, otherwise
    /// `FileId::UNKNOWN`.
    pub fn parent_module(&self, id: FileId) -> FileId {
        if self.registry.contains(id) {
            id
        } else {
            self.includes.owner(id).unwrap_or(FileId::UNKNOWN)
        }
    }

    // ── Dependency recording ────────────────────────────────

    /// Record that `module` textually includes `include`.
    ///
    /// Always forwarded to the store; the first includer becomes the owner.
    pub fn add_include_dep(&mut self, module: FileId, include: FileId) {
        self.store.record_edge(module, include, EdgeKind::Include);
        let owner = self.includes.record(include, module);
        if owner != module {
            debug!("{} already owned by {}, ignoring includer {}", include, owner, module);
        }
    }

    /// Record that `module` depends on `dependency`.
    ///
    /// Always forwarded to the store. The in-memory edge set is only kept in
    /// suggest mode; batch builds recompile everything and skip it.
    ///
    /// # Panics
    ///
    /// If `module` was elaborated from a different file than the slot it
    /// claims, or `dependency` is unknown. Both mean the calling stage is
    /// broken; nothing reaches the store.
    pub fn add_dep(&mut self, module: &ModuleEntity, dependency: FileId) {
        assert_eq!(
            module.id, module.origin,
            "module `{}` registered as {} but elaborated from {}",
            module.name, module.id, module.origin
        );
        assert!(
            dependency.is_known(),
            "module `{}` depends on an unknown file",
            module.name
        );
        self.store.record_edge(module.id, dependency, EdgeKind::Direct);
        if self.is_suggest_mode() {
            self.graph.insert(module.id, dependency);
        }
    }

    /// Close the edge set if it changed since the last query.
    pub fn close_transitively(&mut self) -> bool {
        self.graph.close_transitively()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Files that transitively depend on `id`.
    pub fn dependents_of(&mut self, id: FileId) -> Vec<FileId> {
        self.graph.dependents_of(id)
    }

    /// Files `id` transitively depends on.
    pub fn dependencies_of(&mut self, id: FileId) -> Vec<FileId> {
        self.graph.dependencies_of(id)
    }

    // ── Import and owner stacks ─────────────────────────────

    pub fn import_stack(&self) -> &ImportStack {
        &self.import_stack
    }

    pub fn import_stack_mut(&mut self) -> &mut ImportStack {
        &mut self.import_stack
    }

    pub fn push_owner(&mut self, owner: FileId) {
        self.owners.push(owner);
    }

    pub fn pop_owner(&mut self) -> Option<FileId> {
        self.owners.pop()
    }

    pub fn current_owner(&self) -> Option<FileId> {
        self.owners.last().copied()
    }

    // ── Ancillary tables ────────────────────────────────────

    pub fn package_symbols(&self) -> &PackageSymbols {
        &self.package_symbols
    }

    pub fn package_symbols_mut(&mut self) -> &mut PackageSymbols {
        &mut self.package_symbols
    }

    pub fn cache(&self) -> &CompileTimeCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CompileTimeCache {
        &mut self.cache
    }

    // ── Hooks ───────────────────────────────────────────────

    pub fn hooks_mut(&mut self) -> &mut dyn SessionHooks {
        self.hooks.as_mut()
    }

    /// Hand a compiled statement to the recording hook when tracing is on.
    pub fn record_statement(&mut self, module: FileId, statement: &str) {
        if self.config.trace_statements {
            self.hooks.record_statement(module, statement);
        }
    }

    pub fn should_stop_compiling(&self) -> bool {
        self.hooks.should_stop_compiling()
    }

    /// Forget everything about the current program so a fresh full analysis
    /// can start. Interned file ids, the store, the hooks and the config
    /// survive.
    pub fn reset(&mut self) {
        info!(
            "resetting session: {} modules, {} edges",
            self.registry.modules().count(),
            self.graph.len()
        );
        self.registry.clear();
        self.includes.clear();
        self.graph.clear();
        self.import_stack.clear();
        self.owners.clear();
        self.package_symbols.clear();
        self.cache.clear();
    }
}
