//! Modgraph Core: module dependency graph, include ownership and dirty propagation

pub mod model;
pub mod error;
pub mod interner;
pub mod registry;
pub mod includes;
pub mod graph;
pub mod dirty;
pub mod session;
pub mod cache;
pub mod symbols;
pub mod hooks;
pub mod store;
pub mod config;


#[cfg(test)]
pub mod test_utils;

pub use model::{FileId, ModuleEntity, EdgeKind, CompileMode, IncludeContent};
pub use error::{GraphError, CacheError, ConfigError, HookError};
pub use interner::FileInterner;
pub use registry::ModuleRegistry;
pub use includes::IncludeOwnership;
pub use graph::{DependencyGraph, EdgeKey};
pub use session::{GraphSession, ImportStack};
pub use cache::{CompileTimeCache, CacheValue};
pub use symbols::PackageSymbols;
pub use hooks::{SessionHooks, NoHooks};
pub use store::{IncrementalStore, NullStore, MemoryStore, EdgeRecord};
pub use config::SessionConfig;
