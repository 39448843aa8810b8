//! Capabilities the surrounding driver plugs into a session

use crate::error::HookError;
use crate::model::{FileId, IncludeContent, ModuleEntity};

/// Driver-supplied callbacks.
///
/// The session never calls the loaders itself; they are stored here so every
/// compiler stage reaches the same implementation through the session. Each
/// method has a do-nothing default.
pub trait SessionHooks: Send {
    /// Materialize module `file`, imported from `from`.
    fn load_module(&mut self, from: FileId, file: FileId) -> Result<Option<ModuleEntity>, HookError> {
        let _ = (from, file);
        Ok(None)
    }

    /// Read include file `file`, included from `from`.
    fn load_include(&mut self, from: FileId, file: FileId) -> Result<Option<IncludeContent>, HookError> {
        let _ = (from, file);
        Ok(None)
    }

    /// Called once per compiled top-level statement.
    fn record_statement(&mut self, module: FileId, statement: &str) {
        let _ = (module, statement);
    }

    /// Polled by the driver between compilation steps.
    fn should_stop_compiling(&self) -> bool {
        false
    }
}

/// Hooks with every default in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl SessionHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mut hooks = NoHooks;
        assert!(!hooks.should_stop_compiling());
        assert!(hooks.load_module(FileId(0), FileId(1)).unwrap().is_none());
        assert!(hooks.load_include(FileId(0), FileId(2)).unwrap().is_none());
        hooks.record_statement(FileId(0), "discard");
    }
}
