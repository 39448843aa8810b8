//! Error types

use std::path::PathBuf;

use thiserror::Error;

use crate::model::FileId;

/// Errors raised while building the graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Every non-negative `i32` has been handed out.
    #[error("file limit exceeded: cannot intern {0}")]
    FileLimitExceeded(PathBuf),

    /// A path was never interned.
    #[error("unknown file: {0}")]
    UnknownFile(PathBuf),
}

/// Errors from the compile-time cache stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("key `{key}` already present in cache table `{table}`")]
    DuplicateKey { table: String, key: String },

    #[error("cache counter `{counter}` overflowed")]
    CounterOverflow { counter: String },
}

/// Errors loading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors reported by loader hooks.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to load {file}: {reason}")]
    Load { file: FileId, reason: String },
}
