//! Session configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::CompileMode;

/// Settings fixed for the lifetime of a session; `reset` keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: CompileMode,
    /// Forward compiled statements to `SessionHooks::record_statement`.
    pub trace_statements: bool,
}

impl SessionConfig {
    pub fn suggest() -> Self {
        SessionConfig {
            mode: CompileMode::Suggest,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
