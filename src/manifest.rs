//! Project manifest: which files are modules and what they import or include

use anyhow::Context;
use modgraph_core::{CompileMode, GraphSession, ModuleEntity, SessionConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default manifest file name, looked up under the project root.
pub const MANIFEST_FILE: &str = "modgraph.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default = "SessionConfig::suggest")]
    pub session: SessionConfig,
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleEntry {
    pub path: PathBuf,
    pub name: Option<String>,
    #[serde(default)]
    pub imports: Vec<PathBuf>,
    #[serde(default)]
    pub includes: Vec<PathBuf>,
}

impl ModuleEntry {
    fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }
}

impl Manifest {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid manifest")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Build a session holding every module of the manifest, with paths
    /// interned relative to `root`.
    ///
    /// Modules are interned and registered in declaration order before any
    /// edge is added. An include also counts as a direct dependency of its
    /// includer, so editing it dirties the includer's clients.
    pub fn build_session(&self, root: &Path) -> anyhow::Result<GraphSession> {
        if self.session.mode == CompileMode::Batch {
            tracing::warn!("manifest selects batch mode; no dependency graph will be kept");
        }
        let mut session = GraphSession::new(self.session.clone());

        let mut entities = Vec::with_capacity(self.modules.len());
        for entry in &self.modules {
            let id = session.intern(root.join(&entry.path))?;
            let module = ModuleEntity::new(id, entry.display_name());
            session.register_module(module.clone());
            entities.push(module);
        }

        for (entry, module) in self.modules.iter().zip(&entities) {
            for import in &entry.imports {
                let dependency = session.intern(root.join(import))?;
                session.add_dep(module, dependency);
            }
            for include in &entry.includes {
                let file = session.intern(root.join(include))?;
                session.add_include_dep(module.id, file);
                session.add_dep(module, file);
            }
        }

        tracing::info!(
            "Loaded {} modules, {} files",
            entities.len(),
            session.interner().len()
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modgraph_core::FileId;

    const SAMPLE: &str = r#"
[[module]]
path = "src/app.nim"
imports = ["src/util.nim"]

[[module]]
path = "src/util.nim"
name = "utilities"
includes = ["src/util_impl.inc"]
"#;

    #[test]
    fn test_parse_defaults_to_suggest() {
        let manifest = Manifest::from_toml_str(SAMPLE).unwrap();
        assert_eq!(manifest.session.mode, CompileMode::Suggest);
        assert_eq!(manifest.modules.len(), 2);
        assert_eq!(manifest.modules[1].display_name(), "utilities");
        assert_eq!(manifest.modules[0].display_name(), "app");
    }

    #[test]
    fn test_build_session() {
        let manifest = Manifest::from_toml_str(SAMPLE).unwrap();
        let root = Path::new("/project");
        let mut session = manifest.build_session(root).unwrap();

        let app = session.file_id(&root.join("src/app.nim")).unwrap();
        let util = session.file_id(&root.join("src/util.nim")).unwrap();
        let inc = session.file_id(&root.join("src/util_impl.inc")).unwrap();

        assert_eq!((app, util, inc), (FileId(0), FileId(1), FileId(2)));
        assert_eq!(session.parent_module(inc), util);
        assert_eq!(session.dependents_of(inc), vec![app, util]);
    }

    #[test]
    fn test_batch_manifest_keeps_no_edges() {
        let manifest = Manifest::from_toml_str(&format!("[session]\nmode = \"batch\"\n{SAMPLE}")).unwrap();
        let session = manifest.build_session(Path::new("/project")).unwrap();
        assert!(session.graph().is_empty());
        assert_eq!(session.registry().modules().count(), 2);
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(Manifest::from_toml_str("[[module]]\nimports = 3").is_err());
    }
}
