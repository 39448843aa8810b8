//! Package symbol table

use crate::model::FileId;
use dashmap::DashMap;

/// Maps qualified names (`package.module`) to the module that defines them,
/// grouped by package. Owned by the session and mutated only through it.
pub struct PackageSymbols {
    /// qualified name -> (defining module, package)
    symbols: DashMap<String, (FileId, String)>,
    /// package name -> qualified names registered under it
    packages: DashMap<String, Vec<String>>,
}

impl PackageSymbols {
    pub fn new() -> Self {
        PackageSymbols {
            symbols: DashMap::new(),
            packages: DashMap::new(),
        }
    }

    /// Insert a symbol under `package`. A name already registered under
    /// another package moves to `package`.
    pub fn insert(&mut self, qualified_name: String, module: FileId, package: String) {
        let previous = self
            .symbols
            .insert(qualified_name.clone(), (module, package.clone()));
        match previous {
            Some((_, old)) if old == package => {}
            Some((_, old)) => {
                if let Some(mut names) = self.packages.get_mut(&old) {
                    names.retain(|name| name != &qualified_name);
                }
                self.packages.remove_if(&old, |_, names| names.is_empty());
                self.packages.entry(package).or_default().push(qualified_name);
            }
            None => self.packages.entry(package).or_default().push(qualified_name),
        }
    }

    /// Look up a symbol by qualified name.
    pub fn lookup(&self, qualified_name: &str) -> Option<FileId> {
        self.symbols.get(qualified_name).map(|r| r.value().0)
    }

    /// Package a qualified name is registered under.
    pub fn package_of(&self, qualified_name: &str) -> Option<String> {
        self.symbols.get(qualified_name).map(|r| r.value().1.clone())
    }

    /// Modules registered under a package, in insertion order.
    pub fn symbols_in_package(&self, package: &str) -> Vec<FileId> {
        self.packages
            .get(package)
            .map(|r| {
                r.value()
                    .iter()
                    .filter_map(|name| self.symbols.get(name).map(|n| n.value().0))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drop a package and every symbol under it.
    pub fn remove_package(&mut self, package: &str) {
        if let Some((_, names)) = self.packages.remove(package) {
            for name in names {
                self.symbols.remove(&name);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
        self.packages.clear();
    }
}

impl Default for PackageSymbols {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PackageSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageSymbols")
            .field("symbols", &self.symbols.len())
            .field("packages", &self.packages.len())
            .finish()
    }
}
