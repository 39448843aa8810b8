//! Dependency graph over `FileId`s with a lazily computed transitive closure

use std::collections::HashSet;

use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::model::FileId;

/// One `(dependent, dependency)` pair packed into a single integer.
///
/// The dependent occupies the high 32 bits, the dependency the low 32 bits, so
/// every pair of non-negative `i32` ids has a distinct key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(u64);

impl EdgeKey {
    const SHIFT: u32 = 32;

    pub fn encode(dependent: FileId, dependency: FileId) -> Self {
        assert!(
            dependent.is_known() && dependency.is_known(),
            "cannot encode edge {dependent} -> {dependency}"
        );
        EdgeKey(((dependent.0 as u64) << Self::SHIFT) | dependency.0 as u64)
    }

    pub fn decode(self) -> (FileId, FileId) {
        let dependent = (self.0 >> Self::SHIFT) as i32;
        let dependency = (self.0 & u32::MAX as u64) as i32;
        (FileId(dependent), FileId(dependency))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Set of "depends on" edges between files.
///
/// Insertions only record the direct edge and flag the set as open; the
/// closure is computed on the first query that needs it.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: HashSet<EdgeKey>,
    needs_closure: bool,
    /// One past the largest id seen in any edge.
    bound: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` depends on `dependency`. Returns `true` if the
    /// edge was not present before.
    pub fn insert(&mut self, dependent: FileId, dependency: FileId) -> bool {
        let key = EdgeKey::encode(dependent, dependency);
        let added = self.edges.insert(key);
        if added {
            self.needs_closure = true;
            self.observe(dependent);
            self.observe(dependency);
            debug!("edge {} -> {} ({} edges)", dependent, dependency, self.edges.len());
        }
        added
    }

    fn observe(&mut self, id: FileId) {
        if let Some(idx) = id.index() {
            self.bound = self.bound.max(idx + 1);
        }
    }

    /// Membership test on the current edge set, closed or not.
    pub fn contains(&self, dependent: FileId, dependency: FileId) -> bool {
        if !dependent.is_known() || !dependency.is_known() {
            return false;
        }
        self.edges.contains(&EdgeKey::encode(dependent, dependency))
    }

    fn contains_idx(&self, dependent: usize, dependency: usize) -> bool {
        self.edges.contains(&EdgeKey::encode(
            FileId::from_index(dependent),
            FileId::from_index(dependency),
        ))
    }

    /// `true` when the edge set already equals its own transitive closure.
    pub fn is_closed(&self) -> bool {
        !self.needs_closure
    }

    /// Replace the edge set by its transitive closure if any edge was added
    /// since the last run. Returns whether a closure pass actually ran.
    ///
    /// Floyd–Warshall over the ids seen so far: O(n³) per pass, paid once per
    /// burst of insertions rather than per edge.
    pub fn close_transitively(&mut self) -> bool {
        if !self.needs_closure {
            return false;
        }
        let n = self.bound;
        let before = self.edges.len();
        for k in 0..n {
            for i in 0..n {
                if i == k || !self.contains_idx(i, k) {
                    continue;
                }
                for j in 0..n {
                    if i != j && self.contains_idx(k, j) && !self.contains_idx(i, j) {
                        self.edges.insert(EdgeKey::encode(
                            FileId::from_index(i),
                            FileId::from_index(j),
                        ));
                    }
                }
            }
        }
        self.needs_closure = false;
        debug!(
            "closed dependency graph over {} ids: {} -> {} edges",
            n,
            before,
            self.edges.len()
        );
        true
    }

    /// Every file that transitively depends on `id`, ascending.
    pub fn dependents_of(&mut self, id: FileId) -> Vec<FileId> {
        self.close_transitively();
        let mut out: Vec<FileId> = self
            .edges()
            .filter(|&(_, dependency)| dependency == id)
            .map(|(dependent, _)| dependent)
            .collect();
        out.sort();
        out
    }

    /// Every file `id` transitively depends on, ascending.
    pub fn dependencies_of(&mut self, id: FileId) -> Vec<FileId> {
        self.close_transitively();
        let mut out: Vec<FileId> = self
            .edges()
            .filter(|&(dependent, _)| dependent == id)
            .map(|(_, dependency)| dependency)
            .collect();
        out.sort();
        out
    }

    /// Decoded edges in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (FileId, FileId)> + '_ {
        self.edges.iter().map(|key| key.decode())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Drop every edge. The empty set is trivially closed.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.needs_closure = false;
        self.bound = 0;
    }

    /// Current edge relation as a petgraph map, `dependent -> dependency`.
    pub fn to_graph_map(&self) -> DiGraphMap<FileId, ()> {
        let mut map = DiGraphMap::with_capacity(self.bound, self.edges.len());
        for (dependent, dependency) in self.edges() {
            map.add_edge(dependent, dependency, ());
        }
        map
    }
}
