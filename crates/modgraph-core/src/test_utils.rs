//! Test utilities for Modgraph

use std::collections::{HashSet, VecDeque};
use std::fs;

use proptest::prelude::*;
use tempfile::TempDir;

use crate::config::SessionConfig;
use crate::model::{FileId, ModuleEntity};
use crate::session::GraphSession;

/// Random graph over `2..=max_nodes` ids: `(nodes, edges)` with no self
/// edges. Cycles are allowed.
pub fn arb_graph(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2..=max_nodes).prop_flat_map(|nodes| {
        let edge = (0..nodes, 0..nodes).prop_filter("self edge", |(from, to)| from != to);
        (Just(nodes), prop::collection::vec(edge, 0..nodes * 2))
    })
}

/// Like [`arb_graph`], but every edge points from a higher id to a lower one.
pub fn arb_dag(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    arb_graph(max_nodes).prop_map(|(nodes, edges)| {
        let edges = edges
            .into_iter()
            .map(|(a, b)| (a.max(b), a.min(b)))
            .collect();
        (nodes, edges)
    })
}

/// Every node reachable from `start` over at least one edge.
pub fn reachable_from(edges: &[(usize, usize)], start: usize) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<usize> = edges
        .iter()
        .filter(|(from, _)| *from == start)
        .map(|(_, to)| *to)
        .collect();
    while let Some(node) = queue.pop_front() {
        if seen.insert(node) {
            queue.extend(edges.iter().filter(|(from, _)| *from == node).map(|(_, to)| *to));
        }
    }
    seen
}

/// Every node from which `target` is reachable over at least one edge.
pub fn ancestors_of(edges: &[(usize, usize)], target: usize) -> HashSet<usize> {
    let reversed: Vec<(usize, usize)> = edges.iter().map(|&(a, b)| (b, a)).collect();
    reachable_from(&reversed, target)
}

/// Suggest-mode session with modules `0..count` registered.
pub fn suggest_session(count: usize) -> (GraphSession, Vec<ModuleEntity>) {
    let mut session = GraphSession::new(SessionConfig::suggest());
    let modules: Vec<ModuleEntity> = (0..count)
        .map(|idx| ModuleEntity::new(FileId(idx as i32), format!("m{idx}")))
        .collect();
    for module in &modules {
        session.register_module(module.clone());
    }
    (session, modules)
}

/// Create a temporary project with the given files.
pub fn create_project_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable_from() {
        let edges = vec![(0, 1), (1, 2), (3, 0)];
        assert_eq!(reachable_from(&edges, 0), HashSet::from([1, 2]));
        assert_eq!(ancestors_of(&edges, 2), HashSet::from([0, 1, 3]));
        assert!(reachable_from(&edges, 2).is_empty());
    }

    #[test]
    fn test_create_project_with_structure() {
        let temp_dir = create_project_with_structure(&[("src/a.nim", "import b"), ("src/b.nim", "")]);
        assert!(temp_dir.path().join("src/a.nim").exists());
        assert!(temp_dir.path().join("src/b.nim").exists());
    }
}
