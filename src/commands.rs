//! CLI command implementations

use crate::manifest::Manifest;
use anyhow::Context;
use modgraph_core::{FileId, GraphSession};
use modgraph_watcher::WatcherService;
use petgraph::dot::{Config, Dot};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Canonical project root, falling back to the path as given.
pub fn resolve_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}

fn load_session(root: &Path, manifest: &Path) -> anyhow::Result<GraphSession> {
    let manifest_path = if manifest.is_absolute() {
        manifest.to_path_buf()
    } else {
        root.join(manifest)
    };
    Manifest::load(&manifest_path)?.build_session(root)
}

fn lookup(session: &GraphSession, root: &Path, file: &Path) -> anyhow::Result<FileId> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    };
    session
        .file_id(&path)
        .with_context(|| format!("{} is not listed in the manifest", file.display()))
}

/// Path of `id` relative to `root`, for display.
fn display_path(session: &GraphSession, root: &Path, id: FileId) -> String {
    match session.interner().path(id) {
        Some(path) => path.strip_prefix(root).unwrap_or(path).display().to_string(),
        None => id.to_string(),
    }
}

/// Text report for a series of invalidated files.
pub fn render_dirty_report(
    session: &GraphSession,
    root: &Path,
    changes: &[(FileId, Vec<FileId>)],
) -> String {
    let mut out = String::new();
    for (file, dirty) in changes {
        let _ = writeln!(out, "{} changed", display_path(session, root, *file));
        for id in dirty {
            let _ = writeln!(out, "  dirty: {}", display_path(session, root, *id));
        }
    }
    let _ = writeln!(out, "{} modules need recompiling", session.dirty_modules().len());
    out
}

pub fn dirty(root: PathBuf, manifest: PathBuf, files: Vec<PathBuf>) -> anyhow::Result<()> {
    let mut session = load_session(&root, &manifest)?;

    let mut changes = Vec::with_capacity(files.len());
    for file in &files {
        let id = lookup(&session, &root, file)?;
        let dirty = session.invalidate(id);
        changes.push((id, dirty));
    }

    print!("{}", render_dirty_report(&session, &root, &changes));
    Ok(())
}

/// Text report of what `file` depends on and what depends on it.
pub fn render_deps_report(session: &mut GraphSession, root: &Path, file: FileId) -> String {
    let dependencies = session.dependencies_of(file);
    let dependents = session.dependents_of(file);

    let mut out = String::new();
    let _ = writeln!(out, "{}", display_path(session, root, file));
    let _ = writeln!(out, "depends on ({}):", dependencies.len());
    for id in dependencies {
        let _ = writeln!(out, "  {}", display_path(session, root, id));
    }
    let _ = writeln!(out, "depended on by ({}):", dependents.len());
    for id in dependents {
        let _ = writeln!(out, "  {}", display_path(session, root, id));
    }
    out
}

pub fn deps(root: PathBuf, manifest: PathBuf, file: PathBuf) -> anyhow::Result<()> {
    let mut session = load_session(&root, &manifest)?;
    let id = lookup(&session, &root, &file)?;
    print!("{}", render_deps_report(&mut session, &root, id));
    Ok(())
}

/// Graphviz rendering of the closed dependency relation.
pub fn render_dot(session: &mut GraphSession, root: &Path) -> String {
    session.close_transitively();
    let graph = session
        .graph()
        .to_graph_map()
        .into_graph::<u32>()
        .map(|_, id| display_path(session, root, *id), |_, _| ());
    format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
}

pub fn dot(root: PathBuf, manifest: PathBuf) -> anyhow::Result<()> {
    let mut session = load_session(&root, &manifest)?;
    print!("{}", render_dot(&mut session, &root));
    Ok(())
}

pub async fn watch(root: PathBuf, manifest: PathBuf) -> anyhow::Result<()> {
    let session = load_session(&root, &manifest)?;
    tracing::info!("Starting file watcher for: {}", root.display());

    let mut service = WatcherService::new(&root, session)?;
    service.start_watching()?;

    tokio::select! {
        result = service.process_events() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
    }
    tracing::info!("{} modules dirty", service.session().dirty_modules().len());
    Ok(())
}
