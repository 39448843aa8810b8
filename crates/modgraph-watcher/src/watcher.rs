//! Filesystem watcher implementation

use anyhow::Result;
use modgraph_core::{FileId, GraphSession};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// File or directory created
    Created(PathBuf),
    /// File or directory modified
    Modified(PathBuf),
    /// File or directory removed
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Created(path) | WatchEvent::Modified(path) | WatchEvent::Removed(path) => path,
        }
    }
}

/// Outcome of one change: the file that changed and the modules now dirty
/// because of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyReport {
    pub path: PathBuf,
    pub file: FileId,
    pub dirty: Vec<FileId>,
}

/// File system watcher for monitoring source changes
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::UnboundedReceiver<WatchEvent>,
    watched_paths: HashSet<PathBuf>,
    root_path: PathBuf,
}

impl FileWatcher {
    /// Create a new file watcher for the given root path
    pub fn new(root_path: impl AsRef<Path>) -> Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            match res {
                Ok(event) => {
                    debug!("File system event: {:?}", event);
                    Self::handle_notify_event(event, &event_tx);
                }
                Err(e) => {
                    error!("File system watch error: {}", e);
                }
            }
        })?;

        Ok(Self {
            watcher,
            event_rx,
            watched_paths: HashSet::new(),
            root_path,
        })
    }

    /// Handle a notify event and convert to our watch events
    fn handle_notify_event(event: notify::Event, event_tx: &mpsc::UnboundedSender<WatchEvent>) {
        let make: fn(PathBuf) -> WatchEvent = match event.kind {
            notify::EventKind::Create(_) => WatchEvent::Created,
            notify::EventKind::Modify(_) => WatchEvent::Modified,
            notify::EventKind::Remove(_) => WatchEvent::Removed,
            _ => return,
        };
        for path in event.paths {
            if should_ignore_path(&path) {
                continue;
            }
            if let Err(e) = event_tx.send(make(path)) {
                warn!("Failed to forward watch event: {}", e);
            }
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Watch a directory recursively
    pub fn watch_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Watching directory: {:?}", path);

        self.watcher.watch(path, RecursiveMode::Recursive)?;
        self.watched_paths.insert(path.to_path_buf());
        Ok(())
    }

    /// Watch a single file
    pub fn watch_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Watching file: {:?}", path);

        self.watcher.watch(path, RecursiveMode::NonRecursive)?;
        self.watched_paths.insert(path.to_path_buf());
        Ok(())
    }

    /// Stop watching a path
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Stopping watch for: {:?}", path);

        self.watcher.unwatch(path)?;
        self.watched_paths.remove(path);
        Ok(())
    }

    /// Get the event receiver
    pub fn event_receiver(&mut self) -> &mut mpsc::UnboundedReceiver<WatchEvent> {
        &mut self.event_rx
    }

    /// Check if a path is being watched
    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched_paths.contains(path)
    }
}

/// Drives dirty propagation from filesystem changes.
///
/// Owns the session outright: watch events are applied one at a time on the
/// task that runs `process_events`.
pub struct WatcherService {
    watcher: FileWatcher,
    session: GraphSession,
    report_tx: Option<mpsc::UnboundedSender<DirtyReport>>,
}

impl WatcherService {
    /// Create a new watcher service
    pub fn new(root_path: impl AsRef<Path>, session: GraphSession) -> Result<Self> {
        Ok(Self {
            watcher: FileWatcher::new(root_path)?,
            session,
            report_tx: None,
        })
    }

    /// Also send every dirty report to `report_tx`
    pub fn with_reports(mut self, report_tx: mpsc::UnboundedSender<DirtyReport>) -> Self {
        self.report_tx = Some(report_tx);
        self
    }

    pub fn session(&self) -> &GraphSession {
        &self.session
    }

    pub fn into_session(self) -> GraphSession {
        self.session
    }

    /// Start watching the project directory
    pub fn start_watching(&mut self) -> Result<()> {
        let root_path = self.watcher.root_path().to_path_buf();
        self.watcher.watch_directory(&root_path)?;

        info!("Started watching project directory: {:?}", root_path);
        Ok(())
    }

    /// Apply file system events until the channel closes or the session's
    /// cancellation hook asks to stop.
    pub async fn process_events(&mut self) -> Result<()> {
        while !self.session.should_stop_compiling() {
            let Some(event) = self.watcher.event_receiver().recv().await else {
                break;
            };
            self.handle_event(&event);
        }
        Ok(())
    }

    /// Apply one event, forwarding the report if anything became dirty.
    pub fn handle_event(&mut self, event: &WatchEvent) -> Option<DirtyReport> {
        let report = apply_event(&mut self.session, event)?;
        if let Some(ref report_tx) = self.report_tx {
            // No receiver just means nobody is listening any more.
            let _ = report_tx.send(report.clone());
        }
        Some(report)
    }
}

/// Invalidate the file behind `event` in `session`.
///
/// Returns `None` for files the session has never seen.
pub fn apply_event(session: &mut GraphSession, event: &WatchEvent) -> Option<DirtyReport> {
    let path = event.path();
    let Some(file) = resolve_file(session, path) else {
        debug!("Ignoring change to untracked file {:?}", path);
        return None;
    };

    if let WatchEvent::Removed(_) = event {
        warn!("Tracked file removed: {:?}", path);
    }

    let dirty = session.invalidate(file);
    info!("{:?} changed: {} modules dirty", path, dirty.len());
    Some(DirtyReport {
        path: path.to_path_buf(),
        file,
        dirty,
    })
}

fn resolve_file(session: &GraphSession, path: &Path) -> Option<FileId> {
    session.interner().lookup(path).or_else(|| {
        let canonical = path.canonicalize().ok()?;
        session.interner().lookup(&canonical)
    })
}

/// Check if a path should be ignored (e.g., target/, .git/, etc.)
fn should_ignore_path(path: &Path) -> bool {
    path.components().any(|component| {
        matches!(
            component.as_os_str().to_str(),
            Some("target") | Some(".git") | Some("node_modules")
        )
    })
}
