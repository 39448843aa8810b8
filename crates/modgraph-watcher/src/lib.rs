//! Source tree watching for editing-assistant sessions

pub mod watcher;

pub use watcher::{apply_event, DirtyReport, FileWatcher, WatchEvent, WatcherService};
