//! Namespace selection state.
//!
//! The active namespace is the only piece of state that outlives a
//! session, so it gets an explicit store with pluggable persistence
//! instead of living in an ambient global. Sync targets sit behind the
//! [`NamespaceSync`] trait; the default is a small state file holding the
//! last selected namespace.

use std::fs;
use std::path::{Path, PathBuf};

/// An external persistence target for the selected namespace.
///
/// Implementations are best-effort: a failed write must not take the
/// dashboard down, it only loses the persisted selection.
pub trait NamespaceSync: Send {
    /// Read the persisted namespace, if one exists.
    fn load(&self) -> Option<String>;

    /// Persist the namespace.
    fn store(&mut self, ns: &str);
}

/// File-backed namespace persistence.
///
/// Stores the bare namespace string in a state file so the selection
/// survives a restart.
#[derive(Debug)]
pub struct FileSync {
    path: PathBuf,
}

impl FileSync {
    /// Create a sync target at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl NamespaceSync for FileSync {
    fn load(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let ns = content.trim();
        if ns.is_empty() {
            None
        } else {
            Some(ns.to_string())
        }
    }

    fn store(&mut self, ns: &str) {
        let _ = fs::write(&self.path, ns);
    }
}

/// Holds the active namespace and keeps sync targets up to date.
#[derive(Default)]
pub struct NamespaceStore {
    current: Option<String>,
    syncs: Vec<Box<dyn NamespaceSync>>,
}

impl std::fmt::Debug for NamespaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceStore")
            .field("current", &self.current)
            .field("syncs", &self.syncs.len())
            .finish()
    }
}

impl NamespaceStore {
    /// Create an empty store with no sync targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a sync target.
    pub fn with_sync(mut self, sync: Box<dyn NamespaceSync>) -> Self {
        self.syncs.push(sync);
        self
    }

    /// Restore the namespace from the first sync target that has one.
    ///
    /// Does nothing if a namespace is already set.
    pub fn restore(&mut self) {
        if self.current.is_some() {
            return;
        }
        self.current = self.syncs.iter().find_map(|s| s.load());
    }

    /// The active namespace, if any.
    pub fn get(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Set the active namespace and push it to every sync target.
    pub fn set(&mut self, ns: &str) {
        self.current = Some(ns.to_string());
        for sync in &mut self.syncs {
            sync.store(ns);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sync_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ns");

        let mut sync = FileSync::new(&path);
        assert!(sync.load().is_none());

        sync.store("teamA");
        assert_eq!(sync.load().as_deref(), Some("teamA"));
    }

    #[test]
    fn file_sync_ignores_blank_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ns");
        fs::write(&path, "  \n").unwrap();

        let sync = FileSync::new(&path);
        assert!(sync.load().is_none());
    }

    #[test]
    fn set_updates_sync_targets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ns");

        let mut store = NamespaceStore::new().with_sync(Box::new(FileSync::new(&path)));
        assert!(store.get().is_none());

        store.set("teamA");
        assert_eq!(store.get(), Some("teamA"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "teamA");
    }

    #[test]
    fn restore_reads_persisted_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ns");
        fs::write(&path, "persisted").unwrap();

        let mut store = NamespaceStore::new().with_sync(Box::new(FileSync::new(&path)));
        store.restore();
        assert_eq!(store.get(), Some("persisted"));
    }

    #[test]
    fn restore_keeps_existing_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ns");
        fs::write(&path, "persisted").unwrap();

        let mut store = NamespaceStore::new().with_sync(Box::new(FileSync::new(&path)));
        store.set("explicit");
        store.restore();
        assert_eq!(store.get(), Some("explicit"));
    }
}
