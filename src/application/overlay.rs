//! Live status overlay fed by the real-time push channel.
//!
//! The push channel writes here; the reconciler only reads. Entries are
//! layered over the pulled snapshot at view time and win for the fields
//! they carry.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::domain::{HostId, StatusPatch};

/// Point-in-time copy of the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySnapshot {
    /// Revision the entries belong to.
    pub revision: u64,
    pub entries: HashMap<HostId, StatusPatch>,
}

/// Process-wide map of host id to the latest pushed status.
#[derive(Debug)]
pub struct StatusOverlay {
    entries: RwLock<HashMap<HostId, StatusPatch>>,
    /// Bumped while holding the `entries` write lock.
    revision: watch::Sender<u64>,
    connected: watch::Sender<bool>,
}

impl Default for StatusOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusOverlay {
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        let (connected, _) = watch::channel(false);
        Self {
            entries: RwLock::new(HashMap::new()),
            revision,
            connected,
        }
    }

    /// Fold a pushed update into the host's entry.
    pub fn apply(&self, host_id: HostId, patch: StatusPatch) {
        let mut entries = self.entries.write();
        entries.entry(host_id).or_default().merge(&patch);
        self.bump();
    }

    /// Replace every entry, e.g. from a full snapshot push.
    pub fn replace_all(&self, next: HashMap<HostId, StatusPatch>) {
        let mut entries = self.entries.write();
        *entries = next;
        self.bump();
    }

    /// Drop the entry for one host. Returns whether one existed.
    pub fn remove(&self, host_id: &HostId) -> bool {
        let mut entries = self.entries.write();
        let removed = entries.remove(host_id).is_some();
        if removed {
            self.bump();
        }
        removed
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        if !entries.is_empty() {
            entries.clear();
            self.bump();
        }
    }

    #[must_use]
    pub fn get(&self, host_id: &HostId) -> Option<StatusPatch> {
        self.entries.read().get(host_id).copied()
    }

    #[must_use]
    pub fn snapshot(&self) -> OverlaySnapshot {
        let entries = self.entries.read();
        OverlaySnapshot {
            revision: *self.revision.borrow(),
            entries: entries.clone(),
        }
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Record push-channel health. Returns whether the flag changed.
    pub fn set_connected(&self, connected: bool) -> bool {
        self.connected.send_if_modified(|current| {
            if *current == connected {
                return false;
            }
            *current = connected;
            true
        })
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Receiver notified whenever channel health flips.
    #[must_use]
    pub fn subscribe_connection(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    /// Receiver notified with the new revision on every entry change.
    #[must_use]
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
