//! Partial host status pushed by the real-time channel.

use serde::{Deserialize, Serialize};

use super::host::{HostMemory, HostStatus};

/// Fields of a host that a push update may carry.
///
/// `None` means "not covered by this update", never "clear the value".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    #[serde(default)]
    pub status: Option<HostStatus>,
    #[serde(default)]
    pub memory: Option<HostMemory>,
}

impl StatusPatch {
    #[must_use]
    pub const fn status(status: HostStatus) -> Self {
        Self {
            status: Some(status),
            memory: None,
        }
    }

    #[must_use]
    pub const fn with_memory(mut self, memory: HostMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Fold a newer patch into this one; fields carried by `newer` win.
    pub fn merge(&mut self, newer: &Self) {
        if newer.status.is_some() {
            self.status = newer.status;
        }
        if newer.memory.is_some() {
            self.memory = newer.memory;
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.memory.is_none()
    }
}
