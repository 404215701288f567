//! Push-channel wire messages and how they land in the overlay.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::trace;

use crate::application::StatusOverlay;
use crate::domain::{HostId, HostMemory, HostStatus, StatusPatch};
use crate::error::Result;

/// Message pushed by the fleet's status channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusMessage {
    /// Live status of one host.
    HostStatus(HostUpdate),
    /// Live status of every host; replaces the overlay.
    Snapshot { hosts: Vec<HostUpdate> },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostUpdate {
    #[serde(alias = "hostId", alias = "id")]
    pub host_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub memory: Option<MemoryUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MemoryUpdate {
    #[serde(alias = "usedBytes", alias = "used_bytes")]
    pub used: u64,
    #[serde(alias = "totalBytes", alias = "total_bytes")]
    pub total: u64,
}

impl HostUpdate {
    fn into_entry(self) -> (HostId, StatusPatch) {
        // An unrecognised status does not cover the field.
        let status = self
            .status
            .as_deref()
            .map(HostStatus::parse)
            .filter(|status| *status != HostStatus::Unknown);
        let patch = StatusPatch {
            status,
            memory: self.memory.map(|m| HostMemory::new(m.used, m.total)),
        };
        (HostId::from(self.host_id), patch)
    }
}

/// Parse one text frame and fold it into `overlay`.
///
/// Returns the number of hosts the message covered.
///
/// # Errors
///
/// Returns an error if the frame is not a recognised message.
pub fn handle_message(overlay: &StatusOverlay, text: &str) -> Result<usize> {
    match serde_json::from_str::<StatusMessage>(text)? {
        StatusMessage::HostStatus(update) => {
            let (host_id, patch) = update.into_entry();
            trace!(host_id = %host_id, "Applying pushed host status");
            if !patch.is_empty() {
                overlay.apply(host_id, patch);
            }
            Ok(1)
        }
        StatusMessage::Snapshot { hosts } => {
            let count = hosts.len();
            let entries: HashMap<HostId, StatusPatch> = hosts
                .into_iter()
                .map(HostUpdate::into_entry)
                .filter(|(_, patch)| !patch.is_empty())
                .collect();
            trace!(hosts = count, "Applying pushed status snapshot");
            overlay.replace_all(entries);
            Ok(count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_status_merges_into_overlay() {
        let overlay = StatusOverlay::new();
        handle_message(
            &overlay,
            r#"{"type": "host_status", "host_id": "h1", "memory": {"used": 5, "total": 10}}"#,
        )
        .unwrap();
        handle_message(
            &overlay,
            r#"{"type": "host_status", "hostId": "h1", "status": "degraded"}"#,
        )
        .unwrap();

        let entry = overlay.get(&HostId::new("h1")).unwrap();
        assert_eq!(entry.status, Some(HostStatus::Degraded));
        assert_eq!(entry.memory, Some(HostMemory::new(5, 10)));
    }

    #[test]
    fn snapshot_replaces_overlay() {
        let overlay = StatusOverlay::new();
        overlay.apply(HostId::new("old"), StatusPatch::status(HostStatus::Online));

        let count = handle_message(
            &overlay,
            r#"{"type": "snapshot", "hosts": [{"host_id": "h1", "status": "offline"}]}"#,
        )
        .unwrap();

        assert_eq!(count, 1);
        assert!(overlay.get(&HostId::new("old")).is_none());
        assert_eq!(
            overlay.get(&HostId::new("h1")).unwrap().status,
            Some(HostStatus::Offline)
        );
    }

    #[test]
    fn unrecognised_status_leaves_field_uncovered() {
        let overlay = StatusOverlay::new();
        handle_message(
            &overlay,
            r#"{"type": "host_status", "host_id": "h1", "status": "online"}"#,
        )
        .unwrap();
        handle_message(
            &overlay,
            r#"{"type": "host_status", "host_id": "h1", "status": "rebooting"}"#,
        )
        .unwrap();
        handle_message(
            &overlay,
            r#"{"type": "host_status", "host_id": "h2", "status": "REBOOTING"}"#,
        )
        .unwrap();

        assert_eq!(
            overlay.get(&HostId::new("h1")).unwrap().status,
            Some(HostStatus::Online)
        );
        assert!(overlay.get(&HostId::new("h2")).is_none());
    }

    #[test]
    fn status_names_ignore_case() {
        let overlay = StatusOverlay::new();
        handle_message(
            &overlay,
            r#"{"type": "host_status", "host_id": "h1", "status": "Degraded"}"#,
        )
        .unwrap();
        assert_eq!(
            overlay.get(&HostId::new("h1")).unwrap().status,
            Some(HostStatus::Degraded)
        );
    }

    #[test]
    fn malformed_frame_leaves_overlay_untouched() {
        let overlay = StatusOverlay::new();
        assert!(handle_message(&overlay, r#"{"type": "bogus"}"#).is_err());
        assert!(handle_message(&overlay, "not json").is_err());
        assert_eq!(overlay.revision(), 0);
    }
}
