//! Hosts and their mutable status fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::HostId;
use super::instance::Instance;
use super::status::StatusPatch;

/// Reachability status of a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    /// Host is reachable and serving.
    Online,
    /// Host is reachable but reporting problems.
    Degraded,
    /// Host is not reachable.
    Offline,
    /// Status not reported or not recognised.
    #[default]
    #[serde(other)]
    Unknown,
}

impl HostStatus {
    /// Parse a reported status name, ignoring case. Unrecognised names map
    /// to [`HostStatus::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "online" => Self::Online,
            "degraded" => Self::Degraded,
            "offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }

    /// Stable lowercase name used in logs and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Degraded => "degraded",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory usage reported for a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMemory {
    /// Bytes currently in use.
    pub used_bytes: u64,
    /// Total bytes available.
    pub total_bytes: u64,
}

impl HostMemory {
    #[must_use]
    pub const fn new(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            used_bytes,
            total_bytes,
        }
    }

    /// Fraction of memory in use, `None` when the total is unknown (zero).
    #[must_use]
    pub fn usage_fraction(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            return None;
        }
        Some(self.used_bytes as f64 / self.total_bytes as f64)
    }
}

/// A machine exposing zero or more model instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub name: String,
    #[serde(default)]
    pub status: HostStatus,
    #[serde(default)]
    pub memory: Option<HostMemory>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl Host {
    /// Create a host with no instances and unknown status.
    pub fn new(id: impl Into<HostId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: HostStatus::Unknown,
            memory: None,
            instances: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: HostStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_memory(mut self, memory: HostMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    #[must_use]
    pub fn with_instances(mut self, instances: Vec<Instance>) -> Self {
        self.instances = instances;
        self
    }

    /// Replace the fields carried by an overlay patch, leaving everything
    /// else untouched.
    pub fn apply_patch(&mut self, patch: &StatusPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(memory) = patch.memory {
            self.memory = Some(memory);
        }
    }

    /// Find an instance of this host by id.
    #[must_use]
    pub fn instance(&self, id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.id.as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        assert_eq!(HostStatus::parse("OFFLINE"), HostStatus::Offline);
        assert_eq!(HostStatus::parse("rebooting"), HostStatus::Unknown);
    }

    #[test]
    fn unknown_status_strings_deserialize_as_unknown() {
        let status: HostStatus = serde_json::from_str("\"rebooting\"").unwrap();
        assert_eq!(status, HostStatus::Unknown);
        let status: HostStatus = serde_json::from_str("\"online\"").unwrap();
        assert_eq!(status, HostStatus::Online);
    }

    #[test]
    fn usage_fraction_handles_zero_total() {
        assert_eq!(HostMemory::new(10, 0).usage_fraction(), None);
        assert_eq!(HostMemory::new(1, 4).usage_fraction(), Some(0.25));
    }

    #[test]
    fn apply_patch_only_touches_carried_fields() {
        let mut host = Host::new("h1", "Host One")
            .with_status(HostStatus::Offline)
            .with_memory(HostMemory::new(1, 2));

        host.apply_patch(&StatusPatch {
            status: Some(HostStatus::Online),
            memory: None,
        });

        assert_eq!(host.status, HostStatus::Online);
        assert_eq!(host.memory, Some(HostMemory::new(1, 2)));
        assert_eq!(host.name, "Host One");
    }
}
