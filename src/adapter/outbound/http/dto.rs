//! Wire types for the fleet REST API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{
    Host, HostMemory, HostStatus, Instance, InstanceConfig, InstanceStatus,
};

/// Host record from `GET /api/hosts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub memory: Option<MemoryDto>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MemoryDto {
    #[serde(alias = "usedBytes", alias = "used_bytes")]
    pub used: u64,
    #[serde(alias = "totalBytes", alias = "total_bytes")]
    pub total: u64,
}

/// Instance record from `GET /api/hosts/{id}/instances`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDto {
    pub id: String,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "started_at")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// First non-blank message the body carries.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        [self.error, self.message]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

impl From<MemoryDto> for HostMemory {
    fn from(m: MemoryDto) -> Self {
        Self::new(m.used, m.total)
    }
}

impl From<HostDto> for Host {
    fn from(dto: HostDto) -> Self {
        let name = dto.name.unwrap_or_else(|| dto.id.clone());
        let status = parse_host_status(dto.status.as_deref());
        let mut host = Host::new(dto.id, name).with_status(status);
        if let Some(memory) = dto.memory {
            host = host.with_memory(memory.into());
        }
        host
    }
}

impl From<InstanceDto> for Instance {
    fn from(dto: InstanceDto) -> Self {
        Self {
            id: dto.id.into(),
            config: InstanceConfig::new(dto.config),
            status: parse_instance_status(dto.status.as_deref()),
            started_at: dto.started_at,
            error: dto.error.filter(|e| !e.is_empty()),
        }
    }
}

fn parse_host_status(raw: Option<&str>) -> HostStatus {
    raw.map_or(HostStatus::Unknown, HostStatus::parse)
}

fn parse_instance_status(raw: Option<&str>) -> InstanceStatus {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("starting") => InstanceStatus::Starting,
        Some("running") => InstanceStatus::Running,
        Some("stopping") => InstanceStatus::Stopping,
        Some("failed" | "error") => InstanceStatus::Failed,
        _ => InstanceStatus::Stopped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_without_name_uses_id() {
        let dto: HostDto = serde_json::from_str(r#"{"id": "gpu-1", "status": "ONLINE"}"#).unwrap();
        let host = Host::from(dto);
        assert_eq!(host.name, "gpu-1");
        assert_eq!(host.status, HostStatus::Online);
        assert!(host.memory.is_none());
    }

    #[test]
    fn instance_maps_config_and_status() {
        let raw = r#"{
            "id": "llama",
            "config": {"model": "llama-3-8b"},
            "status": "running",
            "startedAt": "2026-01-02T03:04:05Z"
        }"#;
        let instance = Instance::from(serde_json::from_str::<InstanceDto>(raw).unwrap());
        assert_eq!(instance.status, InstanceStatus::Running);
        assert_eq!(instance.config.str_field("model"), Some("llama-3-8b"));
        assert!(instance.started_at.is_some());
    }

    #[test]
    fn error_body_prefers_error_field() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "busy", "message": "try later"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("busy"));

        let blank: ErrorBody = serde_json::from_str(r#"{"error": "", "message": "nope"}"#).unwrap();
        assert_eq!(blank.into_message().as_deref(), Some("nope"));
    }
}
