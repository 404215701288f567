//! Model instances running on a host.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::InstanceId;

/// Lifecycle status of a model instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

impl InstanceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Failed => "failed",
        }
    }

    /// True while the instance is between stable states.
    #[must_use]
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::Starting | Self::Stopping)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque instance configuration.
///
/// Carried through the core untouched; only presentation interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceConfig(serde_json::Value);

impl InstanceConfig {
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Look up a top-level string field, e.g. the model name.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }
}

/// A single model-serving process on a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    #[serde(default)]
    pub config: InstanceConfig,
    #[serde(default)]
    pub status: InstanceStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Instance {
    pub fn new(id: impl Into<InstanceId>) -> Self {
        Self {
            id: id.into(),
            config: InstanceConfig::default(),
            status: InstanceStatus::Stopped,
            started_at: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: InstanceStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: InstanceConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_deserializes_with_defaults() {
        let instance: Instance = serde_json::from_str(r#"{"id": "i1"}"#).unwrap();
        assert_eq!(instance.id.as_str(), "i1");
        assert_eq!(instance.status, InstanceStatus::Stopped);
        assert!(instance.started_at.is_none());
        assert!(instance.config.as_value().is_null());
    }

    #[test]
    fn config_payload_is_preserved() {
        let raw = r#"{"id":"i1","config":{"model":"llama-3-8b","ctx":8192},"status":"running"}"#;
        let instance: Instance = serde_json::from_str(raw).unwrap();
        assert_eq!(instance.config.str_field("model"), Some("llama-3-8b"));
        assert_eq!(instance.config.as_value()["ctx"], 8192);
        assert_eq!(instance.status, InstanceStatus::Running);
    }

    #[test]
    fn transitioning_states() {
        assert!(InstanceStatus::Starting.is_transitioning());
        assert!(InstanceStatus::Stopping.is_transitioning());
        assert!(!InstanceStatus::Running.is_transitioning());
    }
}
