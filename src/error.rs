use thiserror::Error;

use crate::domain::{HostId, InstanceAction, InstanceId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
}

/// A user-requested instance action that the fleet rejected or could not
/// deliver.
///
/// Displays only the message so callers can surface it verbatim next to the
/// affected row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ActionError {
    pub action: InstanceAction,
    pub host_id: HostId,
    pub instance_id: InstanceId,
    pub message: String,
}

impl ActionError {
    /// Build from the adapter's failure, falling back to a generic message
    /// when the failure carries none.
    #[must_use]
    pub fn from_failure(
        action: InstanceAction,
        host_id: &HostId,
        instance_id: &InstanceId,
        failure: &Error,
    ) -> Self {
        let reported = failure.to_string();
        let message = if reported.trim().is_empty() {
            format!("failed to {action} instance {instance_id}")
        } else {
            reported
        };
        Self {
            action,
            host_id: host_id.clone(),
            instance_id: instance_id.clone(),
            message,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Action(#[from] ActionError),

    /// Message reported by the fleet API itself.
    #[error("{0}")]
    Remote(String),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("connection error: {0}")]
    Connection(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
