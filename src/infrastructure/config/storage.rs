//! Order persistence settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths;

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding saved display orders.
    #[serde(default = "paths::default_order_file")]
    pub order_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            order_path: paths::default_order_file(),
        }
    }
}
