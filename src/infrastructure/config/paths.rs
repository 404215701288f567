//! Default file locations.
//!
//! - `<config dir>/modelfleet/config.toml` - configuration
//! - `<data dir>/modelfleet/order.json` - saved display orders

use std::path::PathBuf;

const APP_DIR: &str = "modelfleet";

/// Returns the default config file path.
pub fn default_config() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Returns the default order file path.
pub fn default_order_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("order.json")
}
