//! `config show` and `config validate` handlers.

use serde_json::json;

use super::command::ConfigCommand;
use super::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// `config` receives the already loaded and validated configuration, so
/// reaching this point means validation passed.
pub fn execute(config: &Config, source: &str, command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(config),
        ConfigCommand::Validate => {
            validate(config, source);
            Ok(())
        }
    }
}

fn show(config: &Config) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "config": serde_json::to_value(config)?,
        }));
        return Ok(());
    }

    let rendered = config.to_toml()?;
    println!("{rendered}");
    Ok(())
}

fn validate(config: &Config, source: &str) {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "config": source,
            "valid": true,
        }));
        return;
    }

    output::section("Configuration Check");
    output::field("Config", source);
    output::success("Configuration file is valid");
    output::field("Fleet API", &config.source.api_url);
    if config.status_stream.enabled {
        output::field("Status stream", &config.status_stream.ws_url);
    } else {
        output::field("Status stream", "disabled");
    }
    output::field(
        "Refresh",
        format!(
            "every {}s, {}s while streaming",
            config.refresh.disconnected_interval_secs, config.refresh.connected_interval_secs
        ),
    );
    output::field("Order file", config.storage.order_path.display());
}
