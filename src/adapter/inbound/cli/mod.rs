//! CLI module graph.

pub mod check;
pub mod command;
pub mod config;
pub mod fleet;
pub mod instance;
pub mod output;
pub mod render;
pub mod reorder;

use command::{Cli, Commands};

use crate::domain::InstanceAction;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Dispatch a parsed command against a loaded configuration.
///
/// `config_source` names where the configuration came from, for display.
pub async fn run(cli: &Cli, config: &Config, config_source: &str) -> Result<()> {
    match &cli.command {
        Commands::Hosts => fleet::hosts(config).await,
        Commands::Start(args) => instance::execute(config, InstanceAction::Start, args).await,
        Commands::Stop(args) => instance::execute(config, InstanceAction::Stop, args).await,
        Commands::Restart(args) => instance::execute(config, InstanceAction::Restart, args).await,
        Commands::Watch => fleet::watch(config).await,
        Commands::Move(command) => reorder::execute(config, command).await,
        Commands::Config(command) => config::execute(config, config_source, command),
        Commands::Check => check::execute(config),
    }
}
