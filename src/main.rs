use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use modelfleet::adapter::inbound::cli::{self, command::Cli, command::Commands, output};
use modelfleet::infrastructure::config::{paths, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            output::error(&format!("Failed to load config: {err}"));
            return ExitCode::FAILURE;
        }
    };

    if !cli.command.is_offline() {
        let level = match cli.verbose {
            0 if matches!(cli.command, Commands::Watch) => config.logging.level.clone(),
            0 => "warn".to_string(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        };
        config.logging.with_level(&level).init();
    }

    let source = config_source(&cli);
    match cli::run(&cli, &config, &source).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            output::error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn config_source(cli: &Cli) -> String {
    if let Some(path) = &cli.config {
        return path.display().to_string();
    }
    let default_path = paths::default_config();
    if default_path.is_file() {
        default_path.display().to_string()
    } else {
        "built-in defaults".to_string()
    }
}
