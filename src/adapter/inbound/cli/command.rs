//! Command-line interface definitions.
//!
//! Defines the CLI structure for the `modelfleet` binary using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Direction, HostId, InstanceId};

/// Inspect and operate a fleet of model-serving hosts
#[derive(Parser, Debug)]
#[command(name = "modelfleet")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the fleet once and print it
    Hosts,

    /// Keep the fleet view live until interrupted
    Watch,

    /// Start an instance
    Start(InstanceArgs),

    /// Stop an instance
    Stop(InstanceArgs),

    /// Restart an instance
    Restart(InstanceArgs),

    /// Change the display order
    #[command(subcommand)]
    Move(MoveCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Run configuration health checks
    Check,
}

impl Commands {
    /// Whether the command only looks at configuration.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Check)
    }
}

/// Target of an instance action.
#[derive(Args, Debug, Clone)]
pub struct InstanceArgs {
    /// Host id
    pub host: String,
    /// Instance id
    pub instance: String,
}

impl InstanceArgs {
    #[must_use]
    pub fn host_id(&self) -> HostId {
        HostId::new(self.host.as_str())
    }

    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        InstanceId::new(self.instance.as_str())
    }
}

/// Subcommands for `modelfleet move`.
#[derive(Subcommand, Debug)]
pub enum MoveCommand {
    /// Move a host one step up or down
    Host {
        host: String,
        /// `up` or `down`
        direction: Direction,
    },
    /// Move an instance one step up or down within its host
    Instance {
        host: String,
        instance: String,
        /// `up` or `down`
        direction: Direction,
    },
}

/// Subcommands for `modelfleet config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied
    Show,
    /// Validate the configuration file
    Validate,
}
