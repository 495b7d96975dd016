//! Command line interface.

use clap::{Parser, Subcommand};
use eyre::Result;
use waypoint_node_core::args::{LogArgs, NodeArgs};

use crate::commands::{self, ConfigArgs, SelectArgs};

/// Waypoint - circuit relay server with XOR-distance relay selection
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct WaypointCli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: WaypointCommands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum WaypointCommands {
    /// Run the relay server.
    Node(NodeArgs),
    /// Print the relay nearest to a peer.
    Select(SelectArgs),
    /// Print or write the effective configuration.
    Config(ConfigArgs),
}

impl WaypointCommands {
    pub(crate) async fn execute(self) -> Result<()> {
        match self {
            Self::Node(args) => commands::node::run(args).await,
            Self::Select(args) => commands::select::run(args),
            Self::Config(args) => commands::config::run(args),
        }
    }
}
