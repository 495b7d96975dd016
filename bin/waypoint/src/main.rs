//! Waypoint relay node binary.

mod cli;
mod commands;

use clap::Parser;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::WaypointCli::parse();
    waypoint_node_core::logging::init_logging(&cli.logs)?;
    cli.command.execute().await
}
