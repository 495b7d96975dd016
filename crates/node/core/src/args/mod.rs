//! Command line arguments for the relay node.

mod log;
mod metrics;
mod network;
mod relay;
mod selection;

use std::path::PathBuf;

use clap::Args;

pub use log::LogArgs;
pub use metrics::MetricsArgs;
pub use network::NetworkArgs;
pub use relay::RelayArgs;
pub use selection::SelectionArgs;

/// Arguments for running the relay node.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct NodeArgs {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "FILE", env = "WAYPOINT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub relay: RelayArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub metrics: MetricsArgs,
}
