//! `waypoint config`: show the configuration a node would run with.

use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use tracing::info;
use waypoint_node_core::{NodeConfig, args::NodeArgs};

#[derive(Debug, Args)]
pub(crate) struct ConfigArgs {
    /// Write the configuration to this file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    pub(crate) output: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) node: NodeArgs,
}

pub(crate) fn run(args: ConfigArgs) -> Result<()> {
    let config = NodeConfig::from_args(&args.node)?;

    match args.output {
        Some(path) => {
            config.save(&path)?;
            info!(path = %path.display(), "configuration written");
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
