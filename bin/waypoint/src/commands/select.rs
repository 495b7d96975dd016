//! `waypoint select`: print the relay nearest to a peer.

use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use waypoint_net_selector::RelaySelector;
use waypoint_node_core::NodeConfig;

#[derive(Debug, Args)]
pub(crate) struct SelectArgs {
    /// Peer identifier to find a relay for.
    #[arg(long, value_name = "PEER")]
    pub(crate) target: String,

    /// Relay address ending in `/p2p/<relay id>`. Repeatable or comma separated.
    #[arg(long = "relay", value_delimiter = ',', value_name = "MULTIADDR")]
    pub(crate) relays: Vec<String>,

    /// Read relay addresses from this config file when no `--relay` is given.
    #[arg(long, value_name = "FILE", env = "WAYPOINT_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Address printed when no relay candidate is usable.
    #[arg(long, value_name = "MULTIADDR")]
    pub(crate) fallback: String,
}

pub(crate) fn run(args: SelectArgs) -> Result<()> {
    println!("{}", resolve(args)?);
    Ok(())
}

fn resolve(args: SelectArgs) -> Result<String> {
    let relays = if args.relays.is_empty() {
        NodeConfig::load(args.config.as_deref())?.selection.relays
    } else {
        args.relays
    };

    let selector = RelaySelector::from_addresses(&relays, args.fallback);
    Ok(selector.select(&args.target).to_owned())
}
