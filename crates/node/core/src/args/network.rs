use std::{net::IpAddr, path::PathBuf};

use clap::Args;

/// Parameters for configuring the relay's listeners.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
#[command(next_help_heading = "Networking")]
pub struct NetworkArgs {
    /// Address to bind the relay listeners to.
    #[arg(id = "p2p.addr", long = "p2p.addr", value_name = "ADDR")]
    pub addr: Option<IpAddr>,

    /// TCP listen port.
    #[arg(id = "p2p.port", long = "p2p.port", env = "RELAY_PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// WebSocket listen port.
    #[arg(long = "p2p.ws-port", env = "RELAY_WS_PORT", value_name = "PORT")]
    pub ws_port: Option<u16>,

    /// Public DNS name this relay is reachable at.
    ///
    /// When set, the self address advertised to peers is
    /// `/dns4/<host>/tcp/<ws-port>/ws/p2p/<peer id>`.
    #[arg(long = "p2p.public-host", env = "RELAY_PUBLIC_HOST", value_name = "HOST")]
    pub public_host: Option<String>,

    /// Close connections idle for this many seconds.
    #[arg(long = "p2p.idle-timeout", value_name = "SECONDS")]
    pub idle_timeout_secs: Option<u64>,

    /// File holding the node's protobuf encoded keypair.
    ///
    /// Created on first start. Without it the node runs with a fresh identity.
    #[arg(long = "p2p.identity", value_name = "FILE")]
    pub identity_file: Option<PathBuf>,
}
