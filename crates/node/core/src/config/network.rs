//! Listener configuration for TOML persistence.

use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{args::NetworkArgs, constants::*};

/// Listener configuration (TOML-serializable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Listening address
    #[serde(default = "default_addr")]
    pub addr: IpAddr,

    /// TCP listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// WebSocket listening port
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,

    /// Public DNS name advertised in the self address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_host: Option<String>,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Keypair file; absent means an ephemeral identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
            ws_port: default_ws_port(),
            public_host: None,
            idle_timeout_secs: default_idle_timeout(),
            identity_file: None,
        }
    }
}

impl NetworkConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub(crate) fn apply_args(&mut self, args: &NetworkArgs) {
        if let Some(addr) = args.addr {
            self.addr = addr;
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(ws_port) = args.ws_port {
            self.ws_port = ws_port;
        }
        if let Some(host) = args.public_host.as_deref().map(str::trim) {
            // An empty RELAY_PUBLIC_HOST means "not set".
            self.public_host = (!host.is_empty()).then(|| host.to_owned());
        }
        if let Some(secs) = args.idle_timeout_secs {
            self.idle_timeout_secs = secs;
        }
        if let Some(path) = &args.identity_file {
            self.identity_file = Some(path.clone());
        }
    }
}

fn default_addr() -> IpAddr {
    DEFAULT_LISTEN_ADDR
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn default_port() -> u16 {
    DEFAULT_TCP_PORT
}

fn default_ws_port() -> u16 {
    DEFAULT_WS_PORT
}

fn default_idle_timeout() -> u64 {
    DEFAULT_IDLE_TIMEOUT_SECS
}
