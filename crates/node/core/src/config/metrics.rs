use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::{args::MetricsArgs, constants::*};

/// Prometheus exporter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_addr")]
    pub addr: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl MetricsConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }

    pub(crate) fn apply_args(&mut self, args: &MetricsArgs) {
        self.enabled |= args.enabled;
        if let Some(addr) = args.addr {
            self.addr = addr;
        }
        if let Some(port) = args.port {
            self.port = port;
        }
    }
}

fn default_addr() -> IpAddr {
    DEFAULT_LOCALHOST_ADDR
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn default_port() -> u16 {
    DEFAULT_METRICS_PORT
}
