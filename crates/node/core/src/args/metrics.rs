use std::net::IpAddr;

use clap::Args;

/// Prometheus exporter parameters.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
#[command(next_help_heading = "Metrics")]
pub struct MetricsArgs {
    /// Serve Prometheus metrics over HTTP.
    #[arg(long = "metrics")]
    pub enabled: bool,

    /// Metrics listen address.
    #[arg(id = "metrics.addr", long = "metrics.addr", value_name = "ADDR")]
    pub addr: Option<IpAddr>,

    /// Metrics listen port.
    #[arg(id = "metrics.port", long = "metrics.port", value_name = "PORT")]
    pub port: Option<u16>,
}
