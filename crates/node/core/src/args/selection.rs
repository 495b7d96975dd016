use clap::Args;

/// Relay candidates and membership reporting.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
#[command(next_help_heading = "Relay selection")]
pub struct SelectionArgs {
    /// Relay address ending in `/p2p/<relay id>`. Repeatable or comma separated.
    #[arg(long = "relay", value_delimiter = ',', value_name = "MULTIADDR")]
    pub relays: Vec<String>,

    /// Seconds between membership reports.
    #[arg(long = "report.interval", value_name = "SECONDS")]
    pub report_interval_secs: Option<u64>,
}
