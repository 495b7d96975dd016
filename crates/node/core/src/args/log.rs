//! Logging CLI arguments.

use clap::Args;

/// Logging configuration.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq)]
#[command(next_help_heading = "Logging")]
pub struct LogArgs {
    /// Silence all output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Log filter directive (e.g., "waypoint=debug,libp2p=info").
    #[arg(long = "log.filter", value_name = "DIRECTIVE", global = true)]
    pub filter: Option<String>,

    /// Use JSON format for log output.
    #[arg(long = "log.json", global = true)]
    pub json: bool,
}

impl LogArgs {
    /// Base level implied by the verbosity flags.
    pub fn base_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
