//! Relay candidates and membership reporting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{args::SelectionArgs, constants::DEFAULT_REPORT_INTERVAL_SECS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Relay addresses, each ending in `/p2p/<relay id>`
    #[serde(default)]
    pub relays: Vec<String>,

    /// Seconds between membership reports
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            relays: Vec::new(),
            report_interval_secs: default_report_interval(),
        }
    }
}

impl SelectionConfig {
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub(crate) fn apply_args(&mut self, args: &SelectionArgs) {
        if !args.relays.is_empty() {
            self.relays = args.relays.clone();
        }
        if let Some(secs) = args.report_interval_secs {
            self.report_interval_secs = secs;
        }
    }
}

fn default_report_interval() -> u64 {
    DEFAULT_REPORT_INTERVAL_SECS
}
