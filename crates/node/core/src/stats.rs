//! Periodic membership reporting.

use std::{fmt::Write, sync::Arc, time::Duration};

use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tracing::{debug, info, trace, warn};
use waypoint_net_membership::{MembershipEvent, MembershipView, PeerIdentifier};
use waypoint_tasks::TaskExecutor;

use crate::constants::DEFAULT_REPORT_INTERVAL_SECS;

/// Peers listed by name in a single report line.
const MAX_LISTED_PEERS: usize = 16;

/// Reporter configuration.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Interval between reports.
    pub interval: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_REPORT_INTERVAL_SECS),
        }
    }
}

impl ReporterConfig {
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Joins and leaves seen since the previous report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Churn {
    joined: u64,
    left: u64,
    /// Events dropped because the reporter fell behind the broadcast channel.
    missed: u64,
}

impl Churn {
    fn record(&mut self, event: &MembershipEvent) {
        trace!(peer = %event.peer(), "membership event");
        match event {
            MembershipEvent::Joined { .. } => self.joined += 1,
            MembershipEvent::Left { .. } => self.left += 1,
        }
    }
}

/// Spawns a background task that logs the connected set every interval.
///
/// The task reads through `view`, counts joins and leaves from `events`
/// between reports, and exits once the executor's shutdown signal fires. A
/// closed event channel only stops the churn counts; reports continue.
pub fn spawn_membership_reporter<V>(
    view: Arc<V>,
    events: broadcast::Receiver<MembershipEvent>,
    config: ReporterConfig,
    executor: &TaskExecutor,
) -> JoinHandle<()>
where
    V: MembershipView + ?Sized + 'static,
{
    executor.spawn_with_graceful_shutdown_signal("membership_reporter", |shutdown| async move {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut events = Some(events);
        let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
        let mut churn = Churn::default();

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("membership reporter shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    log_membership(&*view, &churn);
                    churn = Churn::default();
                }
                result = next_event(&mut events) => match result {
                    Ok(event) => churn.record(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "membership reporter lagged behind events");
                        churn.missed += skipped;
                    }
                    Err(RecvError::Closed) => {
                        debug!("membership event channel closed");
                        events = None;
                    }
                },
            }
        }
    })
}

/// Next event from `events`, or never once the channel is gone.
async fn next_event(
    events: &mut Option<broadcast::Receiver<MembershipEvent>>,
) -> Result<MembershipEvent, RecvError> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn log_membership<V: MembershipView + ?Sized>(view: &V, churn: &Churn) {
    let peers = view.snapshot();
    info!(
        connected = peers.len(),
        joined = churn.joined,
        left = churn.left,
        missed = churn.missed,
        peers = %summarize(&peers, MAX_LISTED_PEERS),
        "relay membership"
    );
}

/// Comma separated peer list, truncated after `max` entries.
fn summarize(peers: &[PeerIdentifier], max: usize) -> String {
    if peers.is_empty() {
        return "(none)".to_owned();
    }

    let mut out = String::new();
    for (i, peer) in peers.iter().take(max).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(peer.as_str());
    }
    if peers.len() > max {
        let _ = write!(out, " (+{} more)", peers.len() - max);
    }
    out
}
