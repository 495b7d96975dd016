#![cfg(not(loom))]
//! The connected-peers gauge must agree with the tracker once writers settle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use waypoint_net_membership::{MembershipTracker, PeerIdentifier};

const CONNECTED_PEERS: &str = "relay.membership.connected_peers";

/// Records only the connected-peers gauge; everything else is a no-op.
#[derive(Default)]
struct GaugeRecorder {
    connected: Arc<AtomicU64>,
}

impl Recorder for GaugeRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
        Counter::noop()
    }

    fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
        if key.name() == CONNECTED_PEERS {
            Gauge::from_arc(Arc::clone(&self.connected))
        } else {
            Gauge::noop()
        }
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[test]
fn gauge_matches_len_under_concurrent_writers() {
    const ROUNDS: usize = 200;
    const THREADS: usize = 8;
    const PEERS_PER_THREAD: usize = 20;

    let recorder = GaugeRecorder::default();
    let connected = Arc::clone(&recorder.connected);
    metrics::set_global_recorder(recorder).expect("recorder already installed");

    let tracker = MembershipTracker::new();
    let gauge = || f64::from_bits(connected.load(Ordering::SeqCst));

    for round in 0..ROUNDS {
        std::thread::scope(|s| {
            for t in 0..THREADS {
                let tracker = &tracker;
                s.spawn(move || {
                    for i in 0..PEERS_PER_THREAD {
                        tracker.record_connected(PeerIdentifier::from(format!("r{round}-t{t}-p{i}")));
                    }
                });
            }
        });
        assert_eq!(gauge(), tracker.len() as f64, "after connects in round {round}");

        std::thread::scope(|s| {
            for t in 0..THREADS {
                let tracker = &tracker;
                s.spawn(move || {
                    // Every other peer stays connected, so the set grows each round.
                    for i in (0..PEERS_PER_THREAD).step_by(2) {
                        tracker.record_disconnected(&PeerIdentifier::from(format!("r{round}-t{t}-p{i}")));
                    }
                });
            }
        });
        assert_eq!(gauge(), tracker.len() as f64, "after disconnects in round {round}");
    }

    assert_eq!(tracker.len(), ROUNDS * THREADS * PEERS_PER_THREAD / 2);
}
