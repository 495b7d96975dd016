//! Connected-peer set behind a single reader/writer lock.

use hashlink::LinkedHashSet;
use tracing::{debug, info};

use crate::events::EventEmitter;
use crate::observer::{ConnectionObserver, MembershipView};
use crate::sync::RwLock;
use crate::PeerIdentifier;

/// Outcome of a connect or disconnect notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Transition {
    /// Absent -> Present.
    Joined,
    /// Present -> Absent.
    Left,
    /// Duplicate connect or spurious disconnect.
    Unchanged,
}

/// Set of peers connected through the local relay.
///
/// Writers (`record_connected`, `record_disconnected`) take the lock exclusively;
/// readers share it. Peers are kept in the order they joined.
#[derive(Debug, Default)]
pub struct MembershipTracker {
    peers: RwLock<LinkedHashSet<PeerIdentifier>>,
    events: EventEmitter,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `peer` as connected. Idempotent.
    pub fn record_connected(&self, peer: PeerIdentifier) -> Transition {
        let joined = {
            let mut peers = self.peers.write();
            // `insert` moves an existing entry to the back; keep the first join position.
            if peers.contains(&peer) {
                None
            } else {
                peers.insert(peer.clone());
                let count = peers.len();
                // Gauge and events are published under the lock, in mutation order.
                metrics::gauge!("relay.membership.connected_peers").set(count as f64);
                self.events.peer_joined(peer.clone());
                Some(count)
            }
        };

        let Some(count) = joined else {
            debug!(%peer, "peer already connected");
            return Transition::Unchanged;
        };

        info!(%peer, connected = count, "peer connected");
        metrics::counter!("relay.membership.connected_total").increment(1);
        Transition::Joined
    }

    /// Mark `peer` as disconnected. Idempotent.
    pub fn record_disconnected(&self, peer: &PeerIdentifier) -> Transition {
        let left = {
            let mut peers = self.peers.write();
            if peers.remove(peer) {
                let count = peers.len();
                metrics::gauge!("relay.membership.connected_peers").set(count as f64);
                self.events.peer_left(peer.clone());
                Some(count)
            } else {
                None
            }
        };

        let Some(count) = left else {
            debug!(%peer, "disconnect for unknown peer");
            return Transition::Unchanged;
        };

        info!(%peer, connected = count, "peer disconnected");
        metrics::counter!("relay.membership.disconnected_total").increment(1);
        Transition::Left
    }

    /// Point-in-time copy of the connected peers, in join order.
    pub fn snapshot(&self) -> Vec<PeerIdentifier> {
        self.peers.read().iter().cloned().collect()
    }

    pub fn contains(&self, peer: &str) -> bool {
        self.peers.read().contains(peer)
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }
}

impl ConnectionObserver for MembershipTracker {
    fn on_connected(&self, peer: &PeerIdentifier) {
        self.record_connected(peer.clone());
    }

    fn on_disconnected(&self, peer: &PeerIdentifier) {
        self.record_disconnected(peer);
    }
}

impl MembershipView for MembershipTracker {
    fn snapshot(&self) -> Vec<PeerIdentifier> {
        MembershipTracker::snapshot(self)
    }

    fn connected_count(&self) -> usize {
        self.len()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;
    use crate::{ConnectionEvent, MembershipEvent};

    fn peer(id: &str) -> PeerIdentifier {
        PeerIdentifier::from(id)
    }

    #[test]
    fn test_starts_empty() {
        let tracker = MembershipTracker::new();
        assert!(tracker.is_empty());
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_connect_is_idempotent() {
        let tracker = MembershipTracker::new();

        assert_eq!(tracker.record_connected(peer("peerA")), Transition::Joined);
        assert_eq!(tracker.record_connected(peer("peerA")), Transition::Unchanged);

        assert_eq!(tracker.snapshot(), vec![peer("peerA")]);
    }

    #[test]
    fn test_disconnect_before_connect_is_noop() {
        let tracker = MembershipTracker::new();
        tracker.record_connected(peer("peerA"));

        assert_eq!(tracker.record_disconnected(&peer("peerB")), Transition::Unchanged);
        assert_eq!(tracker.snapshot(), vec![peer("peerA")]);

        let empty = MembershipTracker::new();
        assert_eq!(empty.record_disconnected(&peer("peerB")), Transition::Unchanged);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_connect_disconnect_cycle() {
        let tracker = MembershipTracker::new();

        assert_eq!(tracker.record_connected(peer("peerA")), Transition::Joined);
        assert!(tracker.contains("peerA"));
        assert_eq!(tracker.record_disconnected(&peer("peerA")), Transition::Left);
        assert!(!tracker.contains("peerA"));
        assert_eq!(tracker.record_disconnected(&peer("peerA")), Transition::Unchanged);
        assert_eq!(tracker.record_connected(peer("peerA")), Transition::Joined);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_snapshot_keeps_join_order() {
        let tracker = MembershipTracker::new();
        for id in ["a", "b", "c"] {
            tracker.record_connected(peer(id));
        }
        tracker.record_disconnected(&peer("b"));
        tracker.record_connected(peer("b"));
        tracker.record_connected(peer("a"));

        assert_eq!(tracker.snapshot(), vec![peer("a"), peer("c"), peer("b")]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let tracker = MembershipTracker::new();
        tracker.record_connected(peer("peerA"));

        let mut snapshot = tracker.snapshot();
        snapshot.clear();
        snapshot.push(peer("intruder"));

        assert_eq!(tracker.snapshot(), vec![peer("peerA")]);
        assert!(!tracker.contains("intruder"));
    }

    #[test]
    fn test_observer_dispatch() {
        let tracker = MembershipTracker::new();
        let observer: &dyn ConnectionObserver = &tracker;

        observer.on_event(&ConnectionEvent::Connected(peer("peerA")));
        observer.on_event(&ConnectionEvent::Connected(peer("peerB")));
        observer.on_event(&ConnectionEvent::Disconnected(peer("peerA")));

        assert_eq!(MembershipView::snapshot(&tracker), vec![peer("peerB")]);
        assert_eq!(tracker.connected_count(), 1);
    }

    #[test]
    fn test_transition_labels() {
        assert_eq!(Transition::Joined.as_ref(), "joined");
        assert_eq!(Transition::Unchanged.as_ref(), "unchanged");
    }

    #[tokio::test]
    async fn test_events_only_on_transitions() {
        let tracker = MembershipTracker::new();
        let mut rx = tracker.events().subscribe();

        tracker.record_connected(peer("peerA"));
        tracker.record_connected(peer("peerA"));
        tracker.record_disconnected(&peer("peerB"));
        tracker.record_disconnected(&peer("peerA"));

        assert_matches!(rx.recv().await, Ok(MembershipEvent::Joined { peer }) if peer.as_str() == "peerA");
        assert_matches!(rx.recv().await, Ok(MembershipEvent::Left { peer }) if peer.as_str() == "peerA");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_events_follow_mutation_order() {
        const THREADS: usize = 4;
        const CYCLES: usize = 25;

        let tracker = MembershipTracker::new();
        let mut rx = tracker.events().subscribe();
        let shared = peer("shared");

        std::thread::scope(|s| {
            for _ in 0..THREADS {
                let (tracker, shared) = (&tracker, &shared);
                s.spawn(move || {
                    for _ in 0..CYCLES {
                        tracker.record_connected(shared.clone());
                        tracker.record_disconnected(shared);
                    }
                });
            }
        });

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert!(!events.is_empty());
        for (i, event) in events.iter().enumerate() {
            if i % 2 == 0 {
                assert_matches!(event, MembershipEvent::Joined { .. }, "event {i}");
            } else {
                assert_matches!(event, MembershipEvent::Left { .. }, "event {i}");
            }
        }
        assert_eq!(events.len() % 2, 0);
        assert!(tracker.is_empty());
    }

    /// Random interleavings only. `loom_tests` explores them exhaustively
    /// under `RUSTFLAGS="--cfg loom"`.
    #[test]
    fn test_concurrent_mutation() {
        const THREADS: usize = 8;
        const PEERS: usize = 250;

        let tracker = MembershipTracker::new();

        std::thread::scope(|s| {
            for t in 0..THREADS {
                let tracker = &tracker;
                s.spawn(move || {
                    let ids: Vec<_> = (0..PEERS).map(|p| peer(&format!("t{t}-p{p}"))).collect();
                    for id in &ids {
                        tracker.on_disconnected(id);
                        tracker.on_connected(id);
                        tracker.on_connected(id);
                        let _ = tracker.snapshot();
                    }
                    // Odd peers leave again.
                    for id in ids.iter().skip(1).step_by(2) {
                        tracker.on_disconnected(id);
                        tracker.on_disconnected(id);
                    }
                });
            }
        });

        let expected: HashSet<_> = (0..THREADS)
            .flat_map(|t| (0..PEERS).step_by(2).map(move |p| peer(&format!("t{t}-p{p}"))))
            .collect();
        let snapshot = tracker.snapshot();
        let actual: HashSet<_> = snapshot.iter().cloned().collect();

        assert_eq!(snapshot.len(), actual.len(), "snapshot contains duplicates");
        assert_eq!(actual, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tasks_with_readers() {
        let tracker = Arc::new(MembershipTracker::new());

        let writers: Vec<_> = (0..16)
            .map(|t| {
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move {
                    for p in 0..100 {
                        let id = peer(&format!("w{t}-{p}"));
                        tracker.on_connected(&id);
                        if p % 4 == 0 {
                            tracker.on_disconnected(&id);
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        let reader = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                for _ in 0..200 {
                    let snapshot = tracker.snapshot();
                    let unique: HashSet<_> = snapshot.iter().collect();
                    assert_eq!(unique.len(), snapshot.len());
                    tokio::task::yield_now().await;
                }
            })
        };

        for writer in writers {
            writer.await.unwrap();
        }
        reader.await.unwrap();

        assert_eq!(tracker.connected_count(), 16 * 75);
    }
}

#[cfg(all(test, loom))]
mod loom_tests {
    use loom::sync::Arc;
    use loom::thread;

    use super::*;

    fn peer(id: &str) -> PeerIdentifier {
        PeerIdentifier::from(id)
    }

    #[test]
    fn connect_disconnect_snapshot() {
        loom::model(|| {
            let tracker = Arc::new(MembershipTracker::new());

            let churn = {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    tracker.record_connected(peer("a"));
                    tracker.record_disconnected(&peer("a"));
                })
            };
            let join = {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    tracker.record_connected(peer("b"));
                    let snapshot = tracker.snapshot();
                    assert!(snapshot.contains(&peer("b")));
                    assert!(snapshot.len() <= 2);
                })
            };

            churn.join().unwrap();
            join.join().unwrap();
            assert_eq!(tracker.snapshot(), vec![peer("b")]);
        });
    }

    #[test]
    fn duplicate_connects_join_once() {
        loom::model(|| {
            let tracker = Arc::new(MembershipTracker::new());

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let tracker = Arc::clone(&tracker);
                    thread::spawn(move || tracker.record_connected(peer("a")))
                })
                .collect();
            let joined = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|t| *t == Transition::Joined)
                .count();

            assert_eq!(joined, 1);
            assert_eq!(tracker.len(), 1);
        });
    }
}
