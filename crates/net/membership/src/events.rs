//! Membership events and non-blocking broadcast emitter.

use tokio::sync::broadcast;

use crate::PeerIdentifier;

/// Membership change published by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    /// Peer went from absent to present.
    Joined { peer: PeerIdentifier },
    /// Peer went from present to absent.
    Left { peer: PeerIdentifier },
}

impl MembershipEvent {
    pub fn peer(&self) -> &PeerIdentifier {
        match self {
            Self::Joined { peer } | Self::Left { peer } => peer,
        }
    }
}

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Non-blocking broadcast emitter. Slow subscribers drop events independently.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<MembershipEvent>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn emit(&self, event: MembershipEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.tx.subscribe()
    }

    pub fn peer_joined(&self, peer: PeerIdentifier) {
        self.emit(MembershipEvent::Joined { peer });
    }

    pub fn peer_left(&self, peer: PeerIdentifier) {
        self.emit(MembershipEvent::Left { peer });
    }
}
