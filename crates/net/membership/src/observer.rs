//! Seams between the transport layer, the tracker and its readers.

use auto_impl::auto_impl;

use crate::PeerIdentifier;

/// Connection notification delivered by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected(PeerIdentifier),
    Disconnected(PeerIdentifier),
}

impl ConnectionEvent {
    pub fn peer(&self) -> &PeerIdentifier {
        match self {
            Self::Connected(peer) | Self::Disconnected(peer) => peer,
        }
    }
}

/// Receives connect/disconnect notifications.
///
/// Implementations must tolerate arbitrary interleaving across peers and
/// repeated or spurious notifications for the same peer.
#[auto_impl(&, Arc)]
pub trait ConnectionObserver: Send + Sync {
    fn on_connected(&self, peer: &PeerIdentifier);

    fn on_disconnected(&self, peer: &PeerIdentifier);

    /// Dispatch a [`ConnectionEvent`] to the matching callback.
    fn on_event(&self, event: &ConnectionEvent) {
        match event {
            ConnectionEvent::Connected(peer) => self.on_connected(peer),
            ConnectionEvent::Disconnected(peer) => self.on_disconnected(peer),
        }
    }
}

/// Read-only access to the connected set.
#[auto_impl(&, Arc)]
pub trait MembershipView: Send + Sync {
    /// Point-in-time copy of the connected peers.
    fn snapshot(&self) -> Vec<PeerIdentifier>;

    fn connected_count(&self) -> usize;
}
