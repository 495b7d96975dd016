//! Listen and advertised addresses.

use std::borrow::Cow;

use libp2p::{Multiaddr, PeerId, multiaddr::Protocol};

use crate::config::NetworkConfig;

/// TCP listener address.
pub fn tcp_listen_addr(config: &NetworkConfig) -> Multiaddr {
    Multiaddr::empty()
        .with(Protocol::from(config.addr))
        .with(Protocol::Tcp(config.port))
}

/// WebSocket listener address.
pub fn ws_listen_addr(config: &NetworkConfig) -> Multiaddr {
    Multiaddr::empty()
        .with(Protocol::from(config.addr))
        .with(Protocol::Tcp(config.ws_port))
        .with(Protocol::Ws(Cow::Borrowed("/")))
}

pub fn listen_addrs(config: &NetworkConfig) -> Vec<Multiaddr> {
    vec![tcp_listen_addr(config), ws_listen_addr(config)]
}

/// `addr` with a trailing `/p2p/<peer_id>`.
///
/// Addresses already ending in this peer's id are returned unchanged;
/// addresses naming a different peer are returned as `None`.
pub fn full_addr(addr: &Multiaddr, peer_id: PeerId) -> Option<Multiaddr> {
    addr.clone().with_p2p(peer_id).ok()
}

/// Address peers should use to reach this relay.
///
/// With a public host this is `/dns4/<host>/tcp/<ws port>/ws/p2p/<id>`;
/// otherwise the TCP listener address with this node's id appended.
pub fn self_relay_addr(config: &NetworkConfig, peer_id: PeerId) -> Multiaddr {
    let base = match config.public_host.as_deref() {
        Some(host) => Multiaddr::empty()
            .with(Protocol::Dns4(Cow::Owned(host.to_owned())))
            .with(Protocol::Tcp(config.ws_port))
            .with(Protocol::Ws(Cow::Borrowed("/"))),
        None => tcp_listen_addr(config),
    };
    base.with(Protocol::P2p(peer_id))
}
