//! libp2p relay server.
//!
//! The swarm runs circuit relay v2 alongside identify and ping. Connection
//! lifecycle events are translated into [`ConnectionEvent`]s for a
//! [`ConnectionObserver`], typically the membership tracker.
//!
//! # Transport Stack
//!
//! ```text
//! DNS (resolves /dns4/, /dns6/, /dnsaddr/)
//!   ├── TCP
//!   └── WebSocket over TCP
//!         └── Noise (encryption)
//!               └── Yamux (multiplexing)
//! ```

use std::{num::NonZeroU32, time::Duration};

use eyre::{Result, WrapErr};
use futures::StreamExt;
use libp2p::{
    Multiaddr, PeerId, Swarm, SwarmBuilder, identify,
    identity::{Keypair, PublicKey},
    noise, ping, relay,
    swarm::{NetworkBehaviour, SwarmEvent},
    tcp, yamux,
};
use tracing::{debug, info, trace, warn};
use waypoint_net_membership::{ConnectionEvent, ConnectionObserver, PeerIdentifier};
use waypoint_net_selector::{RelayCandidate, RelaySelector};
use waypoint_tasks::Shutdown;

use crate::{
    address,
    config::{NodeConfig, RelayLimits},
    constants::{DEFAULT_PING_INTERVAL_SECS, PROTOCOL_VERSION},
};

/// Combined network behaviour for the relay node.
#[derive(NetworkBehaviour)]
pub struct RelayBehaviour {
    /// Circuit relay v2 server.
    relay: relay::Behaviour,

    /// Identify protocol - exchange peer info and observed addresses.
    identify: identify::Behaviour,

    /// Ping protocol - liveness checks.
    ping: ping::Behaviour,
}

impl RelayBehaviour {
    pub fn new(local_public_key: PublicKey, limits: &RelayLimits) -> Self {
        let local_peer_id = local_public_key.to_peer_id();
        Self {
            relay: relay::Behaviour::new(local_peer_id, limits.to_relay_config()),
            identify: identify::Behaviour::new(
                identify::Config::new(PROTOCOL_VERSION.to_owned(), local_public_key)
                    .with_agent_version(format!("waypoint/{}", env!("CARGO_PKG_VERSION"))),
            ),
            ping: ping::Behaviour::new(
                ping::Config::new().with_interval(Duration::from_secs(DEFAULT_PING_INTERVAL_SECS)),
            ),
        }
    }
}

/// Observer notification for a newly established connection.
///
/// Only the first connection to a peer makes it a member.
pub fn connection_established(peer_id: &PeerId, num_established: NonZeroU32) -> Option<ConnectionEvent> {
    (num_established.get() == 1).then(|| ConnectionEvent::Connected(peer_identifier(peer_id)))
}

/// Observer notification for a closed connection.
///
/// A peer leaves once its last connection is gone.
pub fn connection_closed(peer_id: &PeerId, num_established: u32) -> Option<ConnectionEvent> {
    (num_established == 0).then(|| ConnectionEvent::Disconnected(peer_identifier(peer_id)))
}

pub fn peer_identifier(peer_id: &PeerId) -> PeerIdentifier {
    PeerIdentifier::from(peer_id.to_base58())
}

/// Nearest relay for a diagnostic log line. Unlike [`RelaySelector::select`]
/// this records nothing, so logging does not count as a fallback.
fn logged_relay<'a>(selector: &'a RelaySelector, peer: &PeerIdentifier) -> &'a str {
    selector
        .nearest(peer.as_str())
        .map_or(selector.fallback(), RelayCandidate::address)
}

/// Relay server driving a libp2p swarm.
pub struct RelayNode<O> {
    swarm: Swarm<RelayBehaviour>,
    observer: O,
    selector: RelaySelector,
    self_addr: Multiaddr,
    listen_addrs: Vec<Multiaddr>,
}

impl<O: ConnectionObserver> RelayNode<O> {
    /// Build the swarm. Nothing listens until [`RelayNode::start_listening`].
    pub async fn new(config: &NodeConfig, keypair: Keypair, observer: O) -> Result<Self> {
        let limits = config.relay.clone();
        let idle_timeout = config.network.idle_timeout();

        let swarm = SwarmBuilder::with_existing_identity(keypair)
            .with_tokio()
            .with_tcp(
                tcp::Config::default().nodelay(true),
                noise::Config::new,
                yamux::Config::default,
            )
            .wrap_err("failed to build tcp transport")?
            .with_dns()
            .wrap_err("failed to build dns transport")?
            .with_websocket(noise::Config::new, yamux::Config::default)
            .await
            .wrap_err("failed to build websocket transport")?
            .with_behaviour(|keypair| Ok(RelayBehaviour::new(keypair.public(), &limits)))
            .map_err(|err| eyre::eyre!("failed to build relay behaviour: {err}"))?
            .with_swarm_config(|cfg| cfg.with_idle_connection_timeout(idle_timeout))
            .build();

        let local_peer_id = *swarm.local_peer_id();
        let self_addr = address::self_relay_addr(&config.network, local_peer_id);
        let selector =
            RelaySelector::from_addresses(&config.selection.relays, self_addr.to_string());

        info!(%local_peer_id, %self_addr, relays = selector.candidates().len(), "relay node initialized");

        Ok(Self {
            swarm,
            observer,
            selector,
            self_addr,
            listen_addrs: address::listen_addrs(&config.network),
        })
    }

    pub fn local_peer_id(&self) -> &PeerId {
        self.swarm.local_peer_id()
    }

    /// Address peers should use to reach this relay.
    pub fn self_addr(&self) -> &Multiaddr {
        &self.self_addr
    }

    pub fn selector(&self) -> &RelaySelector {
        &self.selector
    }

    /// Address of the relay `target` should use.
    pub fn nearest_relay(&self, target: &str) -> &str {
        self.selector.select(target)
    }

    /// Start listening on the TCP and WebSocket addresses.
    pub fn start_listening(&mut self) -> Result<()> {
        for addr in &self.listen_addrs {
            self.swarm
                .listen_on(addr.clone())
                .wrap_err_with(|| format!("failed to listen on {addr}"))?;
            debug!(%addr, "listener requested");
        }
        Ok(())
    }

    /// Drive the swarm until the next listen address is reported.
    pub async fn next_listen_addr(&mut self) -> Option<Multiaddr> {
        loop {
            let event = self.swarm.next().await?;
            if let SwarmEvent::NewListenAddr { address, .. } = &event {
                let address = address.clone();
                self.handle_swarm_event(event);
                return Some(address);
            }
            self.handle_swarm_event(event);
        }
    }

    /// Run the event loop until `shutdown` resolves.
    pub async fn run(mut self, shutdown: Shutdown) {
        info!(peer_id = %self.local_peer_id(), "relay server started");
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("relay shutting down");
                    break;
                }
                event = self.swarm.select_next_some() => self.handle_swarm_event(event),
            }
        }
    }

    fn handle_swarm_event(&mut self, event: SwarmEvent<RelayBehaviourEvent>) {
        match event {
            SwarmEvent::NewListenAddr { address, .. } => {
                match address::full_addr(&address, *self.local_peer_id()) {
                    Some(full) => info!(address = %full, "listening"),
                    None => info!(%address, "listening"),
                }
            }
            SwarmEvent::ExpiredListenAddr { address, .. } => {
                info!(%address, "listen address expired");
            }
            SwarmEvent::ConnectionEstablished {
                peer_id,
                endpoint,
                num_established,
                ..
            } => {
                debug!(
                    %peer_id,
                    endpoint = %endpoint.get_remote_address(),
                    num_established,
                    "connection established"
                );
                if let Some(event) = connection_established(&peer_id, num_established) {
                    self.observer.on_event(&event);
                    debug!(
                        %peer_id,
                        relay = logged_relay(&self.selector, event.peer()),
                        "nearest relay for peer"
                    );
                }
            }
            SwarmEvent::ConnectionClosed {
                peer_id,
                cause,
                num_established,
                ..
            } => {
                debug!(%peer_id, num_established, ?cause, "connection closed");
                if let Some(event) = connection_closed(&peer_id, num_established) {
                    self.observer.on_event(&event);
                }
            }
            SwarmEvent::IncomingConnectionError {
                send_back_addr,
                error,
                ..
            } => {
                debug!(%send_back_addr, %error, "incoming connection failed");
            }
            SwarmEvent::OutgoingConnectionError { peer_id, error, .. } => {
                debug!(?peer_id, %error, "outgoing connection failed");
            }
            SwarmEvent::ListenerClosed {
                addresses, reason, ..
            } => {
                warn!(?addresses, ?reason, "listener closed");
            }
            SwarmEvent::ListenerError { error, .. } => {
                warn!(%error, "listener error");
            }
            SwarmEvent::ExternalAddrConfirmed { address } => {
                info!(%address, "external address confirmed");
            }
            SwarmEvent::Behaviour(event) => self.handle_behaviour_event(event),
            _ => {}
        }
    }

    fn handle_behaviour_event(&mut self, event: RelayBehaviourEvent) {
        match event {
            RelayBehaviourEvent::Relay(event) => handle_relay_event(event),
            RelayBehaviourEvent::Identify(identify::Event::Received { peer_id, info, .. }) => {
                debug!(
                    %peer_id,
                    agent_version = %info.agent_version,
                    observed_addr = %info.observed_addr,
                    "received identify info"
                );
                self.swarm.add_external_address(info.observed_addr);
            }
            RelayBehaviourEvent::Identify(identify::Event::Error { peer_id, error, .. }) => {
                debug!(%peer_id, %error, "identify error");
            }
            RelayBehaviourEvent::Identify(_) => {}
            RelayBehaviourEvent::Ping(ping::Event { peer, result, .. }) => match result {
                Ok(rtt) => trace!(%peer, ?rtt, "ping"),
                Err(error) => debug!(%peer, %error, "ping failed"),
            },
        }
    }
}

fn handle_relay_event(event: relay::Event) {
    match event {
        relay::Event::ReservationReqAccepted {
            src_peer_id,
            renewed,
            ..
        } => {
            info!(peer_id = %src_peer_id, renewed, "reservation accepted");
            metrics::counter!("relay.swarm.reservations_accepted_total").increment(1);
        }
        relay::Event::ReservationTimedOut { src_peer_id, .. } => {
            debug!(peer_id = %src_peer_id, "reservation timed out");
        }
        relay::Event::CircuitReqAccepted {
            src_peer_id,
            dst_peer_id,
            ..
        } => {
            info!(src = %src_peer_id, dst = %dst_peer_id, "circuit accepted");
            metrics::counter!("relay.swarm.circuits_accepted_total").increment(1);
        }
        relay::Event::CircuitClosed {
            src_peer_id,
            dst_peer_id,
            error,
            ..
        } => {
            debug!(src = %src_peer_id, dst = %dst_peer_id, ?error, "circuit closed");
        }
        other => debug!(event = ?other, "relay event"),
    }
}
