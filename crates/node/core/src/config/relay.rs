//! Circuit relay resource limits.

use std::{num::NonZeroU32, time::Duration};

use libp2p::relay;
use serde::{Deserialize, Serialize};

use crate::{args::RelayArgs, constants::*};

/// Token bucket style rate limit: `limit` requests per `interval_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: NonZeroU32,
    pub interval_secs: u64,
}

impl RateLimit {
    pub const fn new(limit: NonZeroU32, interval_secs: u64) -> Self {
        Self {
            limit,
            interval_secs,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Resource limits for the circuit relay (TOML-serializable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayLimits {
    pub max_reservations: usize,
    pub max_reservations_per_peer: usize,
    pub reservation_duration_secs: u64,
    pub max_circuits: usize,
    pub max_circuits_per_peer: usize,
    pub max_circuit_duration_secs: u64,
    pub max_circuit_bytes: u64,

    /// New reservations accepted per peer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_rate_per_peer: Option<RateLimit>,
    /// New reservations accepted per source IP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_rate_per_ip: Option<RateLimit>,
    /// New circuits accepted per source peer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_rate_per_peer: Option<RateLimit>,
    /// New circuits accepted per source IP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_rate_per_ip: Option<RateLimit>,
}

const PER_PEER_RATE: RateLimit = rate(30, 2 * 60);
const PER_IP_RATE: RateLimit = rate(60, 60);

const fn rate(limit: u32, interval_secs: u64) -> RateLimit {
    match NonZeroU32::new(limit) {
        Some(limit) => RateLimit::new(limit, interval_secs),
        None => panic!("rate limit must be non-zero"),
    }
}

impl Default for RelayLimits {
    fn default() -> Self {
        Self {
            max_reservations: DEFAULT_MAX_RESERVATIONS,
            max_reservations_per_peer: DEFAULT_MAX_RESERVATIONS_PER_PEER,
            reservation_duration_secs: DEFAULT_RESERVATION_DURATION.as_secs(),
            max_circuits: DEFAULT_MAX_CIRCUITS,
            max_circuits_per_peer: DEFAULT_MAX_CIRCUITS_PER_PEER,
            max_circuit_duration_secs: DEFAULT_MAX_CIRCUIT_DURATION.as_secs(),
            max_circuit_bytes: DEFAULT_MAX_CIRCUIT_BYTES,
            reservation_rate_per_peer: Some(PER_PEER_RATE),
            reservation_rate_per_ip: Some(PER_IP_RATE),
            circuit_rate_per_peer: Some(PER_PEER_RATE),
            circuit_rate_per_ip: Some(PER_IP_RATE),
        }
    }
}

impl RelayLimits {
    pub(crate) fn apply_args(&mut self, args: &RelayArgs) {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = args.$field {
                    self.$field = value;
                })*
            };
        }
        set!(
            max_reservations,
            max_reservations_per_peer,
            reservation_duration_secs,
            max_circuits,
            max_circuits_per_peer,
            max_circuit_duration_secs,
            max_circuit_bytes,
        );
    }

    /// Build the libp2p relay behaviour configuration.
    pub fn to_relay_config(&self) -> relay::Config {
        let mut config = relay::Config::default();
        config.max_reservations = self.max_reservations;
        config.max_reservations_per_peer = self.max_reservations_per_peer;
        config.reservation_duration = Duration::from_secs(self.reservation_duration_secs);
        config.max_circuits = self.max_circuits;
        config.max_circuits_per_peer = self.max_circuits_per_peer;
        config.max_circuit_duration = Duration::from_secs(self.max_circuit_duration_secs);
        config.max_circuit_bytes = self.max_circuit_bytes;

        // Replace the built-in limiters with the configured ones.
        config.reservation_rate_limiters.clear();
        config.circuit_src_rate_limiters.clear();

        if let Some(rate) = self.reservation_rate_per_peer {
            config = config.reservation_rate_per_peer(rate.limit, rate.interval());
        }
        if let Some(rate) = self.reservation_rate_per_ip {
            config = config.reservation_rate_per_ip(rate.limit, rate.interval());
        }
        if let Some(rate) = self.circuit_rate_per_peer {
            config = config.circuit_src_per_peer(rate.limit, rate.interval());
        }
        if let Some(rate) = self.circuit_rate_per_ip {
            config = config.circuit_src_per_ip(rate.limit, rate.interval());
        }
        config
    }
}
