//! Constants used throughout the relay node.
//!
//! Relay limit defaults mirror the ones libp2p's circuit relay v2 ships with.

use std::time::Duration;

// =============================================================================
// Network Ports
// =============================================================================

/// Default port for plain TCP connections.
pub const DEFAULT_TCP_PORT: u16 = 9000;

/// Default port for WebSocket connections.
pub const DEFAULT_WS_PORT: u16 = 9001;

/// Default port for the Prometheus exporter.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

// =============================================================================
// Network Addresses
// =============================================================================

/// Default listen address for P2P connections (all interfaces).
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0";

/// Default bind address for local-only services (metrics).
pub const DEFAULT_LOCALHOST_ADDR: &str = "127.0.0.1";

// =============================================================================
// Network Timeouts & Intervals
// =============================================================================

/// Default connection idle timeout in seconds.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

/// Default ping interval in seconds.
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 15;

/// Default interval between membership reports in seconds.
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 30;

// =============================================================================
// Relay Limits
// =============================================================================

pub const DEFAULT_MAX_RESERVATIONS: usize = 128;
pub const DEFAULT_MAX_RESERVATIONS_PER_PEER: usize = 4;
pub const DEFAULT_RESERVATION_DURATION: Duration = Duration::from_secs(60 * 60);

pub const DEFAULT_MAX_CIRCUITS: usize = 16;
pub const DEFAULT_MAX_CIRCUITS_PER_PEER: usize = 4;
pub const DEFAULT_MAX_CIRCUIT_DURATION: Duration = Duration::from_secs(2 * 60);
pub const DEFAULT_MAX_CIRCUIT_BYTES: u64 = 1 << 17;

// =============================================================================
// Protocol Identification
// =============================================================================

/// Protocol version string for identify protocol.
pub const PROTOCOL_VERSION: &str = "/waypoint/1.0.0";
