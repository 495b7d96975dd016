//! Core of the waypoint relay node.
//!
//! Holds everything the binary wires together: command line arguments,
//! TOML configuration, logging, metrics, the libp2p relay server and the
//! periodic membership reporter.

pub mod address;
pub mod args;
pub mod config;
pub mod constants;
pub mod identity;
pub mod logging;
pub mod prometheus;
pub mod network;
pub mod stats;

pub use config::{ConfigError, NodeConfig};
pub use network::{RelayBehaviour, RelayNode};
pub use stats::{ReporterConfig, spawn_membership_reporter};
