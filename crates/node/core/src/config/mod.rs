//! Relay node configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command line arguments and their environment variables.

mod metrics;
mod network;
mod relay;
mod selection;

pub use metrics::MetricsConfig;
pub use network::NetworkConfig;
pub use relay::{RateLimit, RelayLimits};
pub use selection::SelectionConfig;

use std::{
    fs, io,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::args::NodeArgs;

/// Errors from loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write config {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Complete relay node configuration (TOML-serializable).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub relay: RelayLimits,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl NodeConfig {
    /// Load configuration from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from file, then apply command line overrides.
    pub fn from_args(args: &NodeArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply_args(args);
        Ok(config)
    }

    /// Write the configuration as pretty TOML, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        fs::write(path, self.to_toml()?).map_err(write_err)
    }

    /// Render the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override values with those given on the command line.
    pub fn apply_args(&mut self, args: &NodeArgs) {
        self.network.apply_args(&args.network);
        self.relay.apply_args(&args.relay);
        self.selection.apply_args(&args.selection);
        self.metrics.apply_args(&args.metrics);
    }

    pub fn metrics_socket_addr(&self) -> SocketAddr {
        self.metrics.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{
        args::{NetworkArgs, SelectionArgs},
        constants::*,
    };

    #[test]
    fn test_defaults() {
        let config = NodeConfig::load(None).unwrap();
        assert_eq!(config.network.port, DEFAULT_TCP_PORT);
        assert_eq!(config.network.ws_port, DEFAULT_WS_PORT);
        assert_eq!(config.network.addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert!(config.network.public_host.is_none());
        assert_eq!(config.selection.report_interval_secs, DEFAULT_REPORT_INTERVAL_SECS);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("waypoint.toml");

        let mut config = NodeConfig::default();
        config.network.public_host = Some("relay.example.com".to_owned());
        config.selection.relays = vec!["/dns4/r1/tcp/9001/ws/p2p/AAA".to_owned()];
        config.relay.max_circuits = 3;
        config.save(&path).unwrap();

        let loaded = NodeConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoint.toml");
        fs::write(&path, "[network]\nport = 4001\n\n[relay]\nmax_circuits = 2\n").unwrap();

        let config = NodeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.network.port, 4001);
        assert_eq!(config.network.ws_port, DEFAULT_WS_PORT);
        assert_eq!(config.relay.max_circuits, 2);
        assert_eq!(config.relay.max_reservations, DEFAULT_MAX_RESERVATIONS);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert_matches!(NodeConfig::load(Some(&missing)), Err(ConfigError::Read { .. }));

        let invalid = dir.path().join("invalid.toml");
        fs::write(&invalid, "[network\nport = ").unwrap();
        assert_matches!(NodeConfig::load(Some(&invalid)), Err(ConfigError::Parse { .. }));
    }

    #[test]
    fn test_args_override_file() {
        let mut config = NodeConfig::default();
        config.selection.relays = vec!["/dns4/r1/tcp/1/p2p/AAA".to_owned()];

        config.apply_args(&NodeArgs {
            network: NetworkArgs {
                ws_port: Some(7001),
                public_host: Some("relay.example.com".to_owned()),
                ..Default::default()
            },
            selection: SelectionArgs {
                relays: vec!["/dns4/r2/tcp/1/p2p/BBB".to_owned()],
                report_interval_secs: Some(5),
            },
            ..Default::default()
        });

        assert_eq!(config.network.port, DEFAULT_TCP_PORT);
        assert_eq!(config.network.ws_port, 7001);
        assert_eq!(config.network.public_host.as_deref(), Some("relay.example.com"));
        assert_eq!(config.selection.relays, vec!["/dns4/r2/tcp/1/p2p/BBB"]);
        assert_eq!(config.selection.report_interval().as_secs(), 5);
    }

    #[test]
    fn test_blank_public_host_is_unset() {
        let mut config = NodeConfig::default();
        config.network.public_host = Some("old.example.com".to_owned());

        config.apply_args(&NodeArgs {
            network: NetworkArgs {
                public_host: Some("  ".to_owned()),
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(config.network.public_host.is_none());
    }
}
