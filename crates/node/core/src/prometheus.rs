//! Prometheus exporter and metric descriptions.

use std::net::SocketAddr;

use eyre::{Result, WrapErr};
use metrics::{Unit, describe_counter, describe_gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

/// Install the global Prometheus recorder and serve it over HTTP at `addr`.
///
/// Must be called from within a tokio runtime.
pub fn install_prometheus_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .wrap_err_with(|| format!("failed to install prometheus exporter on {addr}"))?;

    describe_metrics();
    info!(%addr, "serving prometheus metrics");
    Ok(())
}

/// Register help text for the metrics this node records.
pub fn describe_metrics() {
    describe_gauge!(
        "relay.membership.connected_peers",
        Unit::Count,
        "Peers currently connected through this relay"
    );
    describe_counter!(
        "relay.membership.connected_total",
        Unit::Count,
        "Peers that joined the connected set"
    );
    describe_counter!(
        "relay.membership.disconnected_total",
        Unit::Count,
        "Peers that left the connected set"
    );
    describe_counter!(
        "relay.selector.fallback_total",
        Unit::Count,
        "Relay selections answered with the self address"
    );
    describe_counter!(
        "relay.selector.skipped_candidates_total",
        Unit::Count,
        "Malformed relay candidate addresses ignored"
    );
    describe_counter!(
        "relay.swarm.reservations_accepted_total",
        Unit::Count,
        "Relay reservations accepted"
    );
    describe_counter!(
        "relay.swarm.circuits_accepted_total",
        Unit::Count,
        "Relay circuits accepted"
    );
}
