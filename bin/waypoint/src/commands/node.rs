//! `waypoint node`: run the relay server until ctrl-c.

use std::sync::Arc;

use eyre::{Result, WrapErr, ensure};
use tracing::{info, warn};
use waypoint_net_membership::MembershipTracker;
use waypoint_node_core::{
    NodeConfig, RelayNode, ReporterConfig, args::NodeArgs, identity, prometheus,
    spawn_membership_reporter,
};
use waypoint_tasks::TaskManager;

pub(crate) async fn run(args: NodeArgs) -> Result<()> {
    let config = NodeConfig::from_args(&args)?;
    ensure!(
        config.selection.report_interval_secs > 0,
        "report interval must be at least one second"
    );

    if config.metrics.enabled {
        prometheus::install_prometheus_exporter(config.metrics_socket_addr())?;
    }

    let keypair = identity::node_keypair(config.network.identity_file.as_deref())?;
    let tracker = Arc::new(MembershipTracker::new());

    let mut manager = TaskManager::current();
    let executor = manager.executor();

    let mut node = RelayNode::new(&config, keypair, Arc::clone(&tracker)).await?;
    node.start_listening()?;

    let relay = executor.spawn_with_graceful_shutdown_signal("relay_swarm", |shutdown| {
        node.run(shutdown)
    });
    let reporter = spawn_membership_reporter(
        Arc::clone(&tracker),
        tracker.events().subscribe(),
        ReporterConfig::with_interval(config.selection.report_interval()),
        &executor,
    );

    tokio::signal::ctrl_c()
        .await
        .wrap_err("failed to listen for ctrl-c")?;
    info!("received ctrl-c, shutting down");
    manager.graceful_shutdown();

    for (name, handle) in [("relay_swarm", relay), ("membership_reporter", reporter)] {
        if let Err(err) = handle.await {
            warn!(task = name, %err, "task ended abnormally");
        }
    }
    Ok(())
}
