use clap::Args;

/// Overrides for the circuit relay resource limits.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
#[command(next_help_heading = "Relay limits")]
pub struct RelayArgs {
    /// Maximum number of active reservations.
    #[arg(long = "relay.max-reservations", value_name = "N")]
    pub max_reservations: Option<usize>,

    /// Maximum number of reservations held by a single peer.
    #[arg(long = "relay.max-reservations-per-peer", value_name = "N")]
    pub max_reservations_per_peer: Option<usize>,

    /// Reservation lifetime in seconds.
    #[arg(long = "relay.reservation-duration", value_name = "SECONDS")]
    pub reservation_duration_secs: Option<u64>,

    /// Maximum number of relayed circuits.
    #[arg(long = "relay.max-circuits", value_name = "N")]
    pub max_circuits: Option<usize>,

    /// Maximum number of circuits per peer.
    #[arg(long = "relay.max-circuits-per-peer", value_name = "N")]
    pub max_circuits_per_peer: Option<usize>,

    /// Maximum circuit lifetime in seconds.
    #[arg(long = "relay.max-circuit-duration", value_name = "SECONDS")]
    pub max_circuit_duration_secs: Option<u64>,

    /// Maximum bytes relayed per circuit.
    #[arg(long = "relay.max-circuit-bytes", value_name = "BYTES")]
    pub max_circuit_bytes: Option<u64>,
}
