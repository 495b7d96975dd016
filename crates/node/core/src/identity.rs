//! Node keypair handling.

use std::{fs, path::Path};

use eyre::{Result, WrapErr};
use libp2p::identity::Keypair;
use tracing::info;

/// Load the keypair stored at `path`, or create and persist a new ed25519 one.
pub fn load_or_create_keypair(path: &Path) -> Result<Keypair> {
    if path.exists() {
        let bytes = fs::read(path)
            .wrap_err_with(|| format!("failed to read identity {}", path.display()))?;
        let keypair = Keypair::from_protobuf_encoding(&bytes)
            .wrap_err_with(|| format!("invalid identity {}", path.display()))?;
        info!(path = %path.display(), peer_id = %keypair.public().to_peer_id(), "loaded identity");
        return Ok(keypair);
    }

    let keypair = Keypair::generate_ed25519();
    let bytes = keypair
        .to_protobuf_encoding()
        .wrap_err("failed to encode identity")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
        .wrap_err_with(|| format!("failed to write identity {}", path.display()))?;

    info!(path = %path.display(), peer_id = %keypair.public().to_peer_id(), "created identity");
    Ok(keypair)
}

/// Keypair for this run: persisted when `path` is set, otherwise ephemeral.
pub fn node_keypair(path: Option<&Path>) -> Result<Keypair> {
    match path {
        Some(path) => load_or_create_keypair(path),
        None => Ok(Keypair::generate_ed25519()),
    }
}
