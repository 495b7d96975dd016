//! Nearest-relay selection.
//!
//! Picks, for a target peer, the configured relay whose identifier is closest in
//! XOR distance over SHA-256 digests. When nothing usable is configured the
//! caller's own relay address is returned instead, so a query always yields an
//! address.

mod candidate;
mod error;
mod selector;

pub use candidate::{P2P_PROTOCOL, RelayCandidate, parse_candidates};
pub use error::CandidateError;
pub use selector::{RelaySelector, select_nearest_relay};
