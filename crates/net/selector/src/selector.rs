//! XOR-distance nearest relay selection with a self-address fallback.

use tracing::{debug, error, trace, warn};
use waypoint_net_distance::{IdDigest, distance_cmp};

use crate::candidate::{RelayCandidate, parse_candidates};

/// Chooses the nearest configured relay for a target peer.
///
/// Holds no mutable state: `select` takes `&self` and may be called from any
/// number of threads at once.
#[derive(Debug, Clone)]
pub struct RelaySelector {
    candidates: Vec<RelayCandidate>,
    fallback: String,
}

impl RelaySelector {
    /// Create a selector over already parsed candidates.
    pub fn new(candidates: Vec<RelayCandidate>, fallback: impl Into<String>) -> Self {
        Self {
            candidates,
            fallback: fallback.into(),
        }
    }

    /// Create a selector from raw relay addresses, dropping malformed ones.
    pub fn from_addresses<I, S>(addresses: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(parse_candidates(addresses), fallback)
    }

    pub fn candidates(&self) -> &[RelayCandidate] {
        &self.candidates
    }

    /// Address returned when no candidate can be chosen.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Full address of the relay nearest to `target`, or the fallback address.
    pub fn select(&self, target: &str) -> &str {
        nearest_address(target, &self.candidates, &self.fallback)
    }

    /// The nearest candidate, if any are configured.
    pub fn nearest(&self, target: &str) -> Option<&RelayCandidate> {
        nearest(&IdDigest::of(target), &self.candidates)
    }
}

/// Select the relay address nearest to `target` from raw candidate addresses.
///
/// Malformed addresses are skipped. With no usable candidate, `fallback` is
/// returned.
pub fn select_nearest_relay<S: AsRef<str>>(target: &str, candidates: &[S], fallback: &str) -> String {
    let candidates = parse_candidates(candidates);
    nearest_address(target, &candidates, fallback).to_owned()
}

/// Minimum-distance candidate. `min_by` keeps the first of equal elements, so
/// ties go to the earliest listed candidate.
fn nearest<'a>(target: &IdDigest, candidates: &'a [RelayCandidate]) -> Option<&'a RelayCandidate> {
    candidates
        .iter()
        .min_by(|a, b| distance_cmp(target, a.digest(), b.digest()))
}

fn nearest_address<'a>(target: &str, candidates: &'a [RelayCandidate], fallback: &'a str) -> &'a str {
    if target.is_empty() {
        warn!("selecting relay for an empty peer identifier");
    }

    let target_digest = IdDigest::of(target);
    let Some(winner) = nearest(&target_digest, candidates) else {
        debug!(%target, %fallback, "no relay candidates, using self");
        metrics::counter!("relay.selector.fallback_total").increment(1);
        return fallback;
    };

    // Resolve the winning identifier back to the first address that carries it.
    match candidates
        .iter()
        .find(|candidate| candidate.relay_id() == winner.relay_id())
    {
        Some(candidate) => {
            trace!(
                %target,
                relay = candidate.relay_id(),
                distance = %target_digest.distance(candidate.digest()),
                "selected nearest relay"
            );
            candidate.address()
        }
        None => {
            error!(%target, relay = winner.relay_id(), "winning relay has no address, using self");
            metrics::counter!("relay.selector.fallback_total").increment(1);
            fallback
        }
    }
}
