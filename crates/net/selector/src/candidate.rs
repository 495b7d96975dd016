//! Relay addresses and the identifiers extracted from them.

use std::fmt;
use std::str::FromStr;

use tracing::warn;
use waypoint_net_distance::IdDigest;

use crate::error::CandidateError;

/// Protocol segment that precedes the relay identifier in an address.
pub const P2P_PROTOCOL: &str = "p2p";

/// A configured relay: its full address and the identity component at its end.
///
/// The identifier digest is computed once at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelayCandidate {
    address: String,
    relay_id: String,
    digest: IdDigest,
}

impl RelayCandidate {
    /// Parse a relay address of the form `.../p2p/<relay id>`.
    pub fn parse(address: impl Into<String>) -> Result<Self, CandidateError> {
        let address = address.into();
        if address.is_empty() {
            return Err(CandidateError::Empty);
        }

        let mut segments = address.rsplit('/');
        let relay_id = segments.next().unwrap_or_default();
        if segments.next() != Some(P2P_PROTOCOL) {
            return Err(CandidateError::MissingP2pComponent { address });
        }
        if relay_id.is_empty() {
            return Err(CandidateError::EmptyIdentifier { address });
        }

        let relay_id = relay_id.to_owned();
        let digest = IdDigest::of(&relay_id);

        Ok(Self {
            address,
            relay_id,
            digest,
        })
    }

    /// Full relay address as configured.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Trailing identity component of the address.
    pub fn relay_id(&self) -> &str {
        &self.relay_id
    }

    pub fn digest(&self) -> &IdDigest {
        &self.digest
    }
}

impl FromStr for RelayCandidate {
    type Err = CandidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RelayCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Parse relay addresses in order, skipping (and logging) malformed ones.
pub fn parse_candidates<I, S>(addresses: I) -> Vec<RelayCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    addresses
        .into_iter()
        .filter_map(|address| match RelayCandidate::parse(address.as_ref()) {
            Ok(candidate) => Some(candidate),
            Err(error) => {
                warn!(%error, "skipping malformed relay candidate");
                metrics::counter!("relay.selector.skipped_candidates_total").increment(1);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_parse_multiaddr_style() {
        let candidate: RelayCandidate = "/dns4/r1/tcp/1/ws/p2p/AAA".parse().unwrap();
        assert_eq!(candidate.address(), "/dns4/r1/tcp/1/ws/p2p/AAA");
        assert_eq!(candidate.relay_id(), "AAA");
        assert_eq!(candidate.digest(), &IdDigest::of("AAA"));
    }

    #[test]
    fn test_parse_real_peer_id() {
        let address = "/ip4/10.0.0.1/tcp/9000/p2p/12D3KooWEyoppNCUx8Yx66oV9fJnriXwCcXwDDUA2kj6vnc6iDEp";
        let candidate = RelayCandidate::parse(address).unwrap();
        assert_eq!(
            candidate.relay_id(),
            "12D3KooWEyoppNCUx8Yx66oV9fJnriXwCcXwDDUA2kj6vnc6iDEp"
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_matches!(RelayCandidate::parse(""), Err(CandidateError::Empty));
        assert_matches!(
            RelayCandidate::parse("/dns4/r1/tcp/1"),
            Err(CandidateError::MissingP2pComponent { .. })
        );
        assert_matches!(
            RelayCandidate::parse("AAA"),
            Err(CandidateError::MissingP2pComponent { .. })
        );
        assert_matches!(
            RelayCandidate::parse("/dns4/r1/tcp/1/p2p/"),
            Err(CandidateError::EmptyIdentifier { .. })
        );
    }

    #[test]
    fn test_parse_candidates_skips_malformed() {
        let candidates = parse_candidates([
            "/dns4/r1/tcp/1/ws/p2p/AAA",
            "not-an-address",
            "/dns4/r2/tcp/1/ws/p2p/BBB",
        ]);

        let ids: Vec<_> = candidates.iter().map(RelayCandidate::relay_id).collect();
        assert_eq!(ids, ["AAA", "BBB"]);
    }
}
