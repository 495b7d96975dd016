use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque peer identifier. Any string is accepted; equality is byte-exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerIdentifier(Arc<str>);

impl PeerIdentifier {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PeerIdentifier {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl AsRef<str> for PeerIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PeerIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_exact_equality() {
        assert_eq!(PeerIdentifier::from("peerA"), PeerIdentifier::from("peerA".to_string()));
        assert_ne!(PeerIdentifier::from("peerA"), PeerIdentifier::from("peera"));
        assert_ne!(PeerIdentifier::from("peerA"), PeerIdentifier::from("peerA "));
    }

    #[test]
    fn test_accepts_any_string() {
        for raw in ["", "/", "\u{0}", "ünïcødé", "12D3KooWEyoppNCUx8Yx66oV9fJnriXwCcXwDDUA2kj6vnc6iDEp"] {
            let id = PeerIdentifier::new(raw);
            assert_eq!(id.as_str(), raw);
            assert_eq!(id.to_string(), raw);
        }
    }
}
