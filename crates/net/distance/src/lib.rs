//! XOR distance over SHA-256 hashed identifiers.
//!
//! Identifiers of any shape (peer ids, relay ids) are hashed into a fixed 32-byte
//! [`IdDigest`]. The distance between two digests is their bitwise XOR read as a
//! big-endian unsigned 256-bit integer, as in Kademlia.
//!
//! # Properties
//!
//! - `distance(a, b) == distance(b, a)`
//! - `distance(a, a) == 0`, and zero only when both digests are identical
//! - distances are totally ordered by integer value

use std::cmp::Ordering;
use std::fmt;

use alloy_primitives::{B256, U256};
use sha2::{Digest, Sha256};

/// Size in bytes of an identifier digest.
pub const DIGEST_SIZE: usize = 32;

/// SHA-256 digest of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdDigest(B256);

impl IdDigest {
    /// Hash an identifier.
    pub fn of(id: impl AsRef<[u8]>) -> Self {
        Self(B256::from_slice(&Sha256::digest(id.as_ref())))
    }

    /// XOR distance to another digest.
    #[inline]
    pub fn distance(&self, other: &Self) -> Distance {
        let mut result = [0u8; DIGEST_SIZE];

        for (out, (&a, &b)) in result.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            *out = a ^ b;
        }

        Distance(U256::from_be_slice(&result))
    }
}

impl From<[u8; DIGEST_SIZE]> for IdDigest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(B256::from(bytes))
    }
}

impl fmt::Display for IdDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// XOR distance between two digests as a big-endian integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(U256);

impl Distance {
    pub const ZERO: Self = Self(U256::ZERO);

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_u256(&self) -> &U256 {
        &self.0
    }
}

impl From<Distance> for U256 {
    fn from(distance: Distance) -> Self {
        distance.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Distance between the digests of two identifiers.
pub fn distance(a: impl AsRef<[u8]>, b: impl AsRef<[u8]>) -> Distance {
    IdDigest::of(a).distance(&IdDigest::of(b))
}

/// Compares `x` and `y` by their distance to `target`.
///
/// Returns `Ordering::Less` when `x` is closer, `Ordering::Equal` when both are
/// equidistant (which only happens when `x == y`).
#[inline]
pub fn distance_cmp(target: &IdDigest, x: &IdDigest, y: &IdDigest) -> Ordering {
    for ((&t, &a), &b) in target.0.iter().zip(x.0.iter()).zip(y.0.iter()) {
        let dx = a ^ t;
        let dy = b ^ t;
        if dx != dy {
            return dx.cmp(&dy);
        }
    }

    Ordering::Equal
}
