//! Membership of peers connected through the local relay node.
//!
//! [`MembershipTracker`] owns the connected set behind a single reader/writer
//! lock. The transport layer drives it through the [`ConnectionObserver`] trait;
//! reporters only see it through [`MembershipView`].

pub mod events;
pub mod observer;
pub mod tracker;

mod identifier;
mod sync;

pub use events::{EventEmitter, MembershipEvent};
pub use identifier::PeerIdentifier;
pub use observer::{ConnectionEvent, ConnectionObserver, MembershipView};
pub use tracker::{MembershipTracker, Transition};
