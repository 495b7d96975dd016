use thiserror::Error;

/// A relay address that cannot serve as a selection candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    #[error("relay address is empty")]
    Empty,

    #[error("relay address {address:?} does not end in /p2p/<id>")]
    MissingP2pComponent { address: String },

    #[error("relay address {address:?} has an empty relay identifier")]
    EmptyIdentifier { address: String },
}
