//! Error of chordfs_core

use crate::dht::PeerRingAction;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in chordfs-core.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Unexpected reply of {0}")]
    UnexpectedReply(&'static str),

    #[error("Invalid identifier: {0}")]
    InvalidDid(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Node should not join itself")]
    ShouldNotJoinSelf,

    #[error("Node is already a member of the ring reached through {0}")]
    AlreadyJoined(String),

    #[error("Failed to get dht from a sync lock")]
    DHTSyncLockError,

    #[error("PeerRing got unexpected action: {0:?}")]
    PeerRingUnexpectedAction(PeerRingAction),

    #[error("Stabilizer is closed")]
    StabilizerClosed,

    #[error("Serde json error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code of the error, used when the error crosses the wire.
    pub fn code(&self) -> i64 {
        match self {
            Error::Transport(_) => 1,
            Error::NotFound(_) => 2,
            Error::IO(_) => 3,
            Error::Remote { code, .. } => *code,
            Error::UnexpectedReply(_) => 4,
            Error::InvalidDid(_) => 5,
            Error::InvalidFilename(_) => 6,
            Error::ShouldNotJoinSelf => 7,
            Error::AlreadyJoined(_) => 8,
            Error::DHTSyncLockError => 9,
            Error::PeerRingUnexpectedAction(_) => 10,
            Error::StabilizerClosed => 11,
            Error::Serde(_) => 13,
        }
    }

    /// Rebuild an error from a code and message received from a remote node.
    /// Only [Error::NotFound] keeps its own variant, since callers match on it.
    pub fn from_remote(code: i64, message: String) -> Self {
        if code == Error::NotFound(String::new()).code() {
            return Error::NotFound(message);
        }
        Error::Remote { code, message }
    }

    /// Returns `true` if the error is a [Error::NotFound].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
