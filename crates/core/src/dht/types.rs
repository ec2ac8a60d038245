//! DHT types about `Peer` and `PeerRing`.
#![warn(missing_docs)]
use serde::Deserialize;
use serde::Serialize;

use super::did::Did;
use crate::error::Result;

/// A member of the ring: its network address and the identifier derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    /// Network address, `host:port`.
    pub address: String,
    /// `Did::hash(address)`.
    pub did: Did,
}

impl Peer {
    /// Create a peer from its address, deriving the identifier.
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let did = Did::hash(&address);
        Self { address, did }
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}@{}", self.did, self.address)
    }
}

/// Chord is a distributed hash table (DHT) algorithm that is designed to efficiently
/// distribute data across peer-to-peer network nodes. You may want to browse its
/// [wiki](https://en.wikipedia.org/wiki/Chord_(peer-to-peer)) before you read this.
///
/// In chordfs the key of Chord is either the identifier of a node or the identifier of
/// a filename. The node whose identifier is the first one at or after a key owns it.
///
/// Methods return an `Action` which is used to tell outer the extra action to take
/// after handling data inside the struct. The struct only knows its own pointers and
/// fingers, any hop to another node is carried out by the owner of the struct.
pub trait Chord<Action> {
    /// Ask DHT for the successor of Did, routing through the finger table.
    /// May return a remote action when another node knows better.
    fn find_successor(&self, did: Did) -> Result<Action>;

    /// Ask DHT for the successor of Did using only the successor pointer.
    /// Used while the finger table is being rebuilt.
    fn find_successor_basic(&self, did: Did) -> Result<Action>;
}
