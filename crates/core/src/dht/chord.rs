//! Chord algorithm implement.
#![warn(missing_docs)]
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Deserialize;
use serde::Serialize;

use super::types::Chord;
use super::types::Peer;
use super::FingerTable;
use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;

/// PeerRing is used to help a node interact with other nodes.
/// All nodes in the network form a clockwise ring in the order of Did.
/// This struct takes its name from that.
/// PeerRing implemented [Chord] algorithm.
pub struct PeerRing {
    /// The current node.
    pub peer: Peer,
    /// [FingerTable] help node to find successor quickly.
    pub finger: Arc<Mutex<FingerTable>>,
    /// The next node on the ring.
    pub successor: Arc<Mutex<Peer>>,
    /// The previous node on the ring.
    pub predecessor: Arc<Mutex<Peer>>,
}

/// `PeerRing` use this to describe the result of [Chord] algorithm. Sometimes it's a
/// direct result, sometimes it's an action that is continued externally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerRingAction {
    /// Found the owner.
    Some(Peer),
    /// Trigger a remote action on the target peer.
    RemoteAction(Peer, RemoteAction),
}

/// Some of the process needs to be done remotely. This enum is used to describe that.
/// The answer of the remote peer is the final answer, there is no callback into
/// `PeerRing`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteAction {
    /// Need the target to run `Lookup` for the did.
    FindSuccessor(Did),
    /// Need the target to run `LookupBasic` for the did.
    FindSuccessorBasic(Did),
}

/// Membership state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingState {
    /// Successor and predecessor are the node itself.
    Solitary,
    /// The node knows at least one other member.
    Joined,
}

impl PeerRingAction {
    /// Returns `true` if the action is a [PeerRingAction::Some] value.
    pub fn is_some(&self) -> bool {
        if let Self::Some(_) = self {
            return true;
        }
        false
    }

    /// Returns `true` if the action is a [PeerRingAction::RemoteAction] value.
    pub fn is_remote(&self) -> bool {
        if let Self::RemoteAction(..) = self {
            return true;
        }
        false
    }
}

impl PeerRing {
    /// Create a new solitary ring of one node listening on `address`.
    pub fn new(address: impl Into<String>) -> Self {
        let peer = Peer::new(address);
        Self {
            finger: Arc::new(Mutex::new(FingerTable::new(&peer))),
            successor: Arc::new(Mutex::new(peer.clone())),
            predecessor: Arc::new(Mutex::new(peer.clone())),
            peer,
        }
    }

    /// Did of current node.
    pub fn did(&self) -> Did {
        self.peer.did
    }

    /// Lock and return MutexGuard of finger table.
    pub fn lock_finger(&self) -> Result<MutexGuard<FingerTable>> {
        self.finger.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of successor.
    pub fn lock_successor(&self) -> Result<MutexGuard<Peer>> {
        self.successor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of predecessor.
    pub fn lock_predecessor(&self) -> Result<MutexGuard<Peer>> {
        self.predecessor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// getter
    pub fn successor(&self) -> Result<Peer> {
        Ok(self.lock_successor()?.clone())
    }

    /// getter
    pub fn predecessor(&self) -> Result<Peer> {
        Ok(self.lock_predecessor()?.clone())
    }

    /// Point the successor at `peer`, returning the peer written.
    pub fn set_successor(&self, peer: Peer) -> Result<Peer> {
        tracing::debug!("{} set successor to {}", self.peer, peer);
        *self.lock_successor()? = peer.clone();
        Ok(peer)
    }

    /// Point the predecessor at `peer`, returning the peer written.
    pub fn set_predecessor(&self, peer: Peer) -> Result<Peer> {
        tracing::debug!("{} set predecessor to {}", self.peer, peer);
        *self.lock_predecessor()? = peer.clone();
        Ok(peer)
    }

    /// Snapshot of the finger table.
    pub fn finger_table(&self) -> Result<FingerTable> {
        Ok(self.lock_finger()?.clone())
    }

    /// Swap in a freshly computed finger table.
    pub fn replace_finger(&self, table: FingerTable) -> Result<()> {
        *self.lock_finger()? = table;
        Ok(())
    }

    /// A node is solitary when its successor carries its own identifier.
    pub fn is_solitary(&self) -> Result<bool> {
        Ok(self.lock_successor()?.did == self.peer.did)
    }

    /// Current membership state.
    pub fn state(&self) -> Result<RingState> {
        let successor = self.successor()?;
        let predecessor = self.predecessor()?;
        if successor == self.peer && predecessor == self.peer {
            Ok(RingState::Solitary)
        } else {
            Ok(RingState::Joined)
        }
    }

    /// Forget every other member: pointers and fingers point to the node itself.
    pub fn reset(&self) -> Result<()> {
        self.set_successor(self.peer.clone())?;
        self.set_predecessor(self.peer.clone())?;
        self.replace_finger(FingerTable::new(&self.peer))
    }
}

impl Chord<PeerRingAction> for PeerRing {
    /// Find the owner of `did`.
    ///
    /// A solitary node owns everything. A key between the node and its first finger
    /// belongs to that finger. Otherwise the request is handed once to the lower end of
    /// the first pair of adjacent fingers enclosing the key, or to the last finger, and
    /// that peer's answer is final. A delegate equal to the node itself falls back to
    /// walking the successor pointer.
    fn find_successor(&self, did: Did) -> Result<PeerRingAction> {
        if self.is_solitary()? {
            return Ok(PeerRingAction::Some(self.successor()?));
        }
        let finger = self.lock_finger()?;
        let first = finger.first();
        if did.in_range(self.peer.did, first.did) {
            return Ok(PeerRingAction::Some(first.clone()));
        }
        let next = finger.closest_delegate(did).clone();
        drop(finger);
        // Fingers not yet recalculated still point at the node itself.
        if next.did == self.peer.did {
            return self.find_successor_basic(did);
        }
        Ok(PeerRingAction::RemoteAction(
            next,
            RemoteAction::FindSuccessor(did),
        ))
    }

    fn find_successor_basic(&self, did: Did) -> Result<PeerRingAction> {
        let successor = self.successor()?;
        if successor.did == self.peer.did || did.in_range(self.peer.did, successor.did) {
            return Ok(PeerRingAction::Some(successor));
        }
        Ok(PeerRingAction::RemoteAction(
            successor,
            RemoteAction::FindSuccessorBasic(did),
        ))
    }
}
