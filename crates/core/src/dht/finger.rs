#![warn(missing_docs)]
use std::ops::Index;

use serde::Deserialize;
use serde::Serialize;

use super::types::Peer;
use crate::consts::FINGER_TABLE_SIZE;
use crate::dht::Did;

/// Finger table of Chord DHT.
/// Entry `i` is the owner of `did + 2^i`. Every entry points to the node itself
/// until the table is computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTable {
    did: Did,
    finger: Vec<Peer>,
}

impl FingerTable {
    /// builder
    pub fn new(peer: &Peer) -> Self {
        Self {
            did: peer.did,
            finger: vec![peer.clone(); FINGER_TABLE_SIZE],
        }
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.finger.is_empty()
    }

    /// size of table
    pub fn len(&self) -> usize {
        self.finger.len()
    }

    /// Get first element from Finger Table
    pub fn first(&self) -> &Peer {
        &self.finger[0]
    }

    /// Get last element from Finger Table
    pub fn last(&self) -> &Peer {
        &self.finger[self.finger.len() - 1]
    }

    /// getter
    pub fn get(&self, index: usize) -> Option<&Peer> {
        self.finger.get(index)
    }

    /// setter
    pub fn set(&mut self, index: usize, peer: Peer) {
        tracing::debug!("set finger table index: {} peer: {}", index, peer);
        if index >= self.finger.len() {
            tracing::error!("set finger index out of range, index: {}", index);
            return;
        }
        self.finger[index] = peer;
    }

    /// Identifier at which the `index`-th finger interval starts.
    pub fn start(&self, index: usize) -> Did {
        self.did.finger_start(index)
    }

    /// get finger list
    pub fn list(&self) -> &[Peer] {
        &self.finger
    }

    /// Walk adjacent finger pairs and return the lower end of the first pair whose
    /// interval `(finger[i-1], finger[i]]` holds `did`. Falls back to the last finger.
    pub fn closest_delegate(&self, did: Did) -> &Peer {
        let mut prev = self.first();
        for next in self.finger.iter().skip(1) {
            if did.in_range(prev.did, next.did) {
                return prev;
            }
            prev = next;
        }
        prev
    }
}

impl Index<usize> for FingerTable {
    type Output = Peer;
    fn index(&self, index: usize) -> &Self::Output {
        &self.finger[index]
    }
}
