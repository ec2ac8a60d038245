use crate::dht::Chord;
use crate::dht::Did;
use crate::dht::Peer;
use crate::dht::PeerRingAction;
use crate::dht::PeerRingRemoteAction;
use crate::error::Error;
use crate::error::Result;
use crate::swarm::Swarm;

impl Swarm {
    /// Find the owner of `did`. At most one hop is taken from this node, the peer
    /// handed the request answers with its own lookup.
    pub async fn lookup(&self, did: Did) -> Result<Peer> {
        match self.dht.find_successor(did)? {
            PeerRingAction::Some(peer) => Ok(peer),
            PeerRingAction::RemoteAction(next, PeerRingRemoteAction::FindSuccessor(did)) => {
                tracing::debug!("{} delegate lookup of {} to {}", self.address(), did, next);
                self.caller.lookup(&next.address, did).await
            }
            PeerRingAction::RemoteAction(next, PeerRingRemoteAction::FindSuccessorBasic(did)) => {
                tracing::debug!("{} has stale fingers, walk {} from {}", self.address(), did, next);
                self.caller.lookup_basic(&next.address, did).await
            }
            act => Err(Error::PeerRingUnexpectedAction(act)),
        }
    }

    /// Find the owner of `did` walking successor pointers only.
    pub async fn lookup_basic(&self, did: Did) -> Result<Peer> {
        match self.dht.find_successor_basic(did)? {
            PeerRingAction::Some(peer) => Ok(peer),
            PeerRingAction::RemoteAction(next, PeerRingRemoteAction::FindSuccessorBasic(did)) => {
                self.caller.lookup_basic(&next.address, did).await
            }
            act => Err(Error::PeerRingUnexpectedAction(act)),
        }
    }
}
