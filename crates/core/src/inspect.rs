use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::dht::Peer;
use crate::dht::PeerRing;
use crate::dht::RingState;
use crate::dht::StabilizerInfo;
use crate::swarm::Swarm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmInspect {
    pub dht: DHTInspect,
    pub files: Vec<FileInspect>,
    pub stabilizer: StabilizerInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DHTInspect {
    pub peer: Peer,
    pub state: Option<RingState>,
    pub successor: Option<Peer>,
    pub predecessor: Option<Peer>,
    pub finger_table: Vec<FingerInspect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerInspect {
    pub index: usize,
    pub start: Did,
    pub peer: Peer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInspect {
    pub did: Did,
    pub filename: String,
}

impl SwarmInspect {
    pub async fn inspect(swarm: &Swarm) -> Self {
        let dht = DHTInspect::inspect(&swarm.dht());
        let files = swarm
            .file_table()
            .await
            .into_iter()
            .map(|(did, filename)| FileInspect { did, filename })
            .collect();
        let stabilizer = swarm.stabilizer().info();

        Self {
            dht,
            files,
            stabilizer,
        }
    }
}

impl DHTInspect {
    pub fn inspect(dht: &PeerRing) -> Self {
        let finger_table = {
            dht.lock_finger()
                .map(|ft| {
                    ft.list()
                        .iter()
                        .enumerate()
                        .map(|(index, peer)| FingerInspect {
                            index,
                            start: ft.start(index),
                            peer: peer.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            peer: dht.peer.clone(),
            state: dht.state().ok(),
            successor: dht.successor().ok(),
            predecessor: dht.predecessor().ok(),
            finger_table,
        }
    }
}
