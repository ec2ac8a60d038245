#![warn(missing_docs)]
//! A chordfs node: ring membership, routing and the files it owns.

mod builder;
mod files;
mod membership;
mod routing;
mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use builder::SwarmBuilder;
use tokio::sync::Mutex;
pub use types::JoinReport;
pub use types::JoinStep;
pub use types::LeaveReport;
pub use types::LeaveStep;
pub use types::ProtocolReport;
pub use types::StepOutcome;

use crate::dht::Did;
use crate::dht::PeerRing;
use crate::dht::RingState;
use crate::dht::Stabilizer;
use crate::error::Result;
use crate::inspect::SwarmInspect;
use crate::storage::FileStorageBox;
use crate::transport::SharedCaller;

/// Keys owned by a node and the filename stored under each.
pub type FileTable = BTreeMap<Did, String>;

/// The ring membership and file management of one node.
pub struct Swarm {
    /// Reference of DHT.
    pub(crate) dht: Arc<PeerRing>,
    pub(crate) caller: SharedCaller,
    pub(crate) storage: FileStorageBox,
    /// Held for the whole of an upload, a retrieve, a migration or a leave.
    pub(crate) files: Mutex<FileTable>,
    /// Serializes join, leave, stabilize and the pointer setters.
    pub(crate) membership: Mutex<()>,
    pub(crate) stabilizer: Stabilizer,
}

impl Swarm {
    /// Get did of self.
    pub fn did(&self) -> Did {
        self.dht.did()
    }

    /// Address other nodes reach this node on.
    pub fn address(&self) -> &str {
        &self.dht.peer.address
    }

    /// Get DHT(Distributed Hash Table) of self.
    pub fn dht(&self) -> Arc<PeerRing> {
        self.dht.clone()
    }

    /// Caller used for outbound procedures.
    pub fn caller(&self) -> SharedCaller {
        self.caller.clone()
    }

    /// The stabilization runner of this node.
    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    /// Current membership state.
    pub fn state(&self) -> Result<RingState> {
        self.dht.state()
    }

    /// Snapshot of the file table.
    pub async fn file_table(&self) -> FileTable {
        self.files.lock().await.clone()
    }

    /// Inspect the node, its pointers, fingers, files and stabilizer.
    pub async fn inspect(&self) -> SwarmInspect {
        SwarmInspect::inspect(self).await
    }

    /// Send the stabilize forwards still queued and stop the worker.
    pub async fn shutdown(&self) {
        self.stabilizer.shutdown().await
    }
}
