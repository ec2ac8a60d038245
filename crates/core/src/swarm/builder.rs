#![warn(missing_docs)]
//! This module provider [SwarmBuilder] and it's interface for
//! [Swarm]

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::dht::PeerRing;
use crate::dht::Stabilizer;
use crate::storage::FileStorageBox;
use crate::storage::MemStorage;
use crate::swarm::Swarm;
use crate::transport::SharedCaller;

/// Creates a SwarmBuilder to configure a Swarm.
pub struct SwarmBuilder {
    address: String,
    caller: SharedCaller,
    storage: Option<FileStorageBox>,
}

impl SwarmBuilder {
    /// Creates new instance of [SwarmBuilder] for the node reachable on `address`.
    pub fn new(address: &str, caller: SharedCaller) -> Self {
        SwarmBuilder {
            address: address.to_string(),
            caller,
            storage: None,
        }
    }

    /// Sets up where file contents are kept. Defaults to memory.
    pub fn storage(mut self, storage: FileStorageBox) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Build a solitary `Swarm`.
    /// Spawns the stabilization worker, so it must run within a tokio runtime.
    pub fn build(self) -> Swarm {
        let dht = Arc::new(PeerRing::new(self.address));
        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(MemStorage::new()));
        let stabilizer = Stabilizer::new(self.caller.clone());
        tracing::info!("swarm {} built", dht.peer);

        Swarm {
            dht,
            caller: self.caller,
            storage,
            files: Mutex::new(BTreeMap::new()),
            membership: Mutex::new(()),
            stabilizer,
        }
    }
}
