#![warn(missing_docs)]

//! Processor of chordfs-node rpc server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chordfs_core::dht::Did;
use chordfs_core::inspect::SwarmInspect;
use chordfs_core::storage::FileStorageBox;
use chordfs_core::storage::FsStorage;
use chordfs_core::storage::MemStorage;
use chordfs_core::swarm::JoinReport;
use chordfs_core::swarm::LeaveReport;
use chordfs_core::swarm::Swarm;
use chordfs_core::swarm::SwarmBuilder;
use chordfs_core::transport::SharedCaller;
use chordfs_rpc::HttpCaller;

use crate::error::Result;
use crate::native::config::StorageKind;

/// Settings of a [Processor] that do not depend on the address it serves on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Storage backend of owned files.
    storage: StorageKind,
    /// Root of the [FsStorage] areas.
    data_dir: PathBuf,
    /// Timeout of outbound procedures.
    rpc_timeout: Duration,
}

impl ProcessorConfig {
    /// Creates a new `ProcessorConfig` instance.
    pub fn new(storage: StorageKind, data_dir: PathBuf, rpc_timeout: Duration) -> Self {
        Self {
            storage,
            data_dir,
            rpc_timeout,
        }
    }

    /// Storage backend of owned files.
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Timeout of outbound procedures.
    pub fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout
    }
}

/// ProcessorBuilder is used to initialize a [Processor] instance.
pub struct ProcessorBuilder {
    address: String,
    config: ProcessorConfig,
    caller: Option<SharedCaller>,
    storage: Option<FileStorageBox>,
}

/// Processor for chordfs-node rpc server
#[derive(Clone)]
pub struct Processor {
    /// a swarm instance
    pub swarm: Arc<Swarm>,
}

impl ProcessorBuilder {
    /// initialize a [ProcessorBuilder] for the node reachable on `address`.
    pub fn from_config(address: &str, config: &ProcessorConfig) -> Self {
        Self {
            address: address.to_string(),
            config: config.clone(),
            caller: None,
            storage: None,
        }
    }

    /// Set the caller for outbound procedures. Defaults to a [HttpCaller].
    pub fn caller(mut self, caller: SharedCaller) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Set the storage for the processor, overriding [ProcessorConfig::storage].
    pub fn storage(mut self, storage: FileStorageBox) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Build the [Processor]. Must run within a tokio runtime.
    pub fn build(self) -> Result<Processor> {
        let caller: SharedCaller = match self.caller {
            Some(caller) => caller,
            None => Arc::new(HttpCaller::new(self.config.rpc_timeout)?),
        };

        let storage: FileStorageBox = match self.storage {
            Some(storage) => storage,
            None => match self.config.storage {
                StorageKind::Memory => Box::new(MemStorage::new()),
                StorageKind::Fs => {
                    let did = Did::hash(&self.address);
                    let storage = FsStorage::for_node(&self.config.data_dir, did);
                    tracing::info!("store files under {:?}", storage.root());
                    Box::new(storage)
                }
            },
        };

        let swarm = SwarmBuilder::new(&self.address, caller)
            .storage(storage)
            .build();

        Ok(Processor {
            swarm: Arc::new(swarm),
        })
    }
}

impl From<Arc<Swarm>> for Processor {
    fn from(swarm: Arc<Swarm>) -> Self {
        Self { swarm }
    }
}

impl Processor {
    /// Address the node is reachable on.
    pub fn address(&self) -> &str {
        self.swarm.address()
    }

    /// Identifier of the node.
    pub fn did(&self) -> Did {
        self.swarm.did()
    }

    /// Join the ring `introducer` belongs to.
    pub async fn join(&self, introducer: &str) -> Result<JoinReport> {
        let report = self.swarm.join(introducer).await?;
        if report.is_complete() {
            tracing::info!("{} joined via {}", self.swarm.address(), introducer);
        } else {
            tracing::warn!(
                "{} joined via {} with failed steps: {:?}",
                self.swarm.address(),
                introducer,
                report.failed_steps()
            );
        }
        Ok(report)
    }

    /// Hand the owned files over and leave the ring.
    pub async fn leave(&self) -> Result<LeaveReport> {
        let report = self.swarm.leave().await?;
        tracing::info!("{} left, complete: {}", self.swarm.address(), report.is_complete());
        Ok(report)
    }

    /// Pointers, fingers, files and stabilizer counters of the node.
    pub async fn get_node_info(&self) -> Result<SwarmInspect> {
        Ok(self.swarm.inspect().await)
    }

    /// Send the stabilize forwards still queued and stop the stabilizer.
    pub async fn shutdown(&self) {
        self.swarm.shutdown().await
    }
}

