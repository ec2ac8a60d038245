//! Module of MemStorage and FsStorage, where a node keeps the bytes of the files it owns.

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Error;
use crate::error::Result;
pub use crate::storage::fs::FsStorage;
pub use crate::storage::memory::MemStorage;

/// Boxed storage accepted by the swarm builder.
pub type FileStorageBox = Box<dyn FileStorageInterface + Send + Sync>;

/// File content storage interface
#[async_trait]
pub trait FileStorageInterface {
    /// Write `content` under `filename`, replacing what was there.
    async fn write(&self, filename: &str, content: &[u8]) -> Result<()>;

    /// Read the content stored under `filename`.
    async fn read(&self, filename: &str) -> Result<Bytes>;

    /// Remove the content stored under `filename`.
    async fn remove(&self, filename: &str) -> Result<()>;

    /// Remove the whole storage area.
    async fn destroy(&self) -> Result<()>;
}

/// Filenames are flat names inside the storage area.
pub(crate) fn check_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0'])
    {
        return Err(Error::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
