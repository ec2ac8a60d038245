//! Files on disk, one directory per node.

use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::dht::Did;
use crate::error::Result;
use crate::storage::check_filename;
use crate::storage::FileStorageInterface;

/// Stores every file as `<root>/<filename>`.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Storage rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage area of the node `did` under `data_dir`, i.e. `<data_dir>/<did>`.
    pub fn for_node(data_dir: impl AsRef<Path>, did: Did) -> Self {
        Self::new(data_dir.as_ref().join(did.to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, filename: &str) -> Result<PathBuf> {
        check_filename(filename)?;
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl FileStorageInterface for FsStorage {
    async fn write(&self, filename: &str, content: &[u8]) -> Result<()> {
        let path = self.path(filename)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, content).await?;
        tracing::debug!("wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Bytes> {
        let path = self.path(filename)?;
        Ok(Bytes::from(tokio::fs::read(path).await?))
    }

    async fn remove(&self, filename: &str) -> Result<()> {
        let path = self.path(filename)?;
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
