use bytes::Bytes;

use crate::dht::Did;
use crate::dht::Peer;
use crate::error::Error;
use crate::error::Result;
use crate::message::RetrieveFileResponse;
use crate::swarm::Swarm;

impl Swarm {
    /// Store `content` under `filename` and take ownership of `did`.
    /// The key is trusted, it is not checked against the filename or this node's range.
    /// A different file already owned under `did` is replaced and its bytes are dropped.
    pub async fn upload_file(&self, did: Did, filename: &str, content: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        self.storage.write(filename, content).await?;
        if let Some(replaced) = files.insert(did, filename.to_string()) {
            if replaced != filename {
                tracing::warn!("{} replaces {} under {}", filename, replaced, did);
                if let Err(e) = self.storage.remove(&replaced).await {
                    tracing::error!("failed to remove replaced file {}: {:?}", replaced, e);
                }
            }
        }
        tracing::info!("{} stored {} under {}", self.address(), filename, did);
        Ok(())
    }

    /// Read a file owned under `did`.
    pub async fn retrieve_file(&self, did: Did, filename: &str) -> Result<RetrieveFileResponse> {
        let files = self.files.lock().await;
        match files.get(&did) {
            Some(owned) if owned == filename => {}
            Some(owned) => {
                return Err(Error::NotFound(format!(
                    "key {did} holds {owned}, not {filename}"
                )))
            }
            None => return Err(Error::NotFound(format!("key {did} is not owned here"))),
        }
        let content = self.storage.read(filename).await?;
        Ok(RetrieveFileResponse {
            did,
            filename: filename.to_string(),
            content,
        })
    }

    /// Hand every owned file keyed in `(predecessor, boundary]` over to `target`.
    /// A file that fails to move stays here and the rest still move.
    pub async fn share_files(&self, predecessor: Did, boundary: Did, target: &str) -> Result<()> {
        if target == self.address() {
            tracing::warn!("{} asked to share files with itself", self.address());
            return Ok(());
        }
        let mut files = self.files.lock().await;
        let moving: Vec<_> = files
            .iter()
            .filter(|(did, _)| did.in_range(predecessor, boundary))
            .map(|(did, filename)| (*did, filename.clone()))
            .collect();
        tracing::debug!(
            "{} share {} files in ({}, {}] with {}",
            self.address(),
            moving.len(),
            predecessor,
            boundary,
            target
        );
        for (did, filename) in moving {
            match self.hand_over(target, did, &filename).await {
                Ok(()) => {
                    files.remove(&did);
                }
                Err(e) => {
                    tracing::error!("failed to move {} ({}) to {}: {:?}", filename, did, target, e);
                }
            }
        }
        Ok(())
    }

    /// Read, upload to `target` under the same key, then delete locally.
    /// The caller removes the key from the file table.
    pub(crate) async fn hand_over(&self, target: &str, did: Did, filename: &str) -> Result<()> {
        let content = self.storage.read(filename).await?;
        self.caller
            .upload_file(target, did, filename, content)
            .await?;
        self.storage.remove(filename).await
    }

    /// Route `content` to the owner of `Did::hash(filename)` and store it there.
    /// Returns the owner.
    pub async fn store_file(&self, filename: &str, content: Bytes) -> Result<Peer> {
        let did = Did::hash(filename);
        let owner = self.lookup(did).await?;
        self.caller
            .upload_file(&owner.address, did, filename, content)
            .await?;
        Ok(owner)
    }

    /// Fetch `filename` from the owner of its key.
    pub async fn fetch_file(&self, filename: &str) -> Result<RetrieveFileResponse> {
        let did = Did::hash(filename);
        let owner = self.lookup(did).await?;
        self.caller.retrieve_file(&owner.address, did, filename).await
    }
}
