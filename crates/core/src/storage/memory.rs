use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::error::Error;
use crate::error::Result;
use crate::storage::check_filename;
use crate::storage::FileStorageInterface;

#[derive(Debug, Default)]
pub struct MemStorage {
    table: DashMap<String, Bytes>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            table: DashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[async_trait]
impl FileStorageInterface for MemStorage {
    async fn write(&self, filename: &str, content: &[u8]) -> Result<()> {
        check_filename(filename)?;
        self.table
            .insert(filename.to_string(), Bytes::copy_from_slice(content));
        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Bytes> {
        self.table
            .get(filename)
            .map(|v| v.value().clone())
            .ok_or_else(|| {
                Error::IO(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{filename} is not stored"),
                ))
            })
    }

    async fn remove(&self, filename: &str) -> Result<()> {
        self.table.remove(filename);
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        self.table.clear();
        Ok(())
    }
}
