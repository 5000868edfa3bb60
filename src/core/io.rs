use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

/// Key-value byte store. Keys are `/`-separated paths.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self, path: &str) -> Result<Vec<u8>>;
    async fn write(&self, path: &str, content: &[u8]) -> Result<()>;
    async fn delete(&self, path: &str) -> Result<()>;
    async fn exists(&self, path: &str) -> Result<bool>;
}

// --- Native Implementation ---

pub struct NativeStorage;

impl NativeStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for NativeStorage {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        // Readers never observe a partially written record.
        let tmp = format!("{}.tmp", path);
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Deleting a missing record is not an error.
    async fn delete(&self, path: &str) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }
}

// --- In-memory Implementation ---

/// Volatile store, handy for tests and for running without a writable disk.
#[derive(Default)]
pub struct MemoryStorage {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.read().map_err(|_| anyhow!("Storage lock poisoned"))?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {}", path))
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let mut files = self.files.write().map_err(|_| anyhow!("Storage lock poisoned"))?;
        files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut files = self.files.write().map_err(|_| anyhow!("Storage lock poisoned"))?;
        files.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let files = self.files.read().map_err(|_| anyhow!("Storage lock poisoned"))?;
        Ok(files.contains_key(path))
    }
}
