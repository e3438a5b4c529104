//! File storage backend
//!
//! Stores each record as `<id>.json` inside a storage directory. Records are
//! written to a private temporary file first and then hard-linked into place,
//! so a record either appears complete or not at all, and an existing record
//! is never replaced.

use async_trait::async_trait;
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::RecordStore;
use crate::error::{Result, VaultError};

const RECORD_EXTENSION: &str = "json";
const MAX_ID_LEN: usize = 128;

/// File-per-record storage backend
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    /// Directory holding the record files
    storage_dir: PathBuf,
}

impl FileRecordStore {
    /// Create a store rooted at `storage_dir`, creating the directory if needed
    pub fn new(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage_dir = storage_dir.into();

        std::fs::create_dir_all(&storage_dir).map_err(|e| {
            VaultError::StorageFailed(format!(
                "cannot create storage directory {:?}: {}",
                storage_dir, e
            ))
        })?;

        debug!("File record storage initialized at: {:?}", storage_dir);
        Ok(Self { storage_dir })
    }

    /// Get the default storage directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("io", "textvault", "textvault")
            .map(|dirs| dirs.data_dir().join("items"))
            .ok_or_else(|| VaultError::Config("Could not determine data directory".to_string()))
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Path of the record file for `id`, or `None` if `id` cannot name a record
    fn record_path(&self, id: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| {
            self.storage_dir
                .join(format!("{}.{}", id, RECORD_EXTENSION))
        })
    }

    fn temp_path(&self, id: &str) -> PathBuf {
        self.storage_dir
            .join(format!(".{}.{}.tmp", id, uuid::Uuid::new_v4().simple()))
    }
}

/// Ids become file names, so only a conservative character set is accepted
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn save(&self, id: &str, value: &[u8]) -> Result<()> {
        let path = self
            .record_path(id)
            .ok_or_else(|| VaultError::StorageFailed(format!("invalid record id '{}'", id)))?;

        let temp_path = self.temp_path(id);
        if let Err(e) = tokio::fs::write(&temp_path, value).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            error!("Failed to write record {}: {}", id, e);
            return Err(VaultError::StorageFailed(e.to_string()));
        }

        // hard_link refuses to replace an existing file
        let linked = tokio::fs::hard_link(&temp_path, &path).await;
        let _ = tokio::fs::remove_file(&temp_path).await;

        match linked {
            Ok(()) => {
                debug!("Stored record: {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(VaultError::StorageFailed(
                format!("record '{}' already exists", id),
            )),
            Err(e) => {
                error!("Failed to store record {}: {}", id, e);
                Err(VaultError::StorageFailed(e.to_string()))
            }
        }
    }

    async fn load(&self, id: &str) -> Result<Vec<u8>> {
        let path = self
            .record_path(id)
            .ok_or_else(|| VaultError::NotFound(id.to_string()))?;

        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!("Loaded record: {}", id);
                Ok(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Record not found: {}", id);
                Err(VaultError::NotFound(id.to_string()))
            }
            Err(e) => {
                error!("Failed to read record {}: {}", id, e);
                Err(VaultError::StorageFailed(e.to_string()))
            }
        }
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        match self.record_path(id) {
            Some(path) => tokio::fs::try_exists(&path)
                .await
                .map_err(|e| VaultError::StorageFailed(e.to_string())),
            None => Ok(false),
        }
    }

    fn backend_name(&self) -> &'static str {
        "File Storage"
    }
}
