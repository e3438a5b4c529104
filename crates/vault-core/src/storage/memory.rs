//! In-memory storage backend

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::RecordStore;
use crate::error::{Result, VaultError};

/// Records kept in a process-local map; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn save(&self, id: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;

        match entries.entry(id.to_string()) {
            Entry::Occupied(_) => Err(VaultError::StorageFailed(format!(
                "record '{}' already exists",
                id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(value.to_vec());
                debug!("Stored record: {}", id);
                Ok(())
            }
        }
    }

    async fn load(&self, id: &str) -> Result<Vec<u8>> {
        self.entries
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(id.to_string()))
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(id))
    }

    fn backend_name(&self) -> &'static str {
        "Memory Storage"
    }
}
