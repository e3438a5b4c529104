//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Persistence backend for serialized item records
///
/// Implementations must make each `save` atomic per id and must never replace
/// a record that already exists.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist `value` under `id`; fails with `StorageFailed` if `id` is taken
    async fn save(&self, id: &str, value: &[u8]) -> Result<()>;

    /// Load the value stored under `id`; fails with `NotFound` when absent
    async fn load(&self, id: &str) -> Result<Vec<u8>>;

    /// Check if a record exists
    async fn exists(&self, id: &str) -> Result<bool>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
