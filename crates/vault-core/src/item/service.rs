//! Item service: encrypt-on-write, decrypt-on-read

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::id::IdGenerator;
use super::types::{InsertRequest, InsertedItem, Protection, StoredRecord};
use crate::crypto::{CryptoEngine, SecretString};
use crate::error::{Result, VaultError};
use crate::storage::RecordStore;

/// Orchestrates validation, crypto and persistence for items
pub struct ItemService {
    /// Storage backend
    store: Arc<dyn RecordStore>,
    /// Identifier source
    ids: Arc<dyn IdGenerator>,
    /// RSA / armor engine
    engine: CryptoEngine,
}

impl ItemService {
    /// Create a new item service
    pub fn new(store: Arc<dyn RecordStore>, ids: Arc<dyn IdGenerator>, engine: CryptoEngine) -> Self {
        Self { store, ids, engine }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Validate, optionally encrypt, and persist a new item
    pub async fn insert(&self, request: InsertRequest) -> Result<InsertedItem> {
        let validated = request.validate()?;
        let id = self.ids.new_id();

        let (record, private_key) = match validated.protection {
            Protection::None => (StoredRecord::plain(validated.text.into_inner()), None),
            Protection::Encrypt { key_size, password } => {
                let engine = self.engine;
                let text = validated.text;
                debug!("Sealing item {} under a {}-bit key", id, key_size.bits());

                let sealed = run_blocking(move || {
                    engine.seal(key_size.bits(), text.expose().as_bytes(), password.expose())
                })
                .await?;

                (
                    StoredRecord::encrypted(BASE64.encode(&sealed.ciphertext)),
                    Some(sealed.armored_key),
                )
            }
        };

        let encrypted = record.encrypted;
        let data = serde_json::to_vec(&record)?;

        self.store.save(&id, &data).await.map_err(|e| match e {
            VaultError::StorageFailed(_) => e,
            other => VaultError::StorageFailed(other.to_string()),
        })?;

        info!("Stored item {} (encrypted: {})", id, encrypted);
        Ok(InsertedItem { id, private_key })
    }

    /// Load an item and decrypt it if it was stored encrypted
    ///
    /// `private_key` and `password` are ignored for unencrypted items.
    pub async fn get(&self, id: &str, private_key: &str, password: &str) -> Result<String> {
        let data = self.store.load(id).await?;
        let record: StoredRecord = serde_json::from_slice(&data)
            .map_err(|e| VaultError::CorruptRecord(e.to_string()))?;

        if !record.encrypted {
            debug!("Returning plain item {}", id);
            return Ok(record.content);
        }

        if private_key.is_empty() {
            return Err(VaultError::PrivateKeyRequired);
        }
        if password.is_empty() {
            return Err(VaultError::PasswordRequired);
        }

        let ciphertext = BASE64
            .decode(record.content.as_bytes())
            .map_err(|e| VaultError::CorruptRecord(format!("invalid base64 content: {}", e)))?;
        if ciphertext.is_empty() {
            return Err(VaultError::CorruptRecord("empty ciphertext".to_string()));
        }

        let engine = self.engine;
        let armored = private_key.to_string();
        let password = SecretString::from(password);

        let plaintext = run_blocking(move || engine.open(&armored, password.expose(), &ciphertext))
            .await
            .map_err(|e| {
                if e.is_credential_failure() {
                    warn!("Rejected credentials for item {}", id);
                }
                e
            })?;

        let text = String::from_utf8(plaintext).map_err(|_| VaultError::DecryptionFailed)?;
        info!("Decrypted item {}", id);
        Ok(text)
    }
}

/// Run CPU-bound crypto off the async executor
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| VaultError::Internal(format!("crypto task failed: {}", e)))?
}
