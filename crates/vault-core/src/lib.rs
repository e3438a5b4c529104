//! # vault-core
//!
//! Core of textvault:
//! - RSA-OAEP (SHA-256) encryption of submitted text under a per-item key pair
//! - Private keys returned armored, protected by Argon2id + AES-256-GCM
//! - Item service orchestrating validation, crypto and persistence
//! - File and in-memory record stores

pub mod crypto;
pub mod error;
pub mod item;
pub mod settings;
pub mod storage;

pub use crypto::{CryptoEngine, KeyDerivationParams, SecretString};
pub use error::{Result, VaultError};
pub use item::{IdGenerator, InsertRequest, InsertedItem, ItemService, KeySize, StoredRecord, UuidGenerator};
pub use settings::{parse_log_level, Settings, SettingsManager};
pub use storage::{FileRecordStore, MemoryRecordStore, RecordStore};
