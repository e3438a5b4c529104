//! Item type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::SecretString;
use crate::error::{Result, VaultError};

/// RSA modulus sizes accepted for new items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KeySize {
    Bits1024,
    Bits2048,
    Bits4096,
}

impl KeySize {
    /// Accepted sizes in bits
    pub const ALLOWED: [u32; 3] = [1024, 2048, 4096];

    pub fn bits(self) -> usize {
        u32::from(self) as usize
    }
}

impl TryFrom<u32> for KeySize {
    type Error = VaultError;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            1024 => Ok(Self::Bits1024),
            2048 => Ok(Self::Bits2048),
            4096 => Ok(Self::Bits4096),
            other => Err(VaultError::ValidationFailed(format!(
                "key_size must be one of 1024, 2048, 4096 (got {})",
                other
            ))),
        }
    }
}

impl From<KeySize> for u32 {
    fn from(size: KeySize) -> Self {
        match size {
            KeySize::Bits1024 => 1024,
            KeySize::Bits2048 => 2048,
            KeySize::Bits4096 => 4096,
        }
    }
}

/// Request to store a new item
#[derive(Clone, Default, Deserialize)]
pub struct InsertRequest {
    /// Text to store
    #[serde(default)]
    pub text_data: String,

    /// Whether to encrypt; must be present
    #[serde(default)]
    pub encryption: Option<bool>,

    /// RSA modulus size in bits, only checked when encrypting
    #[serde(default)]
    pub key_size: Option<u32>,

    /// Password protecting the generated private key
    #[serde(default)]
    pub private_key_password: Option<String>,
}

impl InsertRequest {
    /// Request to store `text` as-is
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text_data: text.into(),
            encryption: Some(false),
            ..Self::default()
        }
    }

    /// Request to store `text` encrypted under a fresh `key_size`-bit key
    pub fn encrypted(text: impl Into<String>, key_size: u32, password: impl Into<String>) -> Self {
        Self {
            text_data: text.into(),
            encryption: Some(true),
            key_size: Some(key_size),
            private_key_password: Some(password.into()),
        }
    }

    /// Check the request and split it into text and protection policy
    pub fn validate(self) -> Result<ValidatedInsert> {
        if self.text_data.is_empty() {
            return Err(VaultError::ValidationFailed(
                "text_data is required".to_string(),
            ));
        }

        let encrypt = self.encryption.ok_or_else(|| {
            VaultError::ValidationFailed("encryption is required".to_string())
        })?;

        let protection = if encrypt {
            let password = SecretString::new(self.private_key_password.unwrap_or_default());
            if password.is_empty() {
                return Err(VaultError::ValidationFailed(
                    "private_key_password is required when encryption is true".to_string(),
                ));
            }

            let key_size = self.key_size.ok_or_else(|| {
                VaultError::ValidationFailed(
                    "key_size is required when encryption is true".to_string(),
                )
            })?;

            Protection::Encrypt {
                key_size: KeySize::try_from(key_size)?,
                password,
            }
        } else {
            Protection::None
        };

        Ok(ValidatedInsert {
            text: SecretString::new(self.text_data),
            protection,
        })
    }
}

impl std::fmt::Debug for InsertRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsertRequest")
            .field("text_data", &format_args!("[{} bytes]", self.text_data.len()))
            .field("encryption", &self.encryption)
            .field("key_size", &self.key_size)
            .field(
                "private_key_password",
                &self.private_key_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// How an item is protected at rest
#[derive(Debug)]
pub enum Protection {
    None,
    Encrypt {
        key_size: KeySize,
        password: SecretString,
    },
}

/// Insert request that passed validation
#[derive(Debug)]
pub struct ValidatedInsert {
    pub text: SecretString,
    pub protection: Protection,
}

/// Result of a successful insert
#[derive(Clone, PartialEq, Eq)]
pub struct InsertedItem {
    /// Generated identifier
    pub id: String,

    /// Armored private key, only when the item was encrypted
    pub private_key: Option<String>,
}

impl std::fmt::Debug for InsertedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsertedItem")
            .field("id", &self.id)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Persisted form of an item
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Plaintext, or base64 RSA-OAEP ciphertext when `encrypted`
    #[serde(alias = "Content")]
    pub content: String,

    /// Whether `content` is ciphertext
    #[serde(alias = "Encrypted")]
    pub encrypted: bool,

    /// Insert timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredRecord {
    /// Record holding plaintext
    pub fn plain(content: String) -> Self {
        Self {
            content,
            encrypted: false,
            created_at: Some(Utc::now()),
        }
    }

    /// Record holding base64 ciphertext
    pub fn encrypted(ciphertext_b64: String) -> Self {
        Self {
            content: ciphertext_b64,
            encrypted: true,
            created_at: Some(Utc::now()),
        }
    }
}

impl std::fmt::Debug for StoredRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredRecord")
            .field("content", &format_args!("[{} bytes]", self.content.len()))
            .field("encrypted", &self.encrypted)
            .field("created_at", &self.created_at)
            .finish()
    }
}
