//! Error types for vault-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Payload too large: {len} bytes, key allows at most {max}")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Private key password is required")]
    PasswordRequired,

    #[error("Private key is required to read an encrypted item")]
    PrivateKeyRequired,

    #[error("Invalid armored key: {0}")]
    InvalidArmorFormat(String),

    #[error("Cannot read file with given credentials")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Whether the caller supplied credentials that cannot open the item.
    ///
    /// A malformed armor block and a wrong password are reported the same way
    /// at the request boundary.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed | Self::InvalidArmorFormat(_))
    }

    /// Whether the failure was caused by the request itself rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_)
                | Self::PayloadTooLarge { .. }
                | Self::PasswordRequired
                | Self::PrivateKeyRequired
                | Self::NotFound(_)
        ) || self.is_credential_failure()
    }
}
