//! AES-256-GCM authenticated encryption
//!
//! Binary format: `{iv}{auth_tag}{ciphertext}`
//! - IV: 12 bytes (96 bits) - standard for GCM
//! - Auth tag: 16 bytes (128 bits)
//! - Ciphertext: variable length

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use super::key_derivation::DerivedKey;
use crate::error::{Result, VaultError};

pub const IV_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// Encrypted data with IV and auth tag
#[derive(Debug, Clone)]
pub struct EncryptedData {
    /// Initialization vector (12 bytes for GCM)
    pub iv: [u8; IV_LEN],
    /// Authentication tag (16 bytes)
    pub auth_tag: [u8; TAG_LEN],
    /// Encrypted ciphertext
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Serialize as `iv || auth_tag || ciphertext`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + TAG_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.auth_tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse from `iv || auth_tag || ciphertext`; `None` if too short
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < IV_LEN + TAG_LEN {
            return None;
        }

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&bytes[..IV_LEN]);

        let mut auth_tag = [0u8; TAG_LEN];
        auth_tag.copy_from_slice(&bytes[IV_LEN..IV_LEN + TAG_LEN]);

        Some(Self {
            iv,
            auth_tag,
            ciphertext: bytes[IV_LEN + TAG_LEN..].to_vec(),
        })
    }
}

/// Encrypt plaintext using AES-256-GCM
///
/// # Arguments
/// * `plaintext` - The data to encrypt
/// * `key` - The 256-bit encryption key
///
/// # Returns
/// Encrypted data containing IV, auth tag, and ciphertext
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> Result<EncryptedData> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    // Generate random IV (12 bytes for GCM)
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);

    // aes-gcm appends the auth tag to the ciphertext
    let ciphertext_with_tag = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    if ciphertext_with_tag.len() < TAG_LEN {
        return Err(VaultError::EncryptionFailed(
            "Ciphertext too short".to_string(),
        ));
    }

    let tag_start = ciphertext_with_tag.len() - TAG_LEN;
    let ciphertext = ciphertext_with_tag[..tag_start].to_vec();
    let mut auth_tag = [0u8; TAG_LEN];
    auth_tag.copy_from_slice(&ciphertext_with_tag[tag_start..]);

    Ok(EncryptedData {
        iv,
        auth_tag,
        ciphertext,
    })
}

/// Decrypt ciphertext using AES-256-GCM
///
/// Any authentication failure (wrong key, tampered data) is reported as
/// `DecryptionFailed` with no further detail.
pub fn open(encrypted: &EncryptedData, key: &DerivedKey) -> Result<Vec<u8>> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::DecryptionFailed)?;

    let nonce = Nonce::from_slice(&encrypted.iv);

    // Reconstruct ciphertext with tag appended (as expected by aes-gcm)
    let mut ciphertext_with_tag = encrypted.ciphertext.clone();
    ciphertext_with_tag.extend_from_slice(&encrypted.auth_tag);

    cipher
        .decrypt(nonce, ciphertext_with_tag.as_slice())
        .map_err(|_| VaultError::DecryptionFailed)
}
