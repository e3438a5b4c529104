//! RSA key generation and OAEP (SHA-256) encryption

use rsa::{traits::PublicKeyParts, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::{Result, VaultError};

/// SHA-256 output length, used by the OAEP size bound
const HASH_LEN: usize = 32;

/// A freshly generated RSA key pair
pub struct KeyPair {
    pub public: RsaPublicKey,
    pub private: RsaPrivateKey,
}

impl KeyPair {
    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.public.size() * 8
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .field("private", &"[REDACTED]")
            .finish()
    }
}

/// Generate a new RSA key pair with the given modulus size
///
/// Size policy belongs to the caller; only a zero size is refused here.
pub fn generate_key_pair(bits: usize) -> Result<KeyPair> {
    if bits == 0 {
        return Err(VaultError::KeyGenerationFailed(
            "key size must be positive".to_string(),
        ));
    }

    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, bits)
        .map_err(|e| VaultError::KeyGenerationFailed(e.to_string()))?;
    let public = private.to_public_key();

    Ok(KeyPair { public, private })
}

/// Largest plaintext OAEP/SHA-256 can carry under this key
pub fn max_plaintext_len(public: &RsaPublicKey) -> usize {
    public.size().saturating_sub(2 * HASH_LEN + 2)
}

/// Encrypt with RSA-OAEP/SHA-256; each call uses fresh padding randomness
pub fn encrypt(public: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let max = max_plaintext_len(public);
    if plaintext.len() > max {
        return Err(VaultError::PayloadTooLarge {
            len: plaintext.len(),
            max,
        });
    }

    let mut rng = rand::thread_rng();
    public
        .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("RSA encryption failed: {}", e)))
}

/// Decrypt RSA-OAEP/SHA-256 ciphertext
pub fn decrypt(private: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    private
        .decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}
