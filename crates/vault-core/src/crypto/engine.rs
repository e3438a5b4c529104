//! Stateless encrypt-on-write / decrypt-on-read engine

use rsa::{RsaPrivateKey, RsaPublicKey};

use super::armor::{protect_private_key, unprotect_private_key};
use super::key_derivation::KeyDerivationParams;
use super::rsa_oaep::{self, KeyPair};
use crate::error::Result;

/// Output of sealing a payload under a fresh key pair
#[derive(Debug)]
pub struct SealedPayload {
    /// RSA-OAEP ciphertext
    pub ciphertext: Vec<u8>,
    /// Armored, password-protected private key
    pub armored_key: String,
}

/// Crypto engine holding only configuration (Argon2id costs for new armors)
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoEngine {
    kdf: KeyDerivationParams,
}

impl CryptoEngine {
    pub fn new(kdf: KeyDerivationParams) -> Self {
        Self { kdf }
    }

    pub fn generate_key_pair(&self, bits: usize) -> Result<KeyPair> {
        rsa_oaep::generate_key_pair(bits)
    }

    pub fn encrypt(&self, public: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        rsa_oaep::encrypt(public, plaintext)
    }

    pub fn decrypt(&self, private: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
        rsa_oaep::decrypt(private, ciphertext)
    }

    pub fn protect_private_key(&self, private: &RsaPrivateKey, password: &str) -> Result<String> {
        protect_private_key(private, password, &self.kdf)
    }

    pub fn unprotect_private_key(&self, armored: &str, password: &str) -> Result<RsaPrivateKey> {
        unprotect_private_key(armored, password)
    }

    /// Generate a key pair, encrypt `plaintext` under it and armor the private key.
    ///
    /// The key pair is dropped before returning; only the armored form leaves.
    pub fn seal(&self, bits: usize, plaintext: &[u8], password: &str) -> Result<SealedPayload> {
        let pair = self.generate_key_pair(bits)?;
        let ciphertext = self.encrypt(&pair.public, plaintext)?;
        let armored_key = self.protect_private_key(&pair.private, password)?;

        Ok(SealedPayload {
            ciphertext,
            armored_key,
        })
    }

    /// Recover the private key from its armor and decrypt `ciphertext`
    pub fn open(&self, armored_key: &str, password: &str, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let private = self.unprotect_private_key(armored_key, password)?;
        self.decrypt(&private, ciphertext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;

    fn engine() -> CryptoEngine {
        CryptoEngine::new(KeyDerivationParams {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_full_roundtrip() {
        let engine = engine();
        let at_limit = "x".repeat(62);
        for plaintext in ["a", "secret", "üñíçødé text", at_limit.as_str()] {
            let sealed = engine.seal(1024, plaintext.as_bytes(), "pw").unwrap();
            let opened = engine.open(&sealed.armored_key, "pw", &sealed.ciphertext).unwrap();
            assert_eq!(opened, plaintext.as_bytes());
        }
    }

    #[test]
    fn test_wrong_password_never_yields_plaintext() {
        let engine = engine();
        let sealed = engine.seal(1024, b"secret", "pw").unwrap();

        for wrong in ["pw ", "PW", "p", "wrong"] {
            assert!(matches!(
                engine.open(&sealed.armored_key, wrong, &sealed.ciphertext),
                Err(VaultError::DecryptionFailed)
            ));
        }
    }

    #[test]
    fn test_key_from_other_item_fails() {
        let engine = engine();
        let first = engine.seal(1024, b"first", "pw").unwrap();
        let second = engine.seal(1024, b"second", "pw").unwrap();

        assert!(matches!(
            engine.open(&second.armored_key, "pw", &first.ciphertext),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_seal_rejects_oversized_payload() {
        let engine = engine();
        let payload = vec![b'z'; 200];

        assert!(matches!(
            engine.seal(1024, &payload, "pw"),
            Err(VaultError::PayloadTooLarge { len: 200, max: 62 })
        ));
    }

    #[test]
    fn test_seal_2048_raises_bound() {
        let engine = engine();
        let payload = vec![b'z'; 190];

        let sealed = engine.seal(2048, &payload, "pw").unwrap();
        assert_eq!(sealed.ciphertext.len(), 256);
        assert_eq!(engine.open(&sealed.armored_key, "pw", &sealed.ciphertext).unwrap(), payload);
    }
}
