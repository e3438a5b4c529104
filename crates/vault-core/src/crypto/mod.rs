//! Cryptographic primitives for item encryption
//!
//! This module provides:
//! - RSA key generation and OAEP/SHA-256 payload encryption
//! - Password-protected private key armor (Argon2id + AES-256-GCM in PEM)
//! - Secret text that is wiped on drop

mod armor;
mod encryption;
mod engine;
mod key_derivation;
mod rsa_oaep;
mod secret;

pub use armor::{protect_private_key, unprotect_private_key, ARMOR_LABEL};
pub use encryption::{open, seal, EncryptedData};
pub use engine::{CryptoEngine, SealedPayload};
pub use key_derivation::{
    derive_key, generate_salt, DerivedKey, KeyDerivationParams, MAX_MEMORY_COST,
    MAX_PARALLELISM, MAX_TIME_COST,
};
pub use rsa_oaep::{generate_key_pair, max_plaintext_len, KeyPair};
pub use secret::SecretString;
