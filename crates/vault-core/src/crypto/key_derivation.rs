//! Password-based key derivation using Argon2id

use argon2::{Algorithm, Argon2, Params, Version};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Ceiling on memory cost, in KiB (256 MiB)
pub const MAX_MEMORY_COST: u32 = 1 << 18;

/// Ceiling on Argon2 passes
pub const MAX_TIME_COST: u32 = 10;

/// Ceiling on Argon2 lanes
pub const MAX_PARALLELISM: u32 = 16;

/// Parameters for Argon2id key derivation
///
/// Armored keys carry their own parameters, so the ceilings bound the work a
/// caller-supplied key can demand on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDerivationParams {
    /// Memory cost in KiB (default: 65536 = 64MB)
    pub memory_cost: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl KeyDerivationParams {
    /// Check the parameters are usable and within the accepted ceilings
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("memory cost", self.memory_cost, MAX_MEMORY_COST),
            ("time cost", self.time_cost, MAX_TIME_COST),
            ("parallelism", self.parallelism, MAX_PARALLELISM),
        ];
        for (name, value, max) in limits {
            if value > max {
                return Err(VaultError::KeyDerivationFailed(format!(
                    "{} {} exceeds limit of {}",
                    name, value, max
                )));
            }
        }
        self.argon2_params().map(|_| ())
    }

    fn argon2_params(&self) -> Result<Params> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| VaultError::KeyDerivationFailed(e.to_string()))
    }
}

/// AES-256 key derived from a password; wiped on drop
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a 256-bit key from a password using Argon2id
///
/// Parameters are validated first, so out-of-range costs fail before any
/// hashing work is done.
pub fn derive_key(password: &str, salt: &[u8], params: &KeyDerivationParams) -> Result<DerivedKey> {
    params.validate()?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.argon2_params()?);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|e| VaultError::KeyDerivationFailed(e.to_string()))?;

    Ok(DerivedKey(key))
}
