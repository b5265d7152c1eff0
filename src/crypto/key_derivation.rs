//! Key derivation using Argon2id
//!
//! Derives encryption keys from user passwords using Argon2id,
//! a memory-hard key derivation function resistant to GPU/ASIC attacks.
//! Derivation is deterministic for a fixed (password, salt) pair, which is
//! what lets the import path re-derive the exact key from a package's salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, Params,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{VaultError, VaultResult};

/// Parameters for key derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Salt for key derivation (base64 encoded)
    pub salt: String,
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism degree (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            salt: String::new(), // Generated on first use
            memory_cost: 65536,  // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl KeyDerivationParams {
    /// Create new params with a fresh random 16-byte salt.
    ///
    /// Every export gets its own salt, so identical (results, password)
    /// inputs never produce the same key twice.
    pub fn new() -> Self {
        let salt = SaltString::generate(&mut OsRng);
        Self {
            salt: salt.to_string(),
            ..Default::default()
        }
    }

    /// Create params around a salt carried in from an existing package
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            ..Default::default()
        }
    }
}

/// A derived 256-bit encryption key, wiped from memory on drop
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

// Never expose key material in debug output
impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey").finish_non_exhaustive()
    }
}

/// Derive an encryption key from a password and the given params.
///
/// The salt inside `params` must already be set; use
/// [`KeyDerivationParams::new`] for a fresh one.
pub fn derive_key(password: &str, params: &KeyDerivationParams) -> VaultResult<DerivedKey> {
    let salt = SaltString::from_b64(&params.salt)
        .map_err(|e| VaultError::MalformedPackage(format!("invalid salt: {}", e)))?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // Output length for AES-256
    )
    .map_err(|e| VaultError::Config(format!("invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| VaultError::Config(format!("key derivation failed: {}", e)))?;

    let hash_output = hash
        .hash
        .ok_or_else(|| VaultError::Config("no hash output generated".to_string()))?;

    let hash_bytes = hash_output.as_bytes();

    if hash_bytes.len() < 32 {
        return Err(VaultError::Config(
            "hash output too short for AES-256 key".to_string(),
        ));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&hash_bytes[..32]);

    Ok(DerivedKey { key })
}

/// Derive a key under a brand-new random salt, returning both.
///
/// This is the export-path entry point: salt and key are minted together
/// and the salt travels with the sealed package.
pub fn derive_with_fresh_salt(password: &str) -> VaultResult<(DerivedKey, KeyDerivationParams)> {
    let params = KeyDerivationParams::new();
    let key = derive_key(password, &params)?;
    Ok((key, params))
}
