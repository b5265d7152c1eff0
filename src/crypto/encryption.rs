//! AES-256-GCM authenticated encryption
//!
//! Seals plaintext into a single self-contained string: a fresh random
//! nonce is generated per call, prepended to the ciphertext (which carries
//! the GCM authentication tag), and the whole thing base64-encoded. Opening
//! needs only the key and that one string, which is exactly what the export
//! package format requires.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

use super::DerivedKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// A sealed blob: base64(nonce || ciphertext || tag).
///
/// Serializes as a bare string, so it drops straight into the package's
/// `encrypted` field and into vault records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealedBox(String);

impl SealedBox {
    /// Wrap an already-encoded sealed string (e.g. read from a package file)
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The base64 text form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn decode(&self) -> VaultResult<(Vec<u8>, Vec<u8>)> {
        let raw = STANDARD
            .decode(&self.0)
            .map_err(|_| VaultError::Decryption)?;
        // Too short to contain a nonce and a tag: treat as any other
        // authentication failure
        if raw.len() <= NONCE_SIZE {
            return Err(VaultError::Decryption);
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_SIZE);
        Ok((nonce.to_vec(), ciphertext.to_vec()))
    }
}

/// Encrypt plaintext under the given key with a fresh random nonce
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> VaultResult<SealedBox> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Config(format!("failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| VaultError::Config(format!("encryption failed: {}", e)))?;

    let mut raw = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    raw.extend_from_slice(&nonce_bytes);
    raw.extend_from_slice(&ciphertext);

    Ok(SealedBox(STANDARD.encode(raw)))
}

/// Decrypt a sealed blob.
///
/// Any failure (bad encoding, truncation, wrong key, flipped ciphertext
/// bits) surfaces as the same `VaultError::Decryption` so a caller (or an
/// attacker watching a caller) cannot tell wrong-password from tampering.
pub fn open(sealed: &SealedBox, key: &DerivedKey) -> VaultResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Config(format!("failed to create cipher: {}", e)))?;

    let (nonce_bytes, ciphertext) = sealed.decode()?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| VaultError::Decryption)
}

/// Encrypt a string
pub fn seal_string(plaintext: &str, key: &DerivedKey) -> VaultResult<SealedBox> {
    seal(plaintext.as_bytes(), key)
}

/// Decrypt to a string
pub fn open_string(sealed: &SealedBox, key: &DerivedKey) -> VaultResult<String> {
    let plaintext = open(sealed, key)?;
    String::from_utf8(plaintext).map_err(|_| VaultError::Decryption)
}
