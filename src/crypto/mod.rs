//! Cryptographic primitives for benefit-vault
//!
//! AES-256-GCM authenticated encryption with Argon2id key derivation.
//! Everything sensitive the vault persists or exports goes through this
//! module; the export codec and the record store share the same primitives.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;
pub mod session;

pub use encryption::{open, open_string, seal, seal_string, SealedBox};
pub use key_derivation::{derive_key, derive_with_fresh_salt, DerivedKey, KeyDerivationParams};
pub use secure_memory::SecureString;
pub use session::{FieldCipher, SessionKey};
