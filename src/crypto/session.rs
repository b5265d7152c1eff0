//! Session-scoped vault key
//!
//! The export path takes an explicit password per call; the vault path needs
//! a standing key so save/load/update don't re-prompt every time. A
//! [`SessionKey`] is that standing key: derived once at unlock, held only in
//! memory, never serialized, and handed around as a capability object.
//!
//! Storage drivers never touch raw key material. They go through the
//! [`FieldCipher`] boundary, so swapping the physical backend can't bypass
//! encryption of sensitive fields.

use crate::error::VaultResult;

use super::encryption::{open_string, seal_string, SealedBox};
use super::key_derivation::{derive_key, DerivedKey, KeyDerivationParams};

/// The encryption boundary the record store writes and reads through.
///
/// Every sensitive field is passed through `encrypt_field` before it is
/// persisted and `decrypt_field` after it is read back, whatever the
/// physical backend is.
pub trait FieldCipher {
    /// Encrypt one sensitive field for storage
    fn encrypt_field(&self, plaintext: &str) -> VaultResult<SealedBox>;

    /// Decrypt one sensitive field read from storage
    fn decrypt_field(&self, sealed: &SealedBox) -> VaultResult<String>;
}

/// An unlocked vault key for the current session
pub struct SessionKey {
    key: DerivedKey,
    params: KeyDerivationParams,
}

impl SessionKey {
    /// Derive a session key from a password and existing derivation params
    /// (the params stored in settings when the vault was initialized)
    pub fn unlock(password: &str, params: &KeyDerivationParams) -> VaultResult<Self> {
        let key = derive_key(password, params)?;
        Ok(Self {
            key,
            params: params.clone(),
        })
    }

    /// The derivation params this key came from
    pub fn params(&self) -> &KeyDerivationParams {
        &self.params
    }

    /// The underlying derived key
    pub fn derived_key(&self) -> &DerivedKey {
        &self.key
    }
}

impl FieldCipher for SessionKey {
    fn encrypt_field(&self, plaintext: &str) -> VaultResult<SealedBox> {
        seal_string(plaintext, &self.key)
    }

    fn decrypt_field(&self, sealed: &SealedBox) -> VaultResult<String> {
        open_string(sealed, &self.key)
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;

    #[test]
    fn test_unlock_and_field_round_trip() {
        let params = KeyDerivationParams::new();
        let session = SessionKey::unlock("vault password", &params).unwrap();

        let sealed = session.encrypt_field("sensitive notes").unwrap();
        assert_ne!(sealed.as_str(), "sensitive notes");

        let opened = session.decrypt_field(&sealed).unwrap();
        assert_eq!(opened, "sensitive notes");
    }

    #[test]
    fn test_wrong_password_session_cannot_open_fields() {
        let params = KeyDerivationParams::new();
        let session1 = SessionKey::unlock("password one", &params).unwrap();
        let session2 = SessionKey::unlock("password two", &params).unwrap();

        let sealed = session1.encrypt_field("secret").unwrap();
        assert!(matches!(
            session2.decrypt_field(&sealed),
            Err(VaultError::Decryption)
        ));
    }

    #[test]
    fn test_debug_reveals_nothing() {
        let params = KeyDerivationParams::new();
        let session = SessionKey::unlock("vault password", &params).unwrap();
        let debug = format!("{:?}", session);
        assert!(!debug.contains("password"));
        assert!(!debug.contains("key:"));
    }
}
