//! User settings for benefit-vault
//!
//! Holds the vault encryption settings: key-derivation parameters and the
//! verification token used to check a password before unlocking a session.

use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::crypto::key_derivation::KeyDerivationParams;
use crate::error::VaultError;

/// Vault encryption settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EncryptionSettings {
    /// Whether the vault has been initialized with a passphrase
    #[serde(default)]
    pub enabled: bool,

    /// Key derivation parameters (salt, memory cost, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_params: Option<KeyDerivationParams>,

    /// Verification token: a fixed sentinel sealed under the vault key,
    /// used to check a passphrase without touching any record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

/// User settings for benefit-vault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Vault encryption settings
    #[serde(default)]
    pub encryption: EncryptionSettings,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            encryption: EncryptionSettings::default(),
        }
    }
}

impl Settings {
    /// Check if the vault passphrase has been set up
    pub fn is_encryption_enabled(&self) -> bool {
        self.encryption.enabled
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, VaultError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| VaultError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| VaultError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), VaultError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| VaultError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert!(!settings.is_encryption_enabled());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.encryption.enabled = true;
        settings.encryption.key_params = Some(KeyDerivationParams::new());

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(loaded.is_encryption_enabled());
        assert!(loaded.encryption.key_params.is_some());
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.schema_version, deserialized.schema_version);
    }
}
