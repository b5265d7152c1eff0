//! Path management for benefit-vault
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `BVAULT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/benefit-vault` or `~/.config/benefit-vault`
//! 3. Windows: `%APPDATA%\benefit-vault`

use std::path::PathBuf;

use crate::error::VaultError;

/// Manages all paths used by benefit-vault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Base directory for all vault data
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Create a new VaultPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = if let Ok(custom) = std::env::var("BVAULT_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create VaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/benefit-vault/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/benefit-vault/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to records.json (the vault's saved result records)
    pub fn records_file(&self) -> PathBuf {
        self.data_dir().join("records.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| VaultError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the vault has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("benefit-vault"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| VaultError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("benefit-vault"))
}
