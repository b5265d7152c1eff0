//! Portable export package codec
//!
//! An export is a two-layer container. The inner layer is the
//! [`ExportEnvelope`]: the versioned logical document holding the results,
//! an optional profile snapshot, and optional metadata. The outer layer is
//! the [`SealedPackage`]: the envelope serialized, encrypted under a
//! password-derived key, and paired with the salt that key was derived
//! from. The package is what lands in a `.bfx` file.
//!
//! Only version `"1.0.0"` envelopes are accepted on parse, independent of
//! password correctness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{self, KeyDerivationParams, SealedBox};
use crate::error::{VaultError, VaultResult};
use crate::models::EligibilityResults;
use crate::sanitize::{sanitize_results, sanitize_text};

/// The one envelope version this build reads and writes
pub const EXPORT_VERSION: &str = "1.0.0";

/// Minimum export password length, enforced before any crypto work
pub const MIN_PASSWORD_LEN: usize = 8;

/// Optional context attached to an export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Display name the results were computed for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// State/jurisdiction label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Free-form user notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExportMetadata {
    fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.state.is_none() && self.notes.is_none()
    }

    fn sanitize(&mut self) {
        self.user_name = self.user_name.take().map(|s| sanitize_text(&s));
        self.state = self.state.take().map(|s| sanitize_text(&s));
        self.notes = self.notes.take().map(|s| sanitize_text(&s));
    }
}

/// The versioned logical document inside a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    /// Envelope format version; must equal [`EXPORT_VERSION`] on decode
    pub version: String,

    /// When the export was built
    pub exported_at: DateTime<Utc>,

    /// The exported results
    pub results: EligibilityResults,

    /// Opaque snapshot of the answers/profile that produced the results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_snapshot: Option<serde_json::Map<String, serde_json::Value>>,

    /// Optional export metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExportMetadata>,
}

/// The on-disk form: salt plus encrypted envelope.
///
/// Salt and ciphertext are minted together and travel together; a package
/// missing either field is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedPackage {
    /// Key-derivation salt (base64 text)
    pub salt: String,

    /// Sealed envelope JSON (nonce embedded)
    pub encrypted: SealedBox,
}

impl SealedPackage {
    /// Serialize to the wire JSON object
    pub fn to_json(&self) -> VaultResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Parse the wire JSON object, failing with `MalformedPackage` when
    /// the container shape is wrong (missing salt/encrypted, not JSON)
    pub fn from_json(json: &str) -> VaultResult<Self> {
        let package: Self = serde_json::from_str(json)
            .map_err(|e| VaultError::MalformedPackage(format!("invalid package file: {}", e)))?;
        package.check_shape()?;
        Ok(package)
    }

    fn check_shape(&self) -> VaultResult<()> {
        if self.salt.is_empty() {
            return Err(VaultError::MalformedPackage("missing salt".to_string()));
        }
        if self.encrypted.as_str().is_empty() {
            return Err(VaultError::MalformedPackage(
                "missing ciphertext".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for building an export
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Display name to stamp into metadata
    pub user_name: Option<String>,
    /// State/jurisdiction label
    pub state: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Profile snapshot to carry along
    pub profile_snapshot: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Build a sealed export package from a result set and a password.
///
/// Stamps the current version and timestamp, sanitizes all text, derives a
/// key under a fresh salt, and seals the serialized envelope. Two calls
/// with identical inputs produce different salts and ciphertexts.
pub fn build(
    results: &EligibilityResults,
    password: &str,
    options: ExportOptions,
) -> VaultResult<SealedPackage> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(VaultError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let mut results = results.clone();
    sanitize_results(&mut results);

    let mut metadata = ExportMetadata {
        user_name: options.user_name,
        state: options.state,
        notes: options.notes,
    };
    metadata.sanitize();

    let envelope = ExportEnvelope {
        version: EXPORT_VERSION.to_string(),
        exported_at: Utc::now(),
        results,
        profile_snapshot: options.profile_snapshot,
        metadata: (!metadata.is_empty()).then_some(metadata),
    };

    let plaintext = serde_json::to_string(&envelope)?;
    let (key, params) = crypto::derive_with_fresh_salt(password)?;
    let encrypted = crypto::seal_string(&plaintext, &key)?;

    Ok(SealedPackage {
        salt: params.salt,
        encrypted,
    })
}

/// Open a sealed package and reconstruct the typed envelope.
///
/// Decryption failures surface as the uniform `Decryption` error whether
/// the password was wrong or the ciphertext was tampered with. Metadata and
/// result text are re-sanitized after decode: a forged package can pair a
/// known password with malicious embedded text, so the read path cannot
/// trust the write path to have sanitized.
pub fn parse(package: &SealedPackage, password: &str) -> VaultResult<ExportEnvelope> {
    package.check_shape()?;

    let params = KeyDerivationParams::with_salt(package.salt.clone());
    let key = crypto::derive_key(password, &params)?;
    let plaintext = crypto::open_string(&package.encrypted, &key)?;

    let mut envelope: ExportEnvelope = serde_json::from_str(&plaintext)
        .map_err(|e| VaultError::MalformedPackage(format!("invalid envelope: {}", e)))?;

    if envelope.version != EXPORT_VERSION {
        return Err(VaultError::UnsupportedVersion(envelope.version));
    }

    sanitize_results(&mut envelope.results);
    if let Some(metadata) = &mut envelope.metadata {
        metadata.sanitize();
    }

    Ok(envelope)
}
