//! The result vault store
//!
//! [`RecordRepository`] is the persistence half: an in-memory map of saved
//! records backed by an atomically-written JSON file. [`ResultVaultStore`]
//! is the logical half: save/load/list/update/delete with the record
//! lifecycle rules (id and evaluated_at immutable, updates limited to
//! notes/tags, listing sorted by evaluated_at descending).
//!
//! Sensitive fields never reach the repository in plaintext. Every write
//! seals them through a [`FieldCipher`] and every read opens them through
//! the same boundary, so swapping the physical backend cannot bypass
//! encryption.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;

use crate::crypto::FieldCipher;
use crate::error::{VaultError, VaultResult};
use crate::models::{
    EligibilityResults, RecordId, RecordSummary, SavedResultRecord, SensitiveFields,
};
use crate::sanitize::{sanitize_results, sanitize_text};

use super::cancel::CancelToken;
use super::file_io::{read_json, write_json_atomic};

/// Serializable records file structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RecordData {
    records: Vec<SavedResultRecord>,
}

/// Repository for saved result records
pub struct RecordRepository {
    path: PathBuf,
    data: RwLock<HashMap<RecordId, SavedResultRecord>>,
}

impl RecordRepository {
    /// Create a new repository backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load records from disk
    pub fn load(&self) -> VaultResult<()> {
        self.load_with_cancel(&CancelToken::new())
    }

    /// Load records from disk, checking the token between records.
    ///
    /// A cancelled load resolves with `VaultError::Cancelled` and leaves
    /// the in-memory state exactly as it was before the call.
    pub fn load_with_cancel(&self, cancel: &CancelToken) -> VaultResult<()> {
        cancel.check()?;
        let file_data: RecordData = read_json(&self.path)?;

        // Stage into a fresh map so a mid-load cancel mutates nothing
        let mut staged = HashMap::with_capacity(file_data.records.len());
        for record in file_data.records {
            cancel.check()?;
            staged.insert(record.id, record);
        }

        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = staged;

        Ok(())
    }

    /// Persist all records to disk
    pub fn save(&self) -> VaultResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut records: Vec<_> = data.values().cloned().collect();
        records.sort_by(|a, b| b.evaluated_at.cmp(&a.evaluated_at));

        let file_data = RecordData { records };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a record by ID
    pub fn get(&self, id: RecordId) -> VaultResult<Option<SavedResultRecord>> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Insert or replace a record
    pub fn upsert(&self, record: SavedResultRecord) -> VaultResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(record.id, record);
        Ok(())
    }

    /// Remove a record, returning whether it existed
    pub fn remove(&self, id: RecordId) -> VaultResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Index-only summaries, sorted by evaluated_at descending
    pub fn summaries(&self, cancel: &CancelToken) -> VaultResult<Vec<RecordSummary>> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut summaries = Vec::with_capacity(data.len());
        for record in data.values() {
            cancel.check()?;
            summaries.push(record.summary());
        }
        summaries.sort_by(|a, b| b.evaluated_at.cmp(&a.evaluated_at));
        Ok(summaries)
    }

    /// Count records
    pub fn count(&self) -> VaultResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

/// Options accompanying a save
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Host-application user identifier (sensitive)
    pub user_id: Option<String>,
    /// Display name (sensitive)
    pub user_name: Option<String>,
    /// State/jurisdiction label (plaintext index)
    pub state: Option<String>,
    /// Free-form notes (sensitive)
    pub notes: Option<String>,
    /// Tags (plaintext index)
    pub tags: Vec<String>,
    /// Profile snapshot (sensitive)
    pub profile_snapshot: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Fields an update may change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    /// Replace the notes
    pub notes: Option<String>,
    /// Replace the tags
    pub tags: Option<Vec<String>>,
}

/// The vault's record operations
pub struct ResultVaultStore {
    repo: RecordRepository,
}

impl ResultVaultStore {
    /// Open a store backed by the given records file and load it
    pub fn open(path: PathBuf) -> VaultResult<Self> {
        let repo = RecordRepository::new(path);
        repo.load()?;
        Ok(Self { repo })
    }

    /// Open a store, allowing the initial bulk load to be cancelled
    pub fn open_with_cancel(path: PathBuf, cancel: &CancelToken) -> VaultResult<Self> {
        let repo = RecordRepository::new(path);
        repo.load_with_cancel(cancel)?;
        Ok(Self { repo })
    }

    /// Save a result set as a new record and return its id.
    ///
    /// Index fields are derived here: qualified_count from the qualified
    /// partition, programs_evaluated from all partitions. Sensitive fields
    /// are sealed through the cipher before anything touches disk.
    pub fn save(
        &self,
        results: &EligibilityResults,
        options: SaveOptions,
        cipher: &dyn FieldCipher,
    ) -> VaultResult<RecordId> {
        let mut results = results.clone();
        sanitize_results(&mut results);

        let sensitive = SensitiveFields {
            user_id: options.user_id.map(|s| sanitize_text(&s)),
            user_name: options.user_name.map(|s| sanitize_text(&s)),
            profile_snapshot: options.profile_snapshot,
            notes: options.notes.map(|s| sanitize_text(&s)),
            results: results.clone(),
        };

        let plaintext = serde_json::to_string(&sensitive)?;
        let sealed = cipher.encrypt_field(&plaintext)?;

        let now = Utc::now();
        let record = SavedResultRecord {
            id: RecordId::new(),
            evaluated_at: results.evaluated_at,
            state: options.state.map(|s| sanitize_text(&s)),
            qualified_count: results.qualified_count(),
            programs_evaluated: results.program_ids(),
            tags: options.tags.iter().map(|t| sanitize_text(t)).collect(),
            created_at: now,
            updated_at: now,
            sealed,
        };
        let id = record.id;

        self.repo.upsert(record)?;
        self.repo
            .save()
            .map_err(|e| VaultError::Storage(format!("save {}: {}", id, e)))?;

        Ok(id)
    }

    /// Decrypt and return the results for a record, or None if not found
    pub fn load(
        &self,
        id: RecordId,
        cipher: &dyn FieldCipher,
    ) -> VaultResult<Option<EligibilityResults>> {
        Ok(self.load_fields(id, cipher)?.map(|fields| fields.results))
    }

    /// Decrypt and return the full sensitive payload for a record
    pub fn load_fields(
        &self,
        id: RecordId,
        cipher: &dyn FieldCipher,
    ) -> VaultResult<Option<SensitiveFields>> {
        let record = match self.repo.get(id)? {
            Some(record) => record,
            None => return Ok(None),
        };

        let plaintext = cipher.decrypt_field(&record.sealed)?;
        let fields: SensitiveFields = serde_json::from_str(&plaintext)
            .map_err(|e| VaultError::Storage(format!("load {}: invalid payload: {}", id, e)))?;

        Ok(Some(fields))
    }

    /// Index-only summaries, newest evaluation first
    pub fn list_summaries(&self) -> VaultResult<Vec<RecordSummary>> {
        self.repo.summaries(&CancelToken::new())
    }

    /// Cancellable summary listing
    pub fn list_summaries_with_cancel(
        &self,
        cancel: &CancelToken,
    ) -> VaultResult<Vec<RecordSummary>> {
        self.repo.summaries(cancel)
    }

    /// Delete a record. Deleting an unknown id is an error; the index is
    /// untouched on that path.
    pub fn delete(&self, id: RecordId) -> VaultResult<()> {
        if !self.repo.remove(id)? {
            return Err(VaultError::record_not_found(id.to_string()));
        }
        self.repo
            .save()
            .map_err(|e| VaultError::Storage(format!("delete {}: {}", id, e)))
    }

    /// Update notes and/or tags on a record.
    ///
    /// Only notes, tags, and updated_at may change; id, evaluated_at, and
    /// the stored results are never touched. Notes live inside the sealed
    /// payload, so changing them re-seals it under a fresh nonce.
    pub fn update(
        &self,
        id: RecordId,
        update: RecordUpdate,
        cipher: &dyn FieldCipher,
    ) -> VaultResult<()> {
        let mut record = self
            .repo
            .get(id)?
            .ok_or_else(|| VaultError::record_not_found(id.to_string()))?;

        if let Some(notes) = update.notes {
            let plaintext = cipher.decrypt_field(&record.sealed)?;
            let mut fields: SensitiveFields = serde_json::from_str(&plaintext).map_err(|e| {
                VaultError::Storage(format!("update {}: invalid payload: {}", id, e))
            })?;

            fields.notes = Some(sanitize_text(&notes));
            let replaced = serde_json::to_string(&fields)?;
            record.sealed = cipher.encrypt_field(&replaced)?;
        }

        if let Some(tags) = update.tags {
            record.tags = tags.iter().map(|t| sanitize_text(t)).collect();
        }

        record.updated_at = Utc::now();
        self.repo.upsert(record)?;
        self.repo
            .save()
            .map_err(|e| VaultError::Storage(format!("update {}: {}", id, e)))
    }

    /// Re-seal every record under a new key (passphrase change).
    ///
    /// All payloads are decrypted with the old cipher and re-encrypted
    /// with the new one before anything is persisted, so a record that
    /// fails to open aborts the whole operation with no partial rewrite.
    pub fn rekey(&self, old: &dyn FieldCipher, new: &dyn FieldCipher) -> VaultResult<usize> {
        let summaries = self.repo.summaries(&CancelToken::new())?;

        let mut resealed = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            let mut record = self
                .repo
                .get(summary.id)?
                .ok_or_else(|| VaultError::record_not_found(summary.id.to_string()))?;
            let plaintext = old.decrypt_field(&record.sealed)?;
            record.sealed = new.encrypt_field(&plaintext)?;
            resealed.push(record);
        }

        let count = resealed.len();
        for record in resealed {
            self.repo.upsert(record)?;
        }
        self.repo
            .save()
            .map_err(|e| VaultError::Storage(format!("rekey: {}", e)))?;

        Ok(count)
    }

    /// Number of saved records
    pub fn count(&self) -> VaultResult<usize> {
        self.repo.count()
    }
}
