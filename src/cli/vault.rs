//! Vault record commands: save, list, show, update, delete

use clap::Subcommand;
use std::path::PathBuf;

use crate::config::{paths::VaultPaths, settings::Settings};
use crate::error::{VaultError, VaultResult};
use crate::models::RecordId;
use crate::storage::{RecordUpdate, ResultVaultStore, SaveOptions};

use super::export::read_results;
use super::lock::unlock_session;

/// Saved-record management commands
#[derive(Subcommand)]
pub enum VaultCommands {
    /// Save a results file into the vault
    Save {
        /// Path to the eligibility results JSON file
        input: PathBuf,

        /// Display name to store (encrypted)
        #[arg(long)]
        name: Option<String>,

        /// State/jurisdiction label (plaintext index)
        #[arg(long)]
        state: Option<String>,

        /// Notes to store (encrypted)
        #[arg(long)]
        notes: Option<String>,

        /// Tags (plaintext index, repeatable)
        #[arg(long)]
        tag: Vec<String>,
    },

    /// List saved records, newest evaluation first
    List,

    /// Decrypt and print one record's results
    Show {
        /// Record id
        id: String,
    },

    /// Update notes and/or tags on a record
    Update {
        /// Record id
        id: String,

        /// New notes (encrypted)
        #[arg(long)]
        notes: Option<String>,

        /// Replacement tags (repeatable)
        #[arg(long)]
        tag: Vec<String>,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: String,
    },
}

/// Handle vault record commands
pub fn handle_vault_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: VaultCommands,
) -> VaultResult<()> {
    if !settings.is_encryption_enabled() {
        return Err(VaultError::Config(
            "vault passphrase not set; run 'bvault lock init' first".to_string(),
        ));
    }

    let store = ResultVaultStore::open(paths.records_file())?;

    match cmd {
        VaultCommands::Save {
            input,
            name,
            state,
            notes,
            tag,
        } => {
            let results = read_results(&input)?;
            let session = unlock_session(settings)?;
            let options = SaveOptions {
                user_id: None,
                user_name: name,
                state,
                notes,
                tags: tag,
                profile_snapshot: None,
            };
            let id = store.save(&results, options, &session)?;
            println!("Saved record {}", id);
            Ok(())
        }

        VaultCommands::List => {
            let summaries = store.list_summaries()?;
            if summaries.is_empty() {
                println!("No saved records.");
                return Ok(());
            }
            for summary in summaries {
                let state = summary.state.as_deref().unwrap_or("-");
                let tags = if summary.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", summary.tags.join(", "))
                };
                println!(
                    "{}  {}  {}  {}/{} qualified{}",
                    summary.id,
                    summary.evaluated_at.format("%Y-%m-%d"),
                    state,
                    summary.qualified_count,
                    summary.programs_evaluated.len(),
                    tags,
                );
            }
            Ok(())
        }

        VaultCommands::Show { id } => {
            let id = parse_id(&id)?;
            let session = unlock_session(settings)?;
            match store.load(id, &session)? {
                Some(results) => {
                    let json = serde_json::to_string_pretty(&results)?;
                    println!("{}", json);
                    Ok(())
                }
                None => Err(VaultError::record_not_found(id.to_string())),
            }
        }

        VaultCommands::Update { id, notes, tag } => {
            let id = parse_id(&id)?;
            let session = unlock_session(settings)?;
            let update = RecordUpdate {
                notes,
                tags: (!tag.is_empty()).then_some(tag),
            };
            store.update(id, update, &session)?;
            println!("Updated record {}", id);
            Ok(())
        }

        VaultCommands::Delete { id } => {
            let id = parse_id(&id)?;
            store.delete(id)?;
            println!("Deleted record {}", id);
            Ok(())
        }
    }
}

fn parse_id(s: &str) -> VaultResult<RecordId> {
    s.parse()
        .map_err(|_| VaultError::Validation(format!("invalid record id: {}", s)))
}
