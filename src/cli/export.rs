//! Export command: seal a result set into a portable `.bfx` package

use clap::Args;
use std::path::PathBuf;

use crate::error::{VaultError, VaultResult};
use crate::export::{self, ExportOptions};
use crate::models::EligibilityResults;

use super::lock::prompt_new_password;

/// Arguments for `bvault export`
#[derive(Args)]
pub struct ExportArgs {
    /// Path to the eligibility results JSON file
    pub input: PathBuf,

    /// Output package path (conventionally with a .bfx extension)
    pub output: PathBuf,

    /// Name to stamp into the export metadata
    #[arg(long)]
    pub name: Option<String>,

    /// State/jurisdiction label for the metadata
    #[arg(long)]
    pub state: Option<String>,

    /// Free-form notes for the metadata
    #[arg(long)]
    pub notes: Option<String>,
}

/// Handle the export command
pub fn handle_export_command(args: ExportArgs) -> VaultResult<()> {
    let results = read_results(&args.input)?;

    println!("Choose a password for this export.");
    let password = prompt_new_password()?;

    let options = ExportOptions {
        user_name: args.name,
        state: args.state,
        notes: args.notes,
        profile_snapshot: None,
    };

    let package = export::build(&results, &password, options)?;
    let json = package.to_json()?;

    std::fs::write(&args.output, json).map_err(|e| {
        VaultError::Io(format!(
            "Failed to write {}: {}",
            args.output.display(),
            e
        ))
    })?;

    println!(
        "Exported {} program(s) to: {}",
        results.total_programs,
        args.output.display()
    );

    Ok(())
}

/// Read and deserialize a results file
pub fn read_results(path: &PathBuf) -> VaultResult<EligibilityResults> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| VaultError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| VaultError::Validation(format!("invalid results file: {}", e)))
}
