//! Import command: open a `.bfx` package and recover its results

use clap::Args;
use std::path::PathBuf;

use crate::error::{VaultError, VaultResult};
use crate::export::{self, SealedPackage};

use super::lock::prompt_password;

/// Arguments for `bvault import`
#[derive(Args)]
pub struct ImportArgs {
    /// Path to the .bfx package file
    pub input: PathBuf,

    /// Write the decrypted results JSON here instead of printing a summary
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the import command
pub fn handle_import_command(args: ImportArgs) -> VaultResult<()> {
    let contents = std::fs::read_to_string(&args.input)
        .map_err(|e| VaultError::Io(format!("Failed to read {}: {}", args.input.display(), e)))?;

    let package = SealedPackage::from_json(&contents)?;
    let password = prompt_password("Enter export password: ")?;
    let envelope = export::parse(&package, &password)?;

    println!("Export from: {}", envelope.exported_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(metadata) = &envelope.metadata {
        if let Some(name) = &metadata.user_name {
            println!("Prepared for: {}", name);
        }
        if let Some(state) = &metadata.state {
            println!("State: {}", state);
        }
    }
    println!(
        "{} program(s): {} qualified, {} likely, {} maybe, {} not qualified",
        envelope.results.total_programs,
        envelope.results.qualified.len(),
        envelope.results.likely.len(),
        envelope.results.maybe.len(),
        envelope.results.not_qualified.len(),
    );

    if let Some(output) = args.output {
        let json = serde_json::to_string_pretty(&envelope.results)?;
        std::fs::write(&output, json)
            .map_err(|e| VaultError::Io(format!("Failed to write {}: {}", output.display(), e)))?;
        println!("Results written to: {}", output.display());
    }

    Ok(())
}
