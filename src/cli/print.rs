//! Print command: render a results file as a printable HTML document

use clap::Args;
use std::path::PathBuf;

use crate::error::{VaultError, VaultResult};
use crate::print::{build_document, UserInfo};

use super::export::read_results;

/// Arguments for `bvault print`
#[derive(Args)]
pub struct PrintArgs {
    /// Path to the eligibility results JSON file
    pub input: PathBuf,

    /// Output HTML path
    pub output: PathBuf,

    /// Name to show in the document header
    #[arg(long)]
    pub name: Option<String>,

    /// State/jurisdiction label for the header
    #[arg(long)]
    pub state: Option<String>,
}

/// Handle the print command
pub fn handle_print_command(args: PrintArgs) -> VaultResult<()> {
    let results = read_results(&args.input)?;

    let user = if args.name.is_some() || args.state.is_some() {
        Some(UserInfo {
            name: args.name,
            state: args.state,
        })
    } else {
        None
    };

    let html = build_document(&results, user.as_ref());

    std::fs::write(&args.output, html).map_err(|e| {
        VaultError::Io(format!(
            "Failed to write {}: {}",
            args.output.display(),
            e
        ))
    })?;

    println!("Document written to: {}", args.output.display());

    Ok(())
}
