use anyhow::Result;
use clap::{Parser, Subcommand};

use benefit_vault::cli::{
    handle_export_command, handle_import_command, handle_lock_command, handle_print_command,
    handle_vault_command, ExportArgs, ImportArgs, LockCommands, PrintArgs, VaultCommands,
};
use benefit_vault::config::{paths::VaultPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "bvault",
    version,
    about = "Encrypted storage and portable export for benefit eligibility results",
    long_about = "bvault seals benefit-eligibility results with a password so they can \
                  be saved locally or handed to a caseworker as a portable .bfx \
                  package. Saved records are encrypted at rest with AES-256-GCM \
                  under a key derived from your vault passphrase."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a results file as an encrypted .bfx package
    Export(ExportArgs),

    /// Open a .bfx package and show or save its results
    Import(ImportArgs),

    /// Saved-record management commands
    #[command(subcommand)]
    Vault(VaultCommands),

    /// Render a results file as a printable HTML document
    Print(PrintArgs),

    /// Vault passphrase management commands
    #[command(subcommand)]
    Lock(LockCommands),

    /// Initialize the vault directories and set the passphrase
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = VaultPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Commands::Export(args) => handle_export_command(args)?,
        Commands::Import(args) => handle_import_command(args)?,
        Commands::Print(args) => handle_print_command(args)?,
        Commands::Vault(cmd) => handle_vault_command(&paths, &settings, cmd)?,
        Commands::Lock(cmd) => handle_lock_command(&paths, &mut settings, cmd)?,
        Commands::Init => {
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialized vault at: {}", paths.base_dir().display());
            handle_lock_command(&paths, &mut settings, LockCommands::Init)?;
        }
        Commands::Config => {
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file: {}", paths.settings_file().display());
            println!("Records file: {}", paths.records_file().display());
            println!(
                "Passphrase: {}",
                if settings.is_encryption_enabled() {
                    "set"
                } else {
                    "not set"
                }
            );
        }
    }

    Ok(())
}
