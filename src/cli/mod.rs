//! CLI command handlers

pub mod export;
pub mod import;
pub mod lock;
pub mod print;
pub mod vault;

pub use export::{handle_export_command, ExportArgs};
pub use import::{handle_import_command, ImportArgs};
pub use lock::{handle_lock_command, LockCommands};
pub use print::{handle_print_command, PrintArgs};
pub use vault::{handle_vault_command, VaultCommands};
