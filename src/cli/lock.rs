//! Vault passphrase lifecycle commands
//!
//! Initializing the vault passphrase, verifying it, and changing it.
//! A fixed sentinel sealed under the vault key is stored in settings, so a
//! passphrase can be checked without touching any record.

use clap::Subcommand;

use crate::config::{paths::VaultPaths, settings::Settings};
use crate::crypto::{
    open_string, seal_string, KeyDerivationParams, SealedBox, SecureString, SessionKey,
};
use crate::error::{VaultError, VaultResult};
use crate::export::MIN_PASSWORD_LEN;
use crate::storage::ResultVaultStore;

/// Sentinel sealed into the verification token
const VERIFY_SENTINEL: &str = "bvault_verify";

/// Vault passphrase management commands
#[derive(Subcommand)]
pub enum LockCommands {
    /// Set up the vault passphrase
    Init,

    /// Verify the vault passphrase is correct
    Verify,

    /// Change the vault passphrase (re-encrypts all saved records)
    #[command(alias = "change")]
    ChangePassphrase,

    /// Show vault encryption status
    Status,
}

/// Handle passphrase commands
pub fn handle_lock_command(
    paths: &VaultPaths,
    settings: &mut Settings,
    cmd: LockCommands,
) -> VaultResult<()> {
    match cmd {
        LockCommands::Init => init_passphrase(paths, settings),
        LockCommands::Verify => verify_passphrase(settings),
        LockCommands::ChangePassphrase => change_passphrase(paths, settings),
        LockCommands::Status => show_status(settings),
    }
}

fn init_passphrase(paths: &VaultPaths, settings: &mut Settings) -> VaultResult<()> {
    if settings.is_encryption_enabled() {
        println!("The vault passphrase is already set.");
        println!("Use 'bvault lock change-passphrase' to change it.");
        return Ok(());
    }

    println!("Set Vault Passphrase");
    println!("====================");
    println!();
    println!("Saved results are encrypted with AES-256-GCM under a key derived");
    println!("from this passphrase. If you forget it, saved records cannot be");
    println!("recovered.");
    println!();

    let password = prompt_new_password()?;

    let key_params = KeyDerivationParams::new();
    println!("Deriving encryption key...");
    let session = SessionKey::unlock(&password, &key_params)?;

    let token = seal_string(VERIFY_SENTINEL, session.derived_key())?;

    settings.encryption.enabled = true;
    settings.encryption.key_params = Some(key_params);
    settings.encryption.verification_token = Some(token.as_str().to_string());
    settings.save(paths)?;

    println!();
    println!("Vault passphrase set.");

    Ok(())
}

fn verify_passphrase(settings: &Settings) -> VaultResult<()> {
    if !settings.is_encryption_enabled() {
        println!("The vault passphrase has not been set. Run 'bvault lock init'.");
        return Ok(());
    }

    match unlock_session(settings) {
        Ok(_) => {
            println!("Passphrase is correct.");
            Ok(())
        }
        Err(e) => {
            println!("Passphrase is incorrect.");
            Err(e)
        }
    }
}

fn change_passphrase(paths: &VaultPaths, settings: &mut Settings) -> VaultResult<()> {
    if !settings.is_encryption_enabled() {
        println!("The vault passphrase has not been set. Run 'bvault lock init'.");
        return Ok(());
    }

    println!("Change Vault Passphrase");
    println!("=======================");
    println!();

    let old_session = unlock_session(settings)?;
    println!("Current passphrase verified.");
    println!();

    let new_password = prompt_new_password()?;
    let new_params = KeyDerivationParams::new();
    println!("Deriving new encryption key...");
    let new_session = SessionKey::unlock(&new_password, &new_params)?;

    // Re-seal every saved record under the new key before committing the
    // new settings, so a failure leaves everything readable with the old
    // passphrase
    let store = ResultVaultStore::open(paths.records_file())?;
    let count = store.rekey(&old_session, &new_session)?;

    let token = seal_string(VERIFY_SENTINEL, new_session.derived_key())?;
    settings.encryption.key_params = Some(new_params);
    settings.encryption.verification_token = Some(token.as_str().to_string());
    settings.save(paths)?;

    println!();
    println!("Passphrase changed; {} record(s) re-encrypted.", count);

    Ok(())
}

fn show_status(settings: &Settings) -> VaultResult<()> {
    if settings.is_encryption_enabled() {
        println!("Vault passphrase: SET");
        if let Some(params) = &settings.encryption.key_params {
            println!("Key derivation: Argon2id");
            println!("  Memory cost: {} KiB", params.memory_cost);
            println!("  Time cost: {} iterations", params.time_cost);
            println!("  Parallelism: {} threads", params.parallelism);
        }
    } else {
        println!("Vault passphrase: NOT SET");
        println!("Run 'bvault lock init' before saving results.");
    }
    Ok(())
}

/// Prompt for the vault passphrase and return an unlocked session key.
///
/// Used by every vault command that reads or writes sealed payloads.
pub fn unlock_session(settings: &Settings) -> VaultResult<SessionKey> {
    let key_params = settings
        .encryption
        .key_params
        .as_ref()
        .ok_or_else(|| VaultError::Config("vault passphrase not set".to_string()))?;

    let token = settings
        .encryption
        .verification_token
        .as_ref()
        .ok_or_else(|| VaultError::Config("no verification token found".to_string()))?;

    let password = prompt_password("Enter vault passphrase: ")?;
    let session = SessionKey::unlock(&password, key_params)?;

    let sealed = SealedBox::from_encoded(token.clone());
    let sentinel = open_string(&sealed, session.derived_key())?;
    if sentinel != VERIFY_SENTINEL {
        return Err(VaultError::Decryption);
    }

    Ok(session)
}

/// Prompt for a new password with confirmation and minimum length
pub fn prompt_new_password() -> VaultResult<SecureString> {
    loop {
        let pass1 = prompt_password("Enter new passphrase: ")?;

        if pass1.len() < MIN_PASSWORD_LEN {
            println!(
                "Passphrase must be at least {} characters. Please try again.",
                MIN_PASSWORD_LEN
            );
            continue;
        }

        let pass2 = prompt_password("Confirm passphrase: ")?;

        if pass1.as_str() != pass2.as_str() {
            println!("Passphrases do not match. Please try again.");
            continue;
        }

        return Ok(pass1);
    }
}

/// Prompt for a password (hidden input); the buffer is wiped on drop
pub fn prompt_password(prompt: &str) -> VaultResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| VaultError::Io(format!("Failed to read passphrase: {}", e)))
}
