//! benefit-vault - Encrypted storage and portable export for benefit
//! eligibility results
//!
//! This library seals benefit-eligibility result sets with a password so they
//! can be saved locally or handed to another person as a portable package.
//! Keys are derived with Argon2id and payloads are encrypted with
//! AES-256-GCM. All user-visible text is sanitized before it is sealed and
//! again after it is opened.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: Key derivation, authenticated encryption, session keys
//! - `models`: Eligibility results and saved record types
//! - `sanitize`: Markup and URL sanitization
//! - `export`: Portable encrypted package format (.bfx)
//! - `print`: Printable HTML document builder
//! - `storage`: Encrypted-at-rest record store
//! - `cli`: Command handlers for the `bvault` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use benefit_vault::export;
//!
//! let package = export::build(&results, "correct horse battery", Default::default())?;
//! let envelope = export::parse(&package, "correct horse battery")?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod export;
pub mod models;
pub mod print;
pub mod sanitize;
pub mod storage;

pub use error::{VaultError, VaultResult};
