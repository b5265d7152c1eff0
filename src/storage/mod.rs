//! Storage layer for benefit-vault
//!
//! JSON file persistence with atomic writes, the saved-record repository,
//! and the vault store operations built on top of it.

pub mod cancel;
pub mod file_io;
pub mod records;

pub use cancel::CancelToken;
pub use file_io::{read_json, write_json_atomic};
pub use records::{RecordRepository, RecordUpdate, ResultVaultStore, SaveOptions};
