//! Export/import of password-sealed result packages
//!
//! No UI dependency: callers hand in results and a password, and get back a
//! package ready to write to a `.bfx` file (or the reverse).

pub mod package;

pub use package::{
    build, parse, ExportEnvelope, ExportMetadata, ExportOptions, SealedPackage, EXPORT_VERSION,
    MIN_PASSWORD_LEN,
};
