//! Error taxonomy for dictionary builds, parsing, and store access.

use std::path::PathBuf;

use crate::store::StoreMode;

pub type Result<T> = std::result::Result<T, DictError>;

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// The build task was asked for a dictionary type no parser is registered for.
    #[error("no parser registered for dictionary type '{kind}'")]
    Configuration { kind: String },

    /// The source flat file is missing or unreadable.
    #[error("cannot read source file {path}: {reason}")]
    Source { path: PathBuf, reason: String },

    /// The whole source file yielded zero acceptable lines.
    #[error("no terms found in {path}")]
    NoTermsFound { path: PathBuf },

    /// The persisted store is structurally invalid.
    #[error("corrupt term store {path} at offset {offset}: {reason}")]
    Corrupt {
        path: PathBuf,
        offset: u64,
        reason: String,
    },

    /// An operation was attempted on a handle opened in the other mode.
    #[error("operation '{operation}' is not supported on a store opened in {mode:?} mode")]
    WrongMode {
        operation: &'static str,
        mode: StoreMode,
    },

    /// Orchestrator-level failure, annotated with the 1-based ordinal of the
    /// failing entry when the parser got far enough to know one.
    #[error("build of dictionary '{dictionary}' failed{}: {message}", .entry_ordinal.map_or_else(String::new, |n| format!(" at entry {n}")))]
    Build {
        dictionary: String,
        message: String,
        entry_ordinal: Option<u64>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("store record encode failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("store record decode failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}
