//! Core error types for pomolog-core.
//!
//! One thiserror enum per subsystem, folded into [`CoreError`] at the top.
//! Nothing in the core is fatal: load paths recover to defaults, save paths
//! return errors the caller logs and swallows.

use std::path::PathBuf;
use thiserror::Error;

use crate::activity::ActivityId;

/// Top-level error type for pomolog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Ledger precondition violations
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Settings validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Record could not be serialized
    #[error("Record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Ledger precondition violations.
///
/// The timer engine sequences ledger calls so these are unreachable in
/// normal operation; they exist so the ledger never panics on misuse.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// No activity with the given id
    #[error("No activity with id {0}")]
    NotFound(ActivityId),

    /// A segment is already open on this activity
    #[error("Activity {0} already has an open segment")]
    SegmentAlreadyOpen(ActivityId),

    /// No open segment to close
    #[error("Activity {0} has no open segment")]
    NoOpenSegment(ActivityId),

    /// The activity has already been finalized
    #[error("Activity {0} is already finalized")]
    AlreadyFinalized(ActivityId),
}

/// Settings validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value for a settings field
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Unknown settings key in get/set
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
