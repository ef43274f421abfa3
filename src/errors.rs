//! Typed error hierarchy for HelixDesk.
//!
//! Three top-level enums cover the three layers:
//! - `BoardError`: board mutations that reference unknown columns or tasks
//!   (with `UpdateError` for merges that may also be malformed)
//! - `StoreError`: flat-file document I/O and (de)serialisation
//! - `ClientError`: REST client transport failures and store preconditions
//!
//! The HTTP-facing `ApiError` lives in `backend::api` next to the handlers
//! that produce it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from pure board operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Column {id} not found")]
    ColumnNotFound { id: String },

    #[error("Task {id} not found")]
    TaskNotFound { id: String },
}

/// Failure of a shallow-merge update on the board.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    NotFound(#[from] BoardError),

    #[error("Invalid update: {0}")]
    Invalid(#[source] serde_json::Error),
}

/// Errors from the flat-file document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read data file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write data file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file at {path} is not a valid document: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialise document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Store task panicked: {0}")]
    Join(String),
}

/// Errors surfaced by client stores and the REST client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Server answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Column {id} not found")]
    ColumnNotFound { id: String },

    #[error("Task {id} not found")]
    TaskNotFound { id: String },

    #[error("Task {task_id} is not in column {column_id}")]
    TaskNotInColumn { task_id: String, column_id: String },

    #[error("Customer {id} not found")]
    CustomerNotFound { id: String },

    #[error("No user profile is set")]
    NoUser,

    #[error("Invalid update: {0}")]
    InvalidUpdate(#[source] serde_json::Error),

    #[error("Resynchronisation failed after {cause}: {source}")]
    ResyncFailed {
        cause: Box<ClientError>,
        #[source]
        source: Box<ClientError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<BoardError> for ClientError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::ColumnNotFound { id } => Self::ColumnNotFound { id },
            BoardError::TaskNotFound { id } => Self::TaskNotFound { id },
        }
    }
}
