//! Error taxonomy shared by the store, the repository, and the surfaces.

use thiserror::Error;

/// Failures surfaced by note operations.
///
/// `EmptyText` and `NoVideo` are caught at the UI boundary and shown as user
/// messages; `NotFound` and `Storage` propagate to the caller.
#[derive(Debug, Error)]
pub enum NotesError {
    /// The record or note index targeted by a delete does not exist
    #[error("note not found")]
    NotFound,
    /// Note text was empty or whitespace-only; nothing was written
    #[error("note text must not be empty")]
    EmptyText,
    /// The current page carries no video to annotate
    #[error("no video on the current page")]
    NoVideo,
    /// The underlying store failed; carries the reason for display
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type NotesResult<T> = Result<T, NotesError>;

impl From<std::io::Error> for NotesError {
    fn from(err: std::io::Error) -> Self {
        NotesError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for NotesError {
    fn from(err: serde_json::Error) -> Self {
        NotesError::Storage(err.to_string())
    }
}
