//! Domain error types for Showtrack.
//!
//! Silent no-ops (insert of an existing id, update or delete of a missing
//! row) are not errors; they are reported as `false` by the data access
//! layer. Everything here is a real failure the caller has to handle.

use super::show::ShowId;
use thiserror::Error;

/// Failures of the data access layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage failure: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Database has been shut down")]
    Closed,
}

/// Errors raised by list management.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("List not found: {0}")]
    NotFound(String),

    #[error("A list named {0:?} already exists")]
    AlreadyExists(String),

    #[error("Invalid list name: {0:?}")]
    InvalidName(String),

    #[error("{0} is a status list and cannot be removed")]
    ProtectedList(String),

    #[error("{0} is a status list; change the show's status instead")]
    StatusList(String),

    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<anyhow::Error> for ListError {
    fn from(err: anyhow::Error) -> Self {
        ListError::Store(StoreError::Storage(err))
    }
}

impl From<tokio::task::JoinError> for ListError {
    fn from(err: tokio::task::JoinError) -> Self {
        ListError::Store(StoreError::Task(err))
    }
}

/// Errors produced while validating a user rating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("Enter a valid number.")]
    NotANumber,

    #[error("Rating must be between 0 and 10.")]
    OutOfRange(f32),

    #[error("Rating is too long.")]
    TooLong,
}

/// Unified error type for the library service.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
