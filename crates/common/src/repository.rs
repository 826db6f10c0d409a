//! Shared repository error type
//!
//! Storage backends behind the domain repositories report failures through
//! this type; handlers convert it into the API [`Error`].

use crate::error::Error;
use thiserror::Error;

/// Repository-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => {
                Error::Unprocessable("Record already exists".to_string())
            }
            RepositoryError::InvalidData(msg) => Error::Unprocessable(msg),
        }
    }
}
