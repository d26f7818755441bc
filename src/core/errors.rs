use std::result::Result as StdResult;

use thiserror::Error;

use crate::storage::StoreError;

/// Unified error type for the domain, storage and service layers.
#[derive(Error, Debug)]
pub enum MoneyNoteError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid settings file: {0}")]
    InvalidSettings(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, MoneyNoteError>;

impl From<std::io::Error> for MoneyNoteError {
    fn from(err: std::io::Error) -> Self {
        MoneyNoteError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for MoneyNoteError {
    fn from(err: serde_json::Error) -> Self {
        MoneyNoteError::Storage(err.to_string())
    }
}

impl From<StoreError> for MoneyNoteError {
    fn from(err: StoreError) -> Self {
        MoneyNoteError::Storage(err.to_string())
    }
}
