use thiserror::Error;

/// Errors surfaced by the contact store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("contact not found")]
    NotFound,

    #[error("email already in use: {0}")]
    EmailConflict(String),

    #[error("label name already in use: {0}")]
    LabelConflict(String),

    #[error("unknown label: {0}")]
    UnknownLabel(String),

    #[error("config directory not found")]
    NoConfigDir,

    #[error("failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
