use thiserror::Error;

use crate::model::BookStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book id already exists: {0}")]
    DuplicateId(String),
    #[error("book not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("book {id} is already {status}")]
    InvalidTransition { id: String, status: BookStatus },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
