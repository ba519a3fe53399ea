//! Database error types.

use estagios_vagas::StoreError;
use thiserror::Error;

/// SQLite store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to open the database file.
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to execute a statement.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::backend(err)
    }
}
