//! Database layer for the portal.
//!
//! Postings are kept in a single SQLite table. The store implements the
//! record store contract from `estagios-vagas`, so the workflow controller
//! never sees SQL.

mod error;
mod store;

pub use error::DbError;
pub use store::SqliteStore;

/// Path that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite database file, or `:memory:`.
    pub path: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: "estagios.db".to_string(),
        }
    }
}

impl DbConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let path = std::env::var("ESTAGIOS_DATABASE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| Self::default().path);

        Self { path }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }

    /// Open the store this configuration points at.
    pub fn open(&self) -> Result<SqliteStore, DbError> {
        if self.is_in_memory() {
            SqliteStore::open_in_memory()
        } else {
            SqliteStore::open(&self.path)
        }
    }
}
