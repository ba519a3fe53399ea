//! SQLite-backed record store.

use std::path::Path;

use estagios_vagas::{Posting, PostingFields, PostingId, RecordStore, StoreError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::DbError;

const SELECT_COLUMNS: &str = "SELECT id, titulo, empresa, telefone, descricao, email FROM vagas";

/// SQLite record store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.display().to_string(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: super::IN_MEMORY.to_string(),
            source,
        })?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema.
    ///
    /// AUTOINCREMENT keeps SQLite from handing out the rowid of a deleted
    /// posting again.
    fn init_schema(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS vagas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                titulo TEXT NOT NULL,
                empresa TEXT NOT NULL,
                telefone TEXT NOT NULL,
                descricao TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        debug!("Posting store schema initialized");
        Ok(())
    }

    /// Number of stored postings.
    pub fn count(&self) -> Result<i64, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vagas", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn posting_from_row(row: &Row<'_>) -> rusqlite::Result<Posting> {
    Ok(Posting::new(
        PostingId::new(row.get(0)?),
        PostingFields {
            titulo: row.get(1)?,
            empresa: row.get(2)?,
            telefone: row.get(3)?,
            descricao: row.get(4)?,
            email: row.get(5)?,
        },
    ))
}

impl RecordStore for SqliteStore {
    fn create(&mut self, fields: &PostingFields) -> Result<PostingId, StoreError> {
        let now = chrono::Utc::now().timestamp();
        self.conn
            .execute(
                r#"
                INSERT INTO vagas (titulo, empresa, telefone, descricao, email, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                "#,
                params![
                    fields.titulo,
                    fields.empresa,
                    fields.telefone,
                    fields.descricao,
                    fields.email,
                    now,
                ],
            )
            .map_err(DbError::Query)?;

        let id = PostingId::new(self.conn.last_insert_rowid());
        debug!(posting_id = %id, "Posting inserted");
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<Posting>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .map_err(DbError::Query)?;

        let postings = stmt
            .query_map([], posting_from_row)
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(DbError::Query)?;

        Ok(postings)
    }

    fn fetch_by_id(&self, id: PostingId) -> Result<Option<Posting>, StoreError> {
        let posting = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.value()],
                posting_from_row,
            )
            .optional()
            .map_err(DbError::Query)?;

        Ok(posting)
    }

    fn update_by_id(&mut self, id: PostingId, fields: &PostingFields) -> Result<(), StoreError> {
        let now = chrono::Utc::now().timestamp();
        let changed = self
            .conn
            .execute(
                r#"
                UPDATE vagas
                SET titulo = ?1, empresa = ?2, telefone = ?3, descricao = ?4, email = ?5, updated_at = ?6
                WHERE id = ?7
                "#,
                params![
                    fields.titulo,
                    fields.empresa,
                    fields.telefone,
                    fields.descricao,
                    fields.email,
                    now,
                    id.value(),
                ],
            )
            .map_err(DbError::Query)?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(posting_id = %id, "Posting replaced");
        Ok(())
    }

    fn delete_by_id(&mut self, id: PostingId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM vagas WHERE id = ?1", params![id.value()])
            .map_err(DbError::Query)?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(posting_id = %id, "Posting removed");
        Ok(())
    }

    fn health_check(&self) -> Result<(), StoreError> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(DbError::Query)?;
        Ok(())
    }
}
