//! Database connection management with pragma configuration.
//!
//! Opens the SQLite database, applies the pragmas the record store relies
//! on (WAL for concurrent readers, NORMAL sync) and brings the schema up to
//! date. The applied schema version lives in SQLite's `user_version`.

use std::path::Path;

use tokio_rusqlite::Connection;

use super::StoreError;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Schema steps; step `n` (0-based) moves `user_version` from `n` to `n + 1`.
const SCHEMA: &[&str] = &[include_str!("../../migrations/001_characters.sql")];

/// SQLite-backed record store.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Cloning shares the connection.
#[derive(Clone, Debug)]
pub struct RecordDb {
    pub(crate) conn: Connection,
}

impl RecordDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).await.map_err(|e| StoreError::Database(e.into()))?;
        Self::prepare(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        Self::prepare(conn).await
    }

    async fn prepare(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(StoreError::Database)?;

        migrate(&conn).await?;

        Ok(Self { conn })
    }
}

/// Apply every schema step past the stored `user_version`, one transaction each.
async fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.call(|conn| -> Result<(), StoreError> {
        let applied: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        for (version, sql) in (1u32..).zip(SCHEMA).skip(applied as usize) {
            tracing::debug!(version, "upgrading schema");
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| StoreError::MigrationFailed(format!("schema version {version}: {e}")))?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()?;
        }

        Ok(())
    })
    .await
    .map_err(StoreError::from)
}
