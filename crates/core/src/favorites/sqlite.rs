use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::backend::{FavoritesBackend, StoreError, StoreResult};
use super::FAVORITES_KEY;

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQLite-backed key-value slot for the favorites payload.
///
/// The database holds a single `kv` table; favorites live under
/// [`FAVORITES_KEY`]. Each save is one upsert, so readers see either the
/// previous payload or the new one.
#[derive(Debug)]
pub struct SqliteFavoritesBackend {
    conn: Connection,
    path: Option<PathBuf>,
    key: String,
}

impl SqliteFavoritesBackend {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn, path: Some(path.to_path_buf()), key: FAVORITES_KEY.to_string() })
    }

    /// Private in-memory database; nothing survives the process.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn, path: None, key: FAVORITES_KEY.to_string() })
    }

    /// Expose the underlying connection for inspection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn schema_version(&self) -> StoreResult<i32> {
        current_schema_version(&self.conn)
    }

    /// Timestamp of the last save, RFC 3339.
    pub fn updated_at(&self) -> StoreResult<Option<String>> {
        let updated = self
            .conn
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", params![self.key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(updated)
    }

    /// Remove the stored payload entirely, returning to the never-saved state.
    pub fn clear(&self) -> StoreResult<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![self.key])?;
        Ok(())
    }
}

impl FavoritesBackend for SqliteFavoritesBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        let payload = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![self.key], |row| row.get(0))
            .optional()?;
        Ok(payload)
    }

    fn save(&self, payload: &[u8]) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![self.key, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}

/// Bring the database to the latest schema version.
///
/// `PRAGMA user_version` is the version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: kv table
fn apply_migrations(conn: &Connection) -> StoreResult<()> {
    let current_version = current_schema_version(conn)?;

    // Reject DBs created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      BLOB NOT NULL,
                updated_at TEXT NOT NULL
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

fn current_schema_version(conn: &Connection) -> StoreResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
