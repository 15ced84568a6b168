use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::KeyedStore;

/// Bumped whenever the `kv` layout changes.
const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
PRAGMA user_version = 1;
";

/// SQLite-backed [`KeyedStore`]: a single `kv` table, one row per key.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create store directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open SQLite store {}", db_path.display()))?;

        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }

        ensure_schema(&conn)?;

        info!("Store initialized at {}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("store connection lock poisoned"))
    }
}

impl KeyedStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to read key '{key}'"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .with_context(|| format!("failed to write key '{key}'"))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("failed to remove key '{key}'"))?;
        Ok(())
    }
}

/// Creates the `kv` table on a fresh file. A file written by a newer build is
/// refused rather than read with the wrong layout.
fn ensure_schema(conn: &Connection) -> Result<()> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    if version > SCHEMA_VERSION {
        bail!("store schema version {version} is newer than supported {SCHEMA_VERSION}");
    }
    if version < SCHEMA_VERSION {
        conn.execute_batch(SCHEMA).context("failed to create kv table")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyedStoreExt;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.sqlite3");

        {
            let store = SqliteStore::open(path.clone()).unwrap();
            store.set("tasks_1", "[]").unwrap();
            store.set("tasks_1", "[1,2]").unwrap();
            store.set("user", "{}").unwrap();
            store.remove("user").unwrap();
        }

        let reopened = SqliteStore::open(path).unwrap();
        assert_eq!(reopened.get("tasks_1").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(reopened.get("user").unwrap(), None);
        assert_eq!(reopened.load::<Vec<u32>>("tasks_1").unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn corrupt_row_is_deleted_on_typed_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("store.sqlite3")).unwrap();
        store.set("pomodoro_1", "{{{").unwrap();

        assert_eq!(store.load::<serde_json::Value>("pomodoro_1").unwrap(), None);
        assert_eq!(store.get("pomodoro_1").unwrap(), None);
    }

    #[test]
    fn refuses_store_from_newer_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite3");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
                .unwrap();
        }

        let err = SqliteStore::open(path).err().unwrap();
        assert!(format!("{err:#}").contains("newer than supported"));
    }
}
