//! Raw key/value storage backends.
//!
//! # Responsibility
//! - Read and overwrite string values by key.
//! - Keep SQL details out of the persistence contract.
//!
//! # Invariants
//! - `put` replaces any previous value for the key in a single statement.
//! - `put_batch` lands every entry or none on backends that support it.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// Backend refused the operation (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid stored document: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// String key/value storage contract.
pub trait KeyValueStorage {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Overwrites several entries.
    ///
    /// The default writes entries one by one and stops at the first error.
    fn put_batch(&self, entries: &[(String, String)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(())
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn put_batch(&self, entries: &[(String, String)]) -> StoreResult<()> {
        (**self).put_batch(entries)
    }
}

const UPSERT_ENTRY_SQL: &str = "INSERT INTO kv_entries (key, value, updated_at)
     VALUES (?1, ?2, strftime('%s', 'now') * 1000)
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";

/// SQLite-backed storage over the `kv_entries` table.
pub struct SqliteKeyValueStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStorage<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStorage for SqliteKeyValueStorage<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(UPSERT_ENTRY_SQL, params![key, value])?;
        Ok(())
    }

    /// Writes all entries in one transaction; any failure rolls back all.
    fn put_batch(&self, entries: &[(String, String)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_ENTRY_SQL)?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Process-local storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn put_batch(&self, entries: &[(String, String)]) -> StoreResult<()> {
        self.entries.borrow_mut().extend(entries.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage};
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_put_overwrites_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let storage = SqliteKeyValueStorage::new(&conn);

        assert_eq!(storage.get("teamsync:tasks").unwrap(), None);
        storage.put("teamsync:tasks", "[1]").unwrap();
        storage.put("teamsync:tasks", "[2]").unwrap();

        assert_eq!(storage.get("teamsync:tasks").unwrap().as_deref(), Some("[2]"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn memory_storage_keeps_keys_independent() {
        let storage = MemoryKeyValueStorage::new();
        storage.put("a", "1").unwrap();
        storage.put("b", "2").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn sqlite_batch_rolls_back_when_one_entry_fails() {
        let conn = open_db_in_memory().unwrap();
        let storage = SqliteKeyValueStorage::new(&conn);
        storage.put("teamsync:teamMembers", "[1]").unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_tasks BEFORE INSERT ON kv_entries
             WHEN NEW.key = 'teamsync:tasks'
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();

        let batch = [
            ("teamsync:teamMembers".to_string(), "[]".to_string()),
            ("teamsync:tasks".to_string(), "[]".to_string()),
        ];
        assert!(storage.put_batch(&batch).is_err());

        assert_eq!(
            storage.get("teamsync:teamMembers").unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(storage.get("teamsync:tasks").unwrap(), None);
    }
}
