//! SQLite-backed key-value storage.
//!
//! # Responsibility
//! - Persist slots in the `kv_store` table of a migrated connection.
//!
//! # Invariants
//! - One row per key; writes are upserts.
//! - The connection must come from `db::open_db*` so the schema exists.

use super::{KeyValueStorage, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value storage over a borrowed SQLite connection.
pub struct SqliteStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStorage<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStorage for SqliteStorage<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStorage;
    use crate::db::open_db_in_memory;
    use crate::storage::KeyValueStorage;

    #[test]
    fn set_item_overwrites_existing_value() {
        let conn = open_db_in_memory().unwrap();
        let storage = SqliteStorage::new(&conn);

        storage.set_item("tasks", "[]").unwrap();
        storage.set_item("tasks", "[{}]").unwrap();

        assert_eq!(storage.get_item("tasks").unwrap().as_deref(), Some("[{}]"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let conn = open_db_in_memory().unwrap();
        let storage = SqliteStorage::new(&conn);

        storage.remove_item("absent").unwrap();
        assert_eq!(storage.get_item("absent").unwrap(), None);
    }
}
