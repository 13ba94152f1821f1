use rusqlite::{Connection, OptionalExtension, params};

use crate::time::now_unix;

use super::StorageError;
use super::types::StoredValue;

pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<StoredValue, StorageError> {
    let mut stmt = conn.prepare(
        "INSERT INTO local_state (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
         RETURNING key, value, updated_at",
    )?;
    let saved = stmt.query_row(params![key, value, now_unix()], |row| {
        Ok(StoredValue {
            key: row.get(0)?,
            value: row.get(1)?,
            updated_at: row.get(2)?,
        })
    })?;
    Ok(saved)
}

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<StoredValue>, StorageError> {
    let mut stmt =
        conn.prepare("SELECT key, value, updated_at FROM local_state WHERE key = ?1")?;
    let found = stmt
        .query_row(params![key], |row| {
            Ok(StoredValue {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })
        .optional()?;
    Ok(found)
}
