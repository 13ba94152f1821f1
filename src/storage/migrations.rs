use rusqlite::Connection;

use super::StorageError;
use crate::time::now_unix;

#[cfg(test)]
pub const CURRENT_VERSION: i64 = 1;

struct Migration {
    version: i64,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("sql/001_initial.sql"),
}];

pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _schema (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM _schema", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        conn.execute_batch(migration.sql)
            .map_err(|e| StorageError::Migration {
                version: migration.version,
                error: e.to_string(),
            })?;
        conn.execute(
            "INSERT INTO _schema (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![migration.version, now_unix()],
        )?;
    }

    Ok(())
}
