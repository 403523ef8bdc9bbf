use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    conn.pragma_update(None, "wal_autocheckpoint", 100)?;

    // In-memory databases reject this; not fatal.
    if conn
        .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
        .is_ok()
    {
        tracing::debug!("startup WAL checkpoint complete");
    }

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS history (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL,
            person_name TEXT NOT NULL,
            birth_date  TEXT NOT NULL,
            matrix_json TEXT NOT NULL,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL,
            UNIQUE (owner_id, birth_date)
        );

        CREATE TABLE IF NOT EXISTS compatibility_history (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL,
            pair_id     TEXT NOT NULL,
            name1       TEXT NOT NULL,
            date1       TEXT NOT NULL,
            name2       TEXT NOT NULL,
            date2       TEXT NOT NULL,
            matrix_json TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            UNIQUE (owner_id, pair_id)
        );

        CREATE TABLE IF NOT EXISTS celebrities (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            birth_date  TEXT NOT NULL,
            main_arcana INTEGER NOT NULL CHECK (main_arcana BETWEEN 1 AND 22)
        );

        CREATE INDEX IF NOT EXISTS idx_history_owner ON history(owner_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_compat_owner ON compatibility_history(owner_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_celeb_arcana ON celebrities(main_arcana);
        ",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    tracing::info!(version = SCHEMA_VERSION, "schema initialized");
    Ok(())
}
