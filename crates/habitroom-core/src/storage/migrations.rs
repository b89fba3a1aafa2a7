//! Database schema migrations for habitroom.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration
//! version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::info;

/// Apply all pending migrations to bring the database to the current schema
/// version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// v1: base tables for habits, logs, reminders, projects, and progress.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    info!("applying schema migration v1");
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            category        TEXT NOT NULL DEFAULT 'other',
            recurrence_kind TEXT NOT NULL DEFAULT 'daily',
            recurrence_value TEXT,
            target_value    INTEGER NOT NULL DEFAULT 1,
            target_unit     TEXT NOT NULL DEFAULT 'times',
            created_at      TEXT NOT NULL,
            is_active       INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS logs (
            id          TEXT PRIMARY KEY,
            habit_id    TEXT NOT NULL,
            date        TEXT NOT NULL,
            value       INTEGER NOT NULL DEFAULT 1,
            status      TEXT NOT NULL DEFAULT 'Completed',
            notes       TEXT,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_logs_habit_date ON logs(habit_id, date);
        CREATE INDEX IF NOT EXISTS idx_logs_date ON logs(date);

        CREATE TABLE IF NOT EXISTS reminders (
            id           TEXT PRIMARY KEY,
            text         TEXT NOT NULL,
            priority     TEXT NOT NULL DEFAULT 'medium',
            created_at   TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS projects (
            id           TEXT PRIMARY KEY,
            text         TEXT NOT NULL,
            description  TEXT,
            priority     TEXT NOT NULL DEFAULT 'medium',
            created_at   TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS user_progress (
            id       INTEGER PRIMARY KEY CHECK (id = 1),
            total_xp INTEGER NOT NULL DEFAULT 0
        );

        INSERT OR IGNORE INTO user_progress (id, total_xp) VALUES (1, 0);",
    )?;
    set_schema_version(conn, 1)
}

/// v2: badge set on the progress singleton.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    info!("applying schema migration v2");
    conn.execute_batch(
        "ALTER TABLE user_progress ADD COLUMN unlocked_badges TEXT NOT NULL DEFAULT '[]';",
    )?;
    set_schema_version(conn, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);

        // Progress singleton seeded.
        let (xp, badges): (i64, String) = conn
            .query_row(
                "SELECT total_xp, unlocked_badges FROM user_progress WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(xp, 0);
        assert_eq!(badges, "[]");
    }

    #[test]
    fn migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    #[test]
    fn incremental_migration_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    #[test]
    fn duplicate_log_dates_rejected_by_index() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO habits (id, name, created_at) VALUES ('h1', 'H', 't')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO logs (id, habit_id, date, recorded_at) VALUES ('a', 'h1', '2024-01-01', 't')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO logs (id, habit_id, date, recorded_at) VALUES ('b', 'h1', '2024-01-01', 't')",
            [],
        );
        assert!(dup.is_err());
    }
}
