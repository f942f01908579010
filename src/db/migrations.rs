// src/db/migrations.rs
//
// Versioned schema migrations.
//
// Each entry in MIGRATIONS runs once, in order, inside its own transaction
// together with its schema_version row. Re-running is a no-op; a database
// newer than this build is refused.

use rusqlite::{params, Connection};

use crate::error::{AppError, AppResult};

/// Ordered `(version, sql)` pairs; versions must be strictly increasing
const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("../../schema.sql"))];

fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Bring the schema up to the latest version
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL
        );",
    )?;

    let current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(AppError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current, latest
        )));
    }

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| AppError::Other(format!("Migration {} failed: {}", version, e)))?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
            params![version],
        )?;
        tx.commit()?;
        log::info!("Applied schema migration {}", version);
    }

    Ok(())
}

fn schema_version(conn: &Connection) -> AppResult<i32> {
    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// `PRAGMA integrity_check` must report `ok`
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(AppError::Other(format!("Database integrity check failed: {}", result)));
    }
    Ok(())
}

/// Size and row counts, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub user_count: i64,
    pub request_count: i64,
    pub open_request_count: i64,
    pub resource_count: i64,
    pub available_resource_count: i64,
}

pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let count = |sql: &str| -> AppResult<i64> { Ok(conn.query_row(sql, [], |row| row.get(0))?) };

    Ok(DatabaseStats {
        size_bytes: count("SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()")?,
        user_count: count("SELECT COUNT(*) FROM users")?,
        request_count: count("SELECT COUNT(*) FROM requests")?,
        open_request_count: count("SELECT COUNT(*) FROM requests WHERE is_confirmed = 0")?,
        resource_count: count("SELECT COUNT(*) FROM resources")?,
        available_resource_count: count("SELECT COUNT(*) FROM resources WHERE is_available = 1")?,
    })
}
