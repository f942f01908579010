// src/db/connection.rs
//
// SQLite pool construction. Every pooled connection gets the same pragmas,
// so callers never configure a connection themselves.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// `{data_dir}/crisiscare/crisiscare.db`, used when no path is configured.
/// The directory is created if missing.
pub fn get_database_path() -> AppResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| AppError::Other("No platform data directory available".to_string()))?
        .join("crisiscare");
    std::fs::create_dir_all(&base)?;
    Ok(base.join("crisiscare.db"))
}

/// Open a pool of up to `max_size` connections to `db_path`.
///
/// Connections run in WAL mode with foreign keys on and a 5s busy timeout;
/// concurrent reservation transactions wait on each other rather than
/// failing with SQLITE_BUSY.
pub fn create_connection_pool(db_path: &Path, max_size: u32) -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Cannot open {}: {}", db_path.display(), e)))?;

    log::debug!("Connection pool ready at {} (max {})", db_path.display(), max_size);
    Ok(pool)
}

/// Private in-memory database with foreign keys on
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_shape() {
        if let Ok(path) = get_database_path() {
            assert!(path.ends_with("crisiscare/crisiscare.db"));
        }
    }

    #[test]
    fn test_connection_pool_creation() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("pool.db"), 4).unwrap();
        let conn = pool.get().unwrap();

        let fk_enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_enabled, 1);

        let journal: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal.to_lowercase(), "wal");
    }

    #[test]
    fn test_in_memory_connections_are_isolated() {
        let a = create_test_connection().unwrap();
        let b = create_test_connection().unwrap();
        a.execute_batch("CREATE TABLE probe (x INTEGER);").unwrap();

        let visible: i64 = b
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'probe'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(visible, 0);
    }
}
