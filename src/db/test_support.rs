// src/db/test_support.rs
//
// File-backed pools for tests. In-memory SQLite gives every pooled
// connection its own database, so concurrency tests need a real file.

use std::sync::Arc;

use rusqlite::params;
use tempfile::TempDir;
use uuid::Uuid;

use super::{create_connection_pool, initialize_database, ConnectionPool};
use crate::domain::{User, UserRole};
use crate::repositories::{SqliteUserRepository, UserRepository};

pub struct TestDatabase {
    pub pool: Arc<ConnectionPool>,
    // Keeps the directory alive for the lifetime of the pool
    _dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let pool = create_connection_pool(&dir.path().join("test.db"), 8).expect("create pool");
        {
            let conn = pool.get().expect("get connection");
            initialize_database(&conn).expect("initialize schema");
        }
        Self {
            pool: Arc::new(pool),
            _dir: dir,
        }
    }

    /// Insert a user directly, bypassing registration
    pub fn seed_user(&self, firstname: &str, email: &str, role: UserRole) -> User {
        let user = User::new(
            firstname.to_string(),
            "Tester".to_string(),
            email.to_string(),
            "555-0199".to_string(),
            role,
            "seed$seed".to_string(),
        );
        SqliteUserRepository::new(self.pool.clone())
            .save(&user)
            .expect("seed user");
        user
    }

    /// Mark a resource taken behind the repositories' back, as a concurrent
    /// reservation would
    pub fn withdraw_resource(&self, resource_id: Uuid) {
        withdraw_resource(&self.pool, resource_id);
    }
}

pub fn withdraw_resource(pool: &ConnectionPool, resource_id: Uuid) {
    let changed = pool
        .get()
        .expect("get connection")
        .execute(
            "UPDATE resources SET is_available = 0 WHERE id = ?1",
            params![resource_id.to_string()],
        )
        .expect("withdraw resource");
    assert_eq!(changed, 1, "resource {} not found", resource_id);
}
