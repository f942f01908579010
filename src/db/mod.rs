// src/db/mod.rs
//
// SQLite storage: pooled connections and versioned schema.

pub mod connection;
pub mod migrations;

#[cfg(test)]
pub mod test_support;

pub use connection::{create_connection_pool, get_database_path, ConnectionPool};

pub use migrations::{
    get_database_stats, initialize_database, verify_database_integrity, DatabaseStats,
};
