//! Database connection module for the DoseTrack application
//!
//! Provides a process-wide SQLite connection pool. When the database cannot
//! be opened the repositories fall back to in-memory storage, so failures
//! here are reported but never fatal.

use std::env;
use std::sync::Arc;
use once_cell::sync::OnceCell;
use tracing::{error, info};

use super::DatabaseError;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Database connection pool enum
///
/// An enum rather than a bare pool so additional backends can be wired in
/// behind features without touching call sites.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),
}

/// Default path for the SQLite database file
const DEFAULT_DATABASE_PATH: &str = "data/dosetrack.db";

/// Initialize the global database pool and run migrations.
///
/// Reads the database file path from the `DATABASE_PATH` environment
/// variable, falling back to `data/dosetrack.db`.
pub fn init_database() -> Result<(), DatabaseError> {
    let path = env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
    info!("Initializing SQLite database at {}", path);

    if let Some(parent) = std::path::Path::new(&path).parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DatabaseError::ConfigError(format!("Failed to create data directory: {}", e)))?;
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&path);
    let pool = r2d2::Pool::new(manager)
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    // Run migrations on a connection from the fresh pool
    let conn = pool.get().map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
    super::migrations::run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;

    if DB_POOL.set(DatabasePool::SQLite(Arc::new(pool))).is_err() {
        // Another caller won the race; the existing pool stays in place
        error!("Database pool was already initialized");
    }

    info!("Database initialized successfully");
    Ok(())
}

/// Get the global database pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}
