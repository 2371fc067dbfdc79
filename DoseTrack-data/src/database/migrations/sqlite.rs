use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_injection_events_table(conn)?;
    create_injection_events_index(conn)?;
    create_medications_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the injection events table
fn create_injection_events_table(conn: &Connection) -> Result<(), String> {
    info!("Creating injection_events table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS injection_events (
            id TEXT PRIMARY KEY,
            medication_name TEXT NOT NULL,
            dosage_mg REAL NOT NULL,
            timestamp TEXT NOT NULL,
            half_life_minutes REAL NOT NULL,
            site TEXT,
            notes TEXT,
            rating INTEGER
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on timestamp for efficient filtering
fn create_injection_events_index(conn: &Connection) -> Result<(), String> {
    info!("Creating index on timestamp");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_injection_events_timestamp
        ON injection_events (timestamp DESC)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}

/// Create the medication definitions table
fn create_medications_table(conn: &Connection) -> Result<(), String> {
    info!("Creating medications table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS medications (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            half_life_minutes REAL NOT NULL,
            concentration_mg_per_ml REAL NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}
