use tracing::debug;
use uuid::Uuid;

use crate::models::injection::InjectionEvent;
use crate::models::medication::Medication;
use crate::database::DatabasePool;
use super::errors::RepositoryError;

/// Database storage operations for injection events and medications
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Store an injection event in the database
    pub async fn store_event(pool: &DatabasePool, event: &InjectionEvent) -> Result<(), RepositoryError> {
        debug!("Storing injection event in database: id={}", event.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get().map_err(RepositoryError::Pool)?;

                conn.execute(
                    "INSERT INTO injection_events
                     (id, medication_name, dosage_mg, timestamp, half_life_minutes, site, notes, rating)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    (
                        &event.id,
                        &event.medication_name,
                        event.dosage_mg,
                        &event.timestamp,
                        event.half_life_minutes,
                        &event.site,
                        &event.notes,
                        event.rating,
                    ),
                ).map_err(RepositoryError::Sqlite)?;

                Ok(())
            },
        }
    }

    /// Get all injection events from the database, oldest first
    pub async fn get_all_events(pool: &DatabasePool) -> Result<Vec<InjectionEvent>, RepositoryError> {
        debug!("Getting all injection events from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, medication_name, dosage_mg, timestamp, half_life_minutes, site, notes, rating
                     FROM injection_events ORDER BY timestamp ASC"
                )?;

                let events = stmt.query_map([], |row| {
                    Ok(InjectionEvent {
                        id: row.get(0)?,
                        medication_name: row.get(1)?,
                        dosage_mg: row.get(2)?,
                        timestamp: row.get(3)?,
                        half_life_minutes: row.get(4)?,
                        site: row.get(5)?,
                        notes: row.get(6)?,
                        rating: row.get::<_, Option<i32>>(7)?.map(|r| r as u8),
                    })
                })?;

                let mut result = Vec::new();
                for event in events {
                    result.push(event?);
                }

                Ok(result)
            },
        }
    }

    /// Get an injection event by ID from the database
    pub async fn get_event_by_id(pool: &DatabasePool, id: &Uuid) -> Result<Option<InjectionEvent>, RepositoryError> {
        debug!("Getting injection event by ID from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, medication_name, dosage_mg, timestamp, half_life_minutes, site, notes, rating
                     FROM injection_events WHERE id = ?"
                )?;

                let event = stmt.query_row([&id.to_string()], |row| {
                    Ok(InjectionEvent {
                        id: row.get(0)?,
                        medication_name: row.get(1)?,
                        dosage_mg: row.get(2)?,
                        timestamp: row.get(3)?,
                        half_life_minutes: row.get(4)?,
                        site: row.get(5)?,
                        notes: row.get(6)?,
                        rating: row.get::<_, Option<i32>>(7)?.map(|r| r as u8),
                    })
                });

                match event {
                    Ok(event) => Ok(Some(event)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(RepositoryError::Sqlite(e)),
                }
            },
        }
    }

    /// Overwrite an existing injection event in the database.
    /// Returns true if a row was updated.
    pub async fn update_event(pool: &DatabasePool, event: &InjectionEvent) -> Result<bool, RepositoryError> {
        debug!("Updating injection event in database: id={}", event.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let updated = conn.execute(
                    "UPDATE injection_events
                     SET medication_name = ?2, dosage_mg = ?3, timestamp = ?4,
                         half_life_minutes = ?5, site = ?6, notes = ?7, rating = ?8
                     WHERE id = ?1",
                    (
                        &event.id,
                        &event.medication_name,
                        event.dosage_mg,
                        &event.timestamp,
                        event.half_life_minutes,
                        &event.site,
                        &event.notes,
                        event.rating,
                    ),
                )?;

                Ok(updated > 0)
            },
        }
    }

    /// Delete an injection event from the database.
    /// Returns true if a row was deleted.
    pub async fn delete_event(pool: &DatabasePool, id: &Uuid) -> Result<bool, RepositoryError> {
        debug!("Deleting injection event from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let deleted = conn.execute(
                    "DELETE FROM injection_events WHERE id = ?",
                    [&id.to_string()],
                )?;

                Ok(deleted > 0)
            },
        }
    }

    /// Store a medication definition in the database
    pub async fn store_medication(pool: &DatabasePool, medication: &Medication) -> Result<(), RepositoryError> {
        debug!("Storing medication in database: id={}", medication.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    "INSERT INTO medications (id, name, half_life_minutes, concentration_mg_per_ml)
                     VALUES (?1, ?2, ?3, ?4)",
                    (
                        &medication.id,
                        &medication.name,
                        medication.half_life_minutes,
                        medication.concentration_mg_per_ml,
                    ),
                ).map_err(RepositoryError::Sqlite)?;

                Ok(())
            },
        }
    }

    /// Get all medication definitions from the database
    pub async fn get_all_medications(pool: &DatabasePool) -> Result<Vec<Medication>, RepositoryError> {
        debug!("Getting all medications from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, name, half_life_minutes, concentration_mg_per_ml
                     FROM medications ORDER BY name ASC"
                )?;

                let medications = stmt.query_map([], |row| {
                    Ok(Medication {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        half_life_minutes: row.get(2)?,
                        concentration_mg_per_ml: row.get(3)?,
                    })
                })?;

                let mut result = Vec::new();
                for medication in medications {
                    result.push(medication?);
                }

                Ok(result)
            },
        }
    }

    /// Find a medication definition by name (case-insensitive)
    pub async fn find_medication_by_name(pool: &DatabasePool, name: &str) -> Result<Option<Medication>, RepositoryError> {
        debug!("Finding medication by name in database: name={}", name);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, name, half_life_minutes, concentration_mg_per_ml
                     FROM medications WHERE name = ? COLLATE NOCASE"
                )?;

                let medication = stmt.query_row([name], |row| {
                    Ok(Medication {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        half_life_minutes: row.get(2)?,
                        concentration_mg_per_ml: row.get(3)?,
                    })
                });

                match medication {
                    Ok(medication) => Ok(Some(medication)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(RepositoryError::Sqlite(e)),
                }
            },
        }
    }
}
