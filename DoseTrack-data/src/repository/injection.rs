use tracing::{debug, error};
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::injection::{InjectionEvent, CreateInjectionRequest, UpdateInjectionRequest};
use crate::database::get_db_pool;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for injection events
#[async_trait]
pub trait InjectionRepositoryTrait {
    /// Create a new injection event from a request
    async fn create(&self, request: CreateInjectionRequest) -> Result<InjectionEvent, RepositoryError>;

    /// Get all injection events, oldest first
    async fn get_all(&self) -> Result<Vec<InjectionEvent>, RepositoryError>;

    /// Get an injection event by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<InjectionEvent>, RepositoryError>;

    /// Update an existing injection event, merging the provided fields
    async fn update(&self, id: Uuid, request: UpdateInjectionRequest) -> Result<InjectionEvent, RepositoryError>;

    /// Delete an injection event
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Repository for injection events.
/// Uses the SQLite database when available with an in-memory fallback.
#[derive(Debug, Clone, Default)]
pub struct InjectionRepository {
    /// In-memory storage for when the database is not available
    storage: InMemoryStorage,
}

impl InjectionRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

/// Apply an update request on top of a stored event
fn merge_update(existing: InjectionEvent, request: UpdateInjectionRequest) -> InjectionEvent {
    InjectionEvent {
        id: existing.id,
        medication_name: request.medication_name.unwrap_or(existing.medication_name),
        dosage_mg: request.dosage_mg.unwrap_or(existing.dosage_mg),
        timestamp: request.timestamp.unwrap_or(existing.timestamp),
        half_life_minutes: request.half_life_minutes.unwrap_or(existing.half_life_minutes),
        site: request.site.or(existing.site),
        notes: request.notes.or(existing.notes),
        rating: request.rating.or(existing.rating),
    }
}

#[async_trait]
impl InjectionRepositoryTrait for InjectionRepository {
    /// Create a new injection event from a request
    async fn create(&self, request: CreateInjectionRequest) -> Result<InjectionEvent, RepositoryError> {
        // Generate a unique ID
        let id = Uuid::new_v4();

        let event = InjectionEvent {
            id: id.to_string(),
            medication_name: request.medication_name,
            dosage_mg: request.dosage_mg,
            timestamp: request.timestamp,
            half_life_minutes: request.half_life_minutes,
            site: request.site,
            notes: request.notes,
            rating: request.rating,
        };

        // Try to store in database first
        match get_db_pool() {
            Ok(pool) => {
                debug!("Storing injection event in database: {}", event.id);
                match DatabaseStorage::store_event(&pool, &event).await {
                    Ok(_) => Ok(event),
                    Err(e) => {
                        error!("Failed to store event in database: {}", e);
                        // Fall back to in-memory storage
                        self.storage.store_event(&event).await
                    }
                }
            },
            Err(e) => {
                // Database not available, use in-memory storage
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_event(&event).await
            }
        }
    }

    /// Get all injection events
    async fn get_all(&self) -> Result<Vec<InjectionEvent>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting all injection events from database");
                match DatabaseStorage::get_all_events(&pool).await {
                    Ok(events) => Ok(events),
                    Err(e) => {
                        error!("Failed to get events from database: {}", e);
                        self.storage.get_all_events().await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_all", e);
                self.storage.get_all_events().await
            }
        }
    }

    /// Get an injection event by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<InjectionEvent>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting injection event by ID from database: {}", id);
                match DatabaseStorage::get_event_by_id(&pool, &id).await {
                    Ok(event) => Ok(event),
                    Err(e) => {
                        error!("Failed to get event by ID from database: {}", e);
                        self.storage.get_event_by_id(&id).await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_by_id", e);
                self.storage.get_event_by_id(&id).await
            }
        }
    }

    /// Update an existing injection event, merging the provided fields
    async fn update(&self, id: Uuid, request: UpdateInjectionRequest) -> Result<InjectionEvent, RepositoryError> {
        let existing = self.get_by_id(id).await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Injection event {} not found", id)))?;

        let updated = merge_update(existing, request);

        match get_db_pool() {
            Ok(pool) => {
                debug!("Updating injection event in database: {}", id);
                match DatabaseStorage::update_event(&pool, &updated).await {
                    Ok(true) => Ok(updated),
                    Ok(false) => Err(RepositoryError::NotFound(format!("Injection event {} not found", id))),
                    Err(e) => {
                        error!("Failed to update event in database: {}", e);
                        self.storage.store_event(&updated).await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for update", e);
                self.storage.store_event(&updated).await
            }
        }
    }

    /// Delete an injection event
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let deleted = match get_db_pool() {
            Ok(pool) => {
                debug!("Deleting injection event from database: {}", id);
                match DatabaseStorage::delete_event(&pool, &id).await {
                    Ok(deleted) => deleted,
                    Err(e) => {
                        error!("Failed to delete event from database: {}", e);
                        self.storage.delete_event(&id).await?
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for delete", e);
                self.storage.delete_event(&id).await?
            }
        };

        if deleted {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!("Injection event {} not found", id)))
        }
    }
}

/// Mock injection repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock implementation of InjectionRepository for testing
    #[derive(Debug, Clone, Default)]
    pub struct MockInjectionRepository {
        events: Arc<Mutex<Vec<InjectionEvent>>>,
    }

    impl MockInjectionRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined events
        pub fn with_events(events: Vec<InjectionEvent>) -> Self {
            Self { events: Arc::new(Mutex::new(events)) }
        }
    }

    #[async_trait]
    impl InjectionRepositoryTrait for MockInjectionRepository {
        async fn create(&self, request: CreateInjectionRequest) -> Result<InjectionEvent, RepositoryError> {
            let event = InjectionEvent {
                id: Uuid::new_v4().to_string(),
                medication_name: request.medication_name,
                dosage_mg: request.dosage_mg,
                timestamp: request.timestamp,
                half_life_minutes: request.half_life_minutes,
                site: request.site,
                notes: request.notes,
                rating: request.rating,
            };

            self.events.lock()?.push(event.clone());
            Ok(event)
        }

        async fn get_all(&self) -> Result<Vec<InjectionEvent>, RepositoryError> {
            let mut events = self.events.lock()?.clone();
            events.sort_by_key(|event| super::super::in_memory::parsed_timestamp(&event.timestamp));
            Ok(events)
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<InjectionEvent>, RepositoryError> {
            let events = self.events.lock()?;
            Ok(events.iter().find(|e| e.id == id.to_string()).cloned())
        }

        async fn update(&self, id: Uuid, request: UpdateInjectionRequest) -> Result<InjectionEvent, RepositoryError> {
            let mut events = self.events.lock()?;
            let event = events.iter_mut()
                .find(|e| e.id == id.to_string())
                .ok_or_else(|| RepositoryError::NotFound(format!("Injection event {} not found", id)))?;

            *event = merge_update(event.clone(), request);
            Ok(event.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
            let mut events = self.events.lock()?;
            let before = events.len();
            events.retain(|e| e.id != id.to_string());

            if events.len() < before {
                Ok(())
            } else {
                Err(RepositoryError::NotFound(format!("Injection event {} not found", id)))
            }
        }
    }
}
