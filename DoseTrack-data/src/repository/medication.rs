use tracing::{debug, error};
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::medication::{Medication, CreateMedicationRequest};
use crate::database::get_db_pool;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for medication definitions
#[async_trait]
pub trait MedicationRepositoryTrait {
    /// Create a new medication definition from a request
    async fn create(&self, request: CreateMedicationRequest) -> Result<Medication, RepositoryError>;

    /// Get all medication definitions
    async fn get_all(&self) -> Result<Vec<Medication>, RepositoryError>;

    /// Find a medication definition by name (case-insensitive)
    async fn find_by_name(&self, name: &str) -> Result<Option<Medication>, RepositoryError>;
}

/// Repository for medication definitions.
/// Uses the SQLite database when available with an in-memory fallback.
#[derive(Debug, Clone, Default)]
pub struct MedicationRepository {
    /// In-memory storage for when the database is not available
    storage: InMemoryStorage,
}

impl MedicationRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

#[async_trait]
impl MedicationRepositoryTrait for MedicationRepository {
    /// Create a new medication definition from a request
    async fn create(&self, request: CreateMedicationRequest) -> Result<Medication, RepositoryError> {
        let medication = Medication {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            half_life_minutes: request.half_life_minutes,
            concentration_mg_per_ml: request.concentration_mg_per_ml,
        };

        match get_db_pool() {
            Ok(pool) => {
                debug!("Storing medication in database: {}", medication.id);
                match DatabaseStorage::store_medication(&pool, &medication).await {
                    Ok(_) => Ok(medication),
                    Err(e) => {
                        error!("Failed to store medication in database: {}", e);
                        self.storage.store_medication(&medication).await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_medication(&medication).await
            }
        }
    }

    /// Get all medication definitions
    async fn get_all(&self) -> Result<Vec<Medication>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting all medications from database");
                match DatabaseStorage::get_all_medications(&pool).await {
                    Ok(medications) => Ok(medications),
                    Err(e) => {
                        error!("Failed to get medications from database: {}", e);
                        self.storage.get_all_medications().await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_all", e);
                self.storage.get_all_medications().await
            }
        }
    }

    /// Find a medication definition by name (case-insensitive)
    async fn find_by_name(&self, name: &str) -> Result<Option<Medication>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Finding medication by name in database: {}", name);
                match DatabaseStorage::find_medication_by_name(&pool, name).await {
                    Ok(medication) => Ok(medication),
                    Err(e) => {
                        error!("Failed to find medication by name in database: {}", e);
                        self.storage.find_medication_by_name(name).await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for find_by_name", e);
                self.storage.find_medication_by_name(name).await
            }
        }
    }
}

/// Mock medication repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;

    /// Mock implementation of MedicationRepository for testing
    #[derive(Debug, Clone, Default)]
    pub struct MockMedicationRepository {
        medications: Vec<Medication>,
    }

    impl MockMedicationRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined medications
        pub fn with_medications(medications: Vec<Medication>) -> Self {
            Self { medications }
        }
    }

    #[async_trait]
    impl MedicationRepositoryTrait for MockMedicationRepository {
        async fn create(&self, request: CreateMedicationRequest) -> Result<Medication, RepositoryError> {
            Ok(Medication {
                id: Uuid::new_v4().to_string(),
                name: request.name,
                half_life_minutes: request.half_life_minutes,
                concentration_mg_per_ml: request.concentration_mg_per_ml,
            })
        }

        async fn get_all(&self) -> Result<Vec<Medication>, RepositoryError> {
            Ok(self.medications.clone())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Medication>, RepositoryError> {
            let needle = name.to_lowercase();
            Ok(self.medications.iter().find(|m| m.name.to_lowercase() == needle).cloned())
        }
    }
}
