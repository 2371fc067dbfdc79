use thiserror::Error;
use validator::Validate;
use async_trait::async_trait;

use crate::entities::conversions;
use crate::entities::medication::{CreateMedicationRequest, Medication};
use dose_track_data::repository::{MedicationRepositoryTrait, RepositoryError};

/// Medication service errors
#[derive(Debug, Error)]
pub enum MedicationServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A medication with this name already exists
    #[error("Medication already exists: {0}")]
    AlreadyExists(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for medication service operations
#[async_trait]
pub trait MedicationServiceTrait {
    /// List all medication definitions
    async fn list_medications(&self) -> Result<Vec<Medication>, MedicationServiceError>;

    /// Create a new medication definition
    async fn create_medication(
        &self,
        request: CreateMedicationRequest,
    ) -> Result<Medication, MedicationServiceError>;
}

/// Medication service for domain logic
pub struct MedicationService<M: MedicationRepositoryTrait> {
    repository: M,
}

impl<M: MedicationRepositoryTrait> MedicationService<M> {
    /// Create a new medication service
    pub fn new(repository: M) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> MedicationServiceError {
        match err {
            RepositoryError::Validation(msg) => MedicationServiceError::ValidationError(msg),
            _ => MedicationServiceError::RepositoryError(err.to_string()),
        }
    }
}

#[async_trait]
impl<M: MedicationRepositoryTrait + Send + Sync> MedicationServiceTrait for MedicationService<M> {
    /// List all medication definitions
    async fn list_medications(&self) -> Result<Vec<Medication>, MedicationServiceError> {
        let data_medications = self
            .repository
            .get_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(data_medications
            .into_iter()
            .map(conversions::convert_to_domain_medication)
            .collect())
    }

    /// Create a new medication definition
    async fn create_medication(
        &self,
        request: CreateMedicationRequest,
    ) -> Result<Medication, MedicationServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(MedicationServiceError::ValidationError(
                validation_errors.to_string(),
            ));
        }

        // Names must be unique; the case-insensitive lookup mirrors how
        // injections resolve their medication at entry time
        let existing = self
            .repository
            .find_by_name(&request.name)
            .await
            .map_err(|e| self.map_repo_error(e))?;
        if existing.is_some() {
            return Err(MedicationServiceError::AlreadyExists(request.name));
        }

        let data_request = dose_track_data::models::medication::CreateMedicationRequest {
            name: request.name,
            half_life_minutes: request.half_life_minutes,
            concentration_mg_per_ml: request.concentration_mg_per_ml,
        };

        let data_medication = self
            .repository
            .create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(conversions::convert_to_domain_medication(data_medication))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dose_track_data::repository::medication_tests::MockMedicationRepository;

    fn create_request(name: &str) -> CreateMedicationRequest {
        CreateMedicationRequest {
            name: name.to_string(),
            half_life_minutes: 7200.0,
            concentration_mg_per_ml: 250.0,
        }
    }

    #[tokio::test]
    async fn test_create_medication_valid() {
        let service = MedicationService::new(MockMedicationRepository::new());
        let medication = service
            .create_medication(create_request("Testosterone Enanthate"))
            .await
            .unwrap();

        assert_eq!(medication.name, "Testosterone Enanthate");
        assert_eq!(medication.half_life_minutes, 7200.0);
    }

    #[tokio::test]
    async fn test_create_medication_rejects_non_positive_half_life() {
        let service = MedicationService::new(MockMedicationRepository::new());
        let mut request = create_request("Testosterone Enanthate");
        request.half_life_minutes = 0.0;

        let result = service.create_medication(request).await;
        assert!(matches!(result, Err(MedicationServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_medication_rejects_duplicate_name() {
        let existing = dose_track_data::models::medication::Medication {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Testosterone Enanthate".to_string(),
            half_life_minutes: 7200.0,
            concentration_mg_per_ml: 250.0,
        };
        let service = MedicationService::new(MockMedicationRepository::with_medications(vec![existing]));

        let result = service
            .create_medication(create_request("testosterone enanthate"))
            .await;
        assert!(matches!(result, Err(MedicationServiceError::AlreadyExists(_))));
    }
}
