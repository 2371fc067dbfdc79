use thiserror::Error;
use chrono::{DateTime, Utc};
use validator::Validate;
use async_trait::async_trait;

use crate::entities::injection::{
    CreateInjectionRequest, DoseUnit, InjectionEvent, UpdateInjectionRequest,
};
use crate::entities::conversions;
use dose_track_data::repository::{
    InjectionRepositoryTrait, MedicationRepositoryTrait, RepositoryError,
};

/// Injection service errors
#[derive(Debug, Error)]
pub enum InjectionServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Injection event not found: {0}")]
    NotFound(String),

    /// No medication definition matches the requested name
    #[error("Unknown medication: {0}")]
    UnknownMedication(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for injection service operations
#[async_trait]
pub trait InjectionServiceTrait {
    /// Validate a create injection request
    fn validate_create_request(
        &self,
        request: &CreateInjectionRequest,
    ) -> Result<(), InjectionServiceError>;

    /// Log a new injection. The dose is converted to milligrams and the
    /// medication's half-life is captured onto the stored event.
    async fn create_event(
        &self,
        request: CreateInjectionRequest,
    ) -> Result<InjectionEvent, InjectionServiceError>;

    /// Get the full injection history, oldest first
    async fn get_all_events(&self) -> Result<Vec<InjectionEvent>, InjectionServiceError>;

    /// Get an injection event by ID
    async fn get_event_by_id(&self, id: &str) -> Result<InjectionEvent, InjectionServiceError>;

    /// Edit an existing injection event
    async fn update_event(
        &self,
        id: &str,
        request: UpdateInjectionRequest,
    ) -> Result<InjectionEvent, InjectionServiceError>;

    /// Delete an injection event
    async fn delete_event(&self, id: &str) -> Result<(), InjectionServiceError>;
}

/// Injection service for domain logic
pub struct InjectionService<R: InjectionRepositoryTrait, M: MedicationRepositoryTrait> {
    repository: R,
    medications: M,
}

impl<R: InjectionRepositoryTrait, M: MedicationRepositoryTrait> InjectionService<R, M> {
    /// Create a new injection service
    pub fn new(repository: R, medications: M) -> Self {
        Self { repository, medications }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> InjectionServiceError {
        match err {
            RepositoryError::NotFound(msg) => InjectionServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => InjectionServiceError::ValidationError(msg),
            _ => InjectionServiceError::RepositoryError(err.to_string()),
        }
    }
}

/// Flatten validator errors into a single readable message
fn validation_message(validation_errors: validator::ValidationErrors) -> String {
    validation_errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| {
                    if let Some(msg) = &err.message {
                        msg.to_string()
                    } else {
                        format!("Invalid {}", field)
                    }
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// Timestamps are validated strictly at entry time; only pre-existing
/// history is allowed to carry unparsable values.
fn validate_timestamp(timestamp: &str) -> Result<(), InjectionServiceError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|_| ())
        .map_err(|_| {
            InjectionServiceError::ValidationError(format!(
                "Invalid timestamp format (expected RFC 3339): {}",
                timestamp
            ))
        })
}

#[async_trait]
impl<R, M> InjectionServiceTrait for InjectionService<R, M>
where
    R: InjectionRepositoryTrait + Send + Sync,
    M: MedicationRepositoryTrait + Send + Sync,
{
    /// Validate a create injection request
    fn validate_create_request(
        &self,
        request: &CreateInjectionRequest,
    ) -> Result<(), InjectionServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(InjectionServiceError::ValidationError(validation_message(
                validation_errors,
            )));
        }

        if let Some(timestamp) = &request.timestamp {
            validate_timestamp(timestamp)?;
        }

        Ok(())
    }

    /// Log a new injection
    async fn create_event(
        &self,
        request: CreateInjectionRequest,
    ) -> Result<InjectionEvent, InjectionServiceError> {
        self.validate_create_request(&request)?;

        // Resolve the medication definition; its half-life is captured onto
        // the event so later definition edits leave history stable
        let medication = self
            .medications
            .find_by_name(&request.medication_name)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| InjectionServiceError::UnknownMedication(request.medication_name.clone()))?;

        // Canonicalize the dose to milligrams
        let dosage_mg = match request.dose_unit {
            DoseUnit::Mg => request.dose_amount,
            DoseUnit::Ml => {
                if !(medication.concentration_mg_per_ml > 0.0) {
                    return Err(InjectionServiceError::ValidationError(format!(
                        "Medication {} has no concentration; enter the dose in mg",
                        medication.name
                    )));
                }
                request.dose_amount * medication.concentration_mg_per_ml
            }
        };

        let timestamp = request
            .timestamp
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let data_request = dose_track_data::models::injection::CreateInjectionRequest {
            medication_name: request.medication_name,
            dosage_mg,
            timestamp,
            half_life_minutes: medication.half_life_minutes,
            site: request.site,
            notes: request.notes,
            rating: request.rating,
        };

        let data_event = self
            .repository
            .create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(conversions::convert_to_domain_event(data_event))
    }

    /// Get the full injection history
    async fn get_all_events(&self) -> Result<Vec<InjectionEvent>, InjectionServiceError> {
        let data_events = self
            .repository
            .get_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(data_events
            .into_iter()
            .map(conversions::convert_to_domain_event)
            .collect())
    }

    /// Get an injection event by ID
    async fn get_event_by_id(&self, id: &str) -> Result<InjectionEvent, InjectionServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id)
            .map_err(InjectionServiceError::ValidationError)?;

        let data_event = self
            .repository
            .get_by_id(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| {
                InjectionServiceError::NotFound(format!("Injection event with ID {} not found", id))
            })?;

        Ok(conversions::convert_to_domain_event(data_event))
    }

    /// Edit an existing injection event
    async fn update_event(
        &self,
        id: &str,
        request: UpdateInjectionRequest,
    ) -> Result<InjectionEvent, InjectionServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(InjectionServiceError::ValidationError(validation_message(
                validation_errors,
            )));
        }

        if let Some(timestamp) = &request.timestamp {
            validate_timestamp(timestamp)?;
        }

        let id_uuid = conversions::parse_string_to_uuid(id)
            .map_err(InjectionServiceError::ValidationError)?;

        let data_request = conversions::convert_to_data_update_request(&request);

        let data_event = self
            .repository
            .update(id_uuid, data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(conversions::convert_to_domain_event(data_event))
    }

    /// Delete an injection event
    async fn delete_event(&self, id: &str) -> Result<(), InjectionServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id)
            .map_err(InjectionServiceError::ValidationError)?;

        self.repository
            .delete(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))
    }
}
