use crate::entities::injection::{InjectionEvent, UpdateInjectionRequest};
use crate::entities::medication::Medication;
use uuid::Uuid;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Helper function to safely parse a string ID to UUID
///
/// Centralizes UUID parsing so invalid IDs produce a consistent error
/// message across services.
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert from data model to domain entity for an injection event
pub fn convert_to_domain_event(data_event: dose_track_data::models::injection::InjectionEvent)
    -> InjectionEvent
{
    InjectionEvent {
        id: data_event.id,
        medication_name: data_event.medication_name,
        dosage_mg: data_event.dosage_mg,
        timestamp: data_event.timestamp,
        half_life_minutes: data_event.half_life_minutes,
        site: data_event.site,
        notes: data_event.notes,
        rating: data_event.rating,
    }
}

/// Convert from domain entity to data model for an update request
pub fn convert_to_data_update_request(domain_request: &UpdateInjectionRequest)
    -> dose_track_data::models::injection::UpdateInjectionRequest
{
    dose_track_data::models::injection::UpdateInjectionRequest {
        medication_name: domain_request.medication_name.clone(),
        dosage_mg: domain_request.dosage_mg,
        timestamp: domain_request.timestamp.clone(),
        half_life_minutes: domain_request.half_life_minutes,
        site: domain_request.site.clone(),
        notes: domain_request.notes.clone(),
        rating: domain_request.rating,
    }
}

/// Convert from data model to domain entity for a medication definition
pub fn convert_to_domain_medication(data_medication: dose_track_data::models::medication::Medication)
    -> Medication
{
    Medication {
        id: data_medication.id,
        name: data_medication.name,
        half_life_minutes: data_medication.half_life_minutes,
        concentration_mg_per_ml: data_medication.concentration_mg_per_ml,
    }
}
