use serde::{Deserialize, Serialize};

/// Data model for a stored injection event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionEvent {
    /// Unique identifier for the event
    pub id: String,

    /// Name of the injected medication
    pub medication_name: String,

    /// Administered amount in milligrams (canonical unit)
    pub dosage_mg: f64,

    /// When the dose was administered (RFC 3339)
    pub timestamp: String,

    /// Half-life in minutes, captured from the medication definition
    /// at creation time. Values <= 0 mark the event as inert.
    pub half_life_minutes: f64,

    /// Optional injection site (e.g., "left deltoid")
    pub site: Option<String>,

    /// Optional notes about the injection
    pub notes: Option<String>,

    /// Optional wellness rating (1-5)
    pub rating: Option<u8>,
}

/// Request payload for creating a new injection event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInjectionRequest {
    pub medication_name: String,
    pub dosage_mg: f64,
    pub timestamp: String,
    pub half_life_minutes: f64,
    pub site: Option<String>,
    pub notes: Option<String>,
    pub rating: Option<u8>,
}

/// Request payload for updating an existing injection event.
/// Fields left as None keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInjectionRequest {
    pub medication_name: Option<String>,
    pub dosage_mg: Option<f64>,
    pub timestamp: Option<String>,
    pub half_life_minutes: Option<f64>,
    pub site: Option<String>,
    pub notes: Option<String>,
    pub rating: Option<u8>,
}
