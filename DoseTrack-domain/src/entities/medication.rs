use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Domain model for a medication definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Medication {
    /// Unique identifier for the medication
    pub id: String,

    /// Display name (e.g., "Testosterone Enanthate")
    pub name: String,

    /// Elimination half-life in minutes
    pub half_life_minutes: f64,

    /// Concentration in mg per ml, used to convert ml doses to mg
    pub concentration_mg_per_ml: f64,
}

/// Request payload for creating a new medication definition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateMedicationRequest {
    /// Display name, unique among medications
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    /// Elimination half-life in minutes
    #[validate(range(min = 1.0, message = "Half-life must be at least one minute"))]
    pub half_life_minutes: f64,

    /// Concentration in mg per ml
    #[validate(range(min = 0.0001, message = "Concentration must be positive"))]
    pub concentration_mg_per_ml: f64,
}
