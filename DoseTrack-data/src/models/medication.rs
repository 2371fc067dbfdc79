use serde::{Deserialize, Serialize};

/// Data model for a medication definition
#[derive(Debug, Clone, Serialize, Deserialize)]
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
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicationRequest {
    pub name: String,
    pub half_life_minutes: f64,
    pub concentration_mg_per_ml: f64,
}
