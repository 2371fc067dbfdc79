use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Domain model for an injection event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct InjectionEvent {
    /// Unique identifier for the event
    pub id: String,

    /// Name of the injected medication
    pub medication_name: String,

    /// Administered amount in milligrams. Doses entered in ml are
    /// converted at creation time using the medication's concentration.
    pub dosage_mg: f64,

    /// When the dose was administered (RFC 3339)
    pub timestamp: String,

    /// Half-life in minutes, captured from the medication definition at
    /// creation time so historical entries stay stable when a definition
    /// changes. Values <= 0 make the event inert to level computations.
    pub half_life_minutes: f64,

    /// Optional injection site (e.g., "left deltoid")
    pub site: Option<String>,

    /// Optional notes about the injection
    pub notes: Option<String>,

    /// Optional wellness rating (1-5)
    pub rating: Option<u8>,
}

/// Unit a dose amount was entered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DoseUnit {
    /// Milligrams, stored as-is
    Mg,

    /// Milliliters, converted to mg using the medication's concentration
    Ml,
}

/// Request payload for logging a new injection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateInjectionRequest {
    /// Name of the medication, must match a medication definition
    #[validate(length(min = 1, message = "Medication name must not be empty"))]
    pub medication_name: String,

    /// Dose amount in the given unit
    #[validate(range(min = 0.0001, message = "Dose amount must be positive"))]
    pub dose_amount: f64,

    /// Unit the dose was entered in
    pub dose_unit: DoseUnit,

    /// When the dose was administered (RFC 3339). Defaults to the current
    /// time if not provided.
    pub timestamp: Option<String>,

    /// Optional injection site
    pub site: Option<String>,

    /// Optional notes about the injection
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,

    /// Optional wellness rating (1-5)
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
}

/// Request payload for editing an existing injection.
/// Fields left as None keep their stored value. Dose edits are expressed in
/// milligrams directly since the original entry unit is not retained.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UpdateInjectionRequest {
    #[validate(length(min = 1, message = "Medication name must not be empty"))]
    pub medication_name: Option<String>,

    #[validate(range(min = 0.0001, message = "Dose amount must be positive"))]
    pub dosage_mg: Option<f64>,

    pub timestamp: Option<String>,

    pub half_life_minutes: Option<f64>,

    pub site: Option<String>,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
}
