use std::sync::Arc;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument};

use dose_track_domain::entities::medication::{CreateMedicationRequest, Medication};
use dose_track_domain::services::medication::{MedicationServiceError, MedicationServiceTrait};

use crate::entities::common::ErrorResponse;

/// Shared medication service handle injected by the router
pub type MedicationServiceHandle = Arc<dyn MedicationServiceTrait + Send + Sync>;

/// Map service errors onto HTTP responses
fn error_response(err: MedicationServiceError) -> Response {
    match err {
        MedicationServiceError::ValidationError(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::validation_error(&message)),
        )
            .into_response(),
        MedicationServiceError::AlreadyExists(name) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::bad_request(&format!(
                "A medication named {} already exists",
                name
            ))),
        )
            .into_response(),
        MedicationServiceError::RepositoryError(message) => {
            error!("Repository error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response()
        }
    }
}

/// List all medication definitions
#[utoipa::path(
    get,
    path = "/medications",
    responses(
        (status = 200, description = "Medication definitions", body = [Medication])
    ),
    tag = "medications"
)]
#[instrument(skip(service))]
pub async fn get_medications(
    Extension(service): Extension<MedicationServiceHandle>,
) -> Response {
    match service.list_medications().await {
        Ok(medications) => (StatusCode::OK, Json(medications)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Create a new medication definition
#[utoipa::path(
    post,
    path = "/medications",
    request_body = CreateMedicationRequest,
    responses(
        (status = 201, description = "Medication created", body = Medication),
        (status = 409, description = "Name already in use", body = ErrorResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "medications"
)]
#[instrument(skip(service, request))]
pub async fn create_medication(
    Extension(service): Extension<MedicationServiceHandle>,
    Json(request): Json<CreateMedicationRequest>,
) -> Response {
    info!("Creating medication {}", request.name);

    match service.create_medication(request).await {
        Ok(medication) => (StatusCode::CREATED, Json(medication)).into_response(),
        Err(err) => error_response(err),
    }
}
