use std::sync::Arc;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument};

// Import domain entities and services
use dose_track_domain::entities::injection::{
    CreateInjectionRequest, InjectionEvent, UpdateInjectionRequest,
};
use dose_track_domain::services::injection::{InjectionServiceError, InjectionServiceTrait};

use crate::entities::common::ErrorResponse;

/// Shared injection service handle injected by the router
pub type InjectionServiceHandle = Arc<dyn InjectionServiceTrait + Send + Sync>;

/// Map service errors onto HTTP responses
fn error_response(err: InjectionServiceError) -> Response {
    match err {
        InjectionServiceError::ValidationError(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::validation_error(&message)),
        )
            .into_response(),
        InjectionServiceError::UnknownMedication(name) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::validation_error(&format!(
                "No medication definition named {}",
                name
            ))),
        )
            .into_response(),
        InjectionServiceError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("injection event")),
        )
            .into_response(),
        InjectionServiceError::RepositoryError(message) => {
            error!("Repository error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response()
        }
    }
}

/// Log a new injection
#[utoipa::path(
    post,
    path = "/injections",
    request_body = CreateInjectionRequest,
    responses(
        (status = 201, description = "Injection logged", body = InjectionEvent),
        (status = 422, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "injections"
)]
#[instrument(skip(service, request))]
pub async fn create_injection(
    Extension(service): Extension<InjectionServiceHandle>,
    Json(request): Json<CreateInjectionRequest>,
) -> Response {
    info!("Creating injection event for {}", request.medication_name);

    match service.create_event(request).await {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Get the full injection history, oldest first
#[utoipa::path(
    get,
    path = "/injections",
    responses(
        (status = 200, description = "Injection history", body = [InjectionEvent])
    ),
    tag = "injections"
)]
#[instrument(skip(service))]
pub async fn get_injections(
    Extension(service): Extension<InjectionServiceHandle>,
) -> Response {
    match service.get_all_events().await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Get a single injection event by ID
#[utoipa::path(
    get,
    path = "/injections/{id}",
    params(("id" = String, Path, description = "Injection event ID")),
    responses(
        (status = 200, description = "Injection event", body = InjectionEvent),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "injections"
)]
#[instrument(skip(service))]
pub async fn get_injection(
    Extension(service): Extension<InjectionServiceHandle>,
    Path(id): Path<String>,
) -> Response {
    match service.get_event_by_id(&id).await {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Edit an existing injection event
#[utoipa::path(
    put,
    path = "/injections/{id}",
    params(("id" = String, Path, description = "Injection event ID")),
    request_body = UpdateInjectionRequest,
    responses(
        (status = 200, description = "Updated injection event", body = InjectionEvent),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "injections"
)]
#[instrument(skip(service, request))]
pub async fn update_injection(
    Extension(service): Extension<InjectionServiceHandle>,
    Path(id): Path<String>,
    Json(request): Json<UpdateInjectionRequest>,
) -> Response {
    info!("Updating injection event {}", id);

    match service.update_event(&id, request).await {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Delete an injection event
#[utoipa::path(
    delete,
    path = "/injections/{id}",
    params(("id" = String, Path, description = "Injection event ID")),
    responses(
        (status = 204, description = "Injection event deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "injections"
)]
#[instrument(skip(service))]
pub async fn delete_injection(
    Extension(service): Extension<InjectionServiceHandle>,
    Path(id): Path<String>,
) -> Response {
    info!("Deleting injection event {}", id);

    match service.delete_event(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
