use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use dose_track_data::repository::{InjectionRepository, MedicationRepository};
use dose_track_domain::health::DefaultHealthService;
use dose_track_domain::services::{
    DashboardService, InjectionService, MedicationClass, MedicationService,
};

use crate::api::handlers::{dashboard, health, injections, medications};
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app() -> Router {
    debug!("Creating application router");

    // Repositories are shared across services so the in-memory fallback
    // sees one consistent store when the database is unavailable
    let injection_repository = InjectionRepository::new();
    let medication_repository = MedicationRepository::new();

    let injection_service: injections::InjectionServiceHandle = Arc::new(InjectionService::new(
        injection_repository.clone(),
        medication_repository.clone(),
    ));
    let medication_service: medications::MedicationServiceHandle =
        Arc::new(MedicationService::new(medication_repository));
    let dashboard_service: dashboard::DashboardServiceHandle = Arc::new(DashboardService::new(
        injection_repository,
        MedicationClass::testosterone(),
    ));
    let health_service: health::HealthServiceHandle = Arc::new(DefaultHealthService::new());

    debug!("API routes configured");

    Router::new()
        .route("/health", get(health::health_check))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route(
            "/injections",
            get(injections::get_injections).post(injections::create_injection),
        )
        .route(
            "/injections/:id",
            get(injections::get_injection)
                .put(injections::update_injection)
                .delete(injections::delete_injection),
        )
        .route(
            "/medications",
            get(medications::get_medications).post(medications::create_medication),
        )
        .merge(configure_swagger_routes())
        .layer(Extension(injection_service))
        .layer(Extension(medication_service))
        .layer(Extension(dashboard_service))
        .layer(Extension(health_service))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
