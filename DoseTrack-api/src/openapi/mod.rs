use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Injection endpoints
        crate::api::handlers::injections::create_injection,
        crate::api::handlers::injections::get_injections,
        crate::api::handlers::injections::get_injection,
        crate::api::handlers::injections::update_injection,
        crate::api::handlers::injections::delete_injection,

        // Medication endpoints
        crate::api::handlers::medications::get_medications,
        crate::api::handlers::medications::create_medication,

        // Dashboard endpoint
        crate::api::handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            // Domain entities
            dose_track_domain::entities::injection::InjectionEvent,
            dose_track_domain::entities::injection::CreateInjectionRequest,
            dose_track_domain::entities::injection::UpdateInjectionRequest,
            dose_track_domain::entities::injection::DoseUnit,
            dose_track_domain::entities::medication::Medication,
            dose_track_domain::entities::medication::CreateMedicationRequest,
            dose_track_domain::services::aggregation::ReportingWindow,
            dose_track_domain::services::statistics::LevelStatistics,

            // Common entities
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentHealthStatus,

            // Dashboard handlers
            crate::api::handlers::dashboard::DashboardQueryParams,
            crate::api::handlers::dashboard::DashboardResponse,
            crate::api::handlers::dashboard::SeriesResponse,
            crate::api::handlers::dashboard::SamplePoint,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "injections", description = "Injection logging endpoints"),
        (name = "medications", description = "Medication definition endpoints"),
        (name = "dashboard", description = "Active level series and statistics")
    ),
    info(
        title = "DoseTrack API",
        version = "0.1.0",
        description = "API for tracking medication injections and estimating active levels",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
