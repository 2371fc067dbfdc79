use thiserror::Error;
use chrono::{DateTime, Utc};
use async_trait::async_trait;
use tracing::debug;

use crate::entities::conversions;
use crate::services::aggregation::{self, MedicationClass, ReportingWindow, SeriesSet};
use crate::services::statistics::{self, LevelStatistics};
use dose_track_data::repository::{InjectionRepositoryTrait, RepositoryError};

/// Dashboard service errors
#[derive(Debug, Error)]
pub enum DashboardServiceError {
    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Windowed series plus summary statistics for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// The reporting window the summary covers
    pub window: ReportingWindow,

    /// Per-medication and aggregate series truncated to the window
    pub series: SeriesSet,

    /// Statistics over the authoritative class series
    pub statistics: LevelStatistics,
}

/// Trait for dashboard computations
#[async_trait]
pub trait DashboardServiceTrait {
    /// Recompute the dashboard from the full current history.
    ///
    /// `as_of` anchors the sample grid; passing it explicitly keeps the
    /// computation a deterministic function of (history, window, class,
    /// as_of). Handlers pass `Utc::now()`.
    async fn compute_dashboard(
        &self,
        window: ReportingWindow,
        as_of: DateTime<Utc>,
    ) -> Result<DashboardSummary, DashboardServiceError>;
}

/// Dashboard service composing the repository with the aggregation engine
pub struct DashboardService<R: InjectionRepositoryTrait> {
    repository: R,
    class: MedicationClass,
}

impl<R: InjectionRepositoryTrait> DashboardService<R> {
    /// Create a new dashboard service with the given medication class
    pub fn new(repository: R, class: MedicationClass) -> Self {
        Self { repository, class }
    }
}

#[async_trait]
impl<R: InjectionRepositoryTrait + Send + Sync> DashboardServiceTrait for DashboardService<R> {
    async fn compute_dashboard(
        &self,
        window: ReportingWindow,
        as_of: DateTime<Utc>,
    ) -> Result<DashboardSummary, DashboardServiceError> {
        // Always the full history: doses before the window boundary still
        // contribute residual level inside the window
        let history: Vec<_> = self
            .repository
            .get_all()
            .await
            .map_err(|e: RepositoryError| DashboardServiceError::RepositoryError(e.to_string()))?
            .into_iter()
            .map(conversions::convert_to_domain_event)
            .collect();

        debug!("Computing dashboard over {} events, window {:?}", history.len(), window);

        let full = aggregation::compute_series(&history, &self.class, as_of);
        let series = full.windowed(window);

        let statistics = series
            .statistics_source()
            .map(|source| statistics::summarize(source, window))
            .unwrap_or_else(LevelStatistics::zero);

        Ok(DashboardSummary { window, series, statistics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dose_track_data::models::injection::InjectionEvent as DataInjectionEvent;
    use dose_track_data::repository::injection_tests::MockInjectionRepository;
    use dose_track_data::repository::medication_tests::MockMedicationRepository;

    use crate::entities::injection::{CreateInjectionRequest, DoseUnit};
    use crate::services::injection::{InjectionService, InjectionServiceTrait};

    fn data_event(name: &str, dosage_mg: f64, half_life_minutes: f64, timestamp: &str) -> DataInjectionEvent {
        DataInjectionEvent {
            id: uuid::Uuid::new_v4().to_string(),
            medication_name: name.to_string(),
            dosage_mg,
            timestamp: timestamp.to_string(),
            half_life_minutes,
            site: None,
            notes: None,
            rating: None,
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_empty_history_yields_empty_dashboard() {
        let service = DashboardService::new(
            MockInjectionRepository::new(),
            MedicationClass::testosterone(),
        );

        let summary = service
            .compute_dashboard(ReportingWindow::Week, as_of())
            .await
            .unwrap();

        assert!(summary.series.is_empty());
        assert_eq!(summary.statistics, LevelStatistics::zero());
    }

    #[tokio::test]
    async fn test_statistics_come_from_aggregate_when_two_class_members() {
        let repository = MockInjectionRepository::with_events(vec![
            data_event("Testosterone Enanthate", 100.0, 4.0 * 1440.0, "2024-06-26T12:00:00Z"),
            data_event("Testosterone Cypionate", 150.0, 8.0 * 1440.0, "2024-06-26T12:00:00Z"),
        ]);
        let service = DashboardService::new(repository, MedicationClass::testosterone());

        let summary = service
            .compute_dashboard(ReportingWindow::Week, as_of())
            .await
            .unwrap();

        let aggregate = summary.series.aggregate.as_ref().unwrap();
        assert_eq!(aggregate.label, "Total T");

        // Max is sampled on the dose day; both doses land at the sample instant
        assert!((summary.statistics.max - 250.0).abs() < 1e-6);
        assert!(summary.statistics.average > 0.0);
    }

    #[tokio::test]
    async fn test_statistics_come_from_single_member_series() {
        let repository = MockInjectionRepository::with_events(vec![data_event(
            "Testosterone Enanthate",
            200.0,
            5.0 * 1440.0,
            "2024-06-30T12:00:00Z",
        )]);
        let service = DashboardService::new(repository, MedicationClass::testosterone());

        let summary = service
            .compute_dashboard(ReportingWindow::Week, as_of())
            .await
            .unwrap();

        assert!(summary.series.aggregate.is_none());
        assert!((summary.statistics.max - 200.0).abs() < 1e-6);
        // One non-zero sample over a seven day window
        assert!((summary.statistics.average - 200.0 / 7.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_dashboard_sees_events_logged_through_shared_repository() {
        // The injection and dashboard services must share one repository;
        // independently constructed repositories would each hold their own
        // in-memory store and the dashboard would read an empty history
        let repository = MockInjectionRepository::new();

        let medication = dose_track_data::models::medication::Medication {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Testosterone Enanthate".to_string(),
            half_life_minutes: 5.0 * 1440.0,
            concentration_mg_per_ml: 250.0,
        };
        let injections = InjectionService::new(
            repository.clone(),
            MockMedicationRepository::with_medications(vec![medication]),
        );
        let dashboard = DashboardService::new(repository, MedicationClass::testosterone());

        injections
            .create_event(CreateInjectionRequest {
                medication_name: "Testosterone Enanthate".to_string(),
                dose_amount: 200.0,
                dose_unit: DoseUnit::Mg,
                timestamp: Some("2024-06-28T08:00:00Z".to_string()),
                site: None,
                notes: None,
                rating: None,
            })
            .await
            .unwrap();

        let summary = dashboard
            .compute_dashboard(ReportingWindow::Week, as_of())
            .await
            .unwrap();

        assert!(!summary.series.is_empty());
        assert!(summary.statistics.max > 0.0);
    }
}
