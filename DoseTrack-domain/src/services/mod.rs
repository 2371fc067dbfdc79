// Services module structure

// Pharmacokinetic engine
pub mod decay;
pub mod aggregation;
pub mod statistics;

// CRUD and dashboard services
pub mod injection;
pub mod medication;
pub mod dashboard;

// Re-export commonly used types
pub use aggregation::{compute_series, MedicationClass, ReportingWindow, SeriesSet, TimeSeries};
pub use statistics::{summarize, LevelStatistics};
pub use injection::{InjectionService, InjectionServiceTrait};
pub use medication::{MedicationService, MedicationServiceTrait};
pub use dashboard::{DashboardService, DashboardServiceTrait};
