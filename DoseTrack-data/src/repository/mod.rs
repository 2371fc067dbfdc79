// Repository module structure
pub mod errors;
mod injection;
mod medication;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use injection::{InjectionRepository, InjectionRepositoryTrait};
pub use medication::{MedicationRepository, MedicationRepositoryTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use injection::tests as injection_tests;
#[cfg(any(test, feature = "mock"))]
pub use medication::tests as medication_tests;
