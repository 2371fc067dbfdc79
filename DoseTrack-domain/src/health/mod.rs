//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use async_trait::async_trait;

use dose_track_data::database;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database.
    /// Returns true if the database is healthy, false if not.
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Default health service backed by the data layer's connection pool
#[derive(Debug, Clone, Default)]
pub struct DefaultHealthService;

impl DefaultHealthService {
    /// Create a new health service
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HealthServiceTrait for DefaultHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        let (database_status, details) = match self.check_database_status().await {
            Ok(true) => (ComponentStatus::Healthy, None),
            // The repositories fall back to in-memory storage, so a missing
            // database degrades the system rather than taking it down
            Ok(false) => (
                ComponentStatus::Degraded,
                Some("Database unavailable; using in-memory storage".to_string()),
            ),
            Err(e) => (ComponentStatus::Unhealthy, Some(e)),
        };

        components.insert(
            "database".to_string(),
            HealthComponent { status: database_status.clone(), details },
        );

        let status = match database_status {
            ComponentStatus::Healthy => SystemStatus::Healthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Unhealthy => SystemStatus::Degraded,
        };

        SystemHealth { status, components }
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        Ok(database::get_db_pool().is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_health_reports_database_component() {
        let service = DefaultHealthService::new();
        let health = service.get_system_health().await;
        assert!(health.components.contains_key("database"));
    }
}
