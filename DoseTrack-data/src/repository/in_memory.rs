use std::sync::{Arc, Mutex};
use std::collections::HashMap;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::injection::InjectionEvent;
use crate::models::medication::Medication;
use super::errors::RepositoryError;

/// Chronological sort key for a stored timestamp. RFC 3339 strings with
/// mixed UTC offsets do not sort correctly as text, so histories are
/// ordered on the parsed instant; unparsable timestamps sort first.
pub(super) fn parsed_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// In-memory storage implementation used when the database is unavailable
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Storage for injection events
    events: Arc<Mutex<HashMap<String, InjectionEvent>>>,

    /// Storage for medication definitions
    medications: Arc<Mutex<HashMap<String, Medication>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(HashMap::new())),
            medications: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store an injection event in memory
    pub async fn store_event(&self, event: &InjectionEvent) -> Result<InjectionEvent, RepositoryError> {
        let mut store = self.events.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        store.insert(event.id.clone(), event.clone());
        Ok(event.clone())
    }

    /// Get all injection events from memory
    pub async fn get_all_events(&self) -> Result<Vec<InjectionEvent>, RepositoryError> {
        let store = self.events.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;

        // Oldest first
        let mut events: Vec<InjectionEvent> = store.values().cloned().collect();
        events.sort_by_key(|event| parsed_timestamp(&event.timestamp));

        Ok(events)
    }

    /// Get an injection event by ID from memory
    pub async fn get_event_by_id(&self, id: &Uuid) -> Result<Option<InjectionEvent>, RepositoryError> {
        let store = self.events.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        Ok(store.get(&id.to_string()).cloned())
    }

    /// Delete an injection event from memory. Returns true if it existed.
    pub async fn delete_event(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut store = self.events.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        Ok(store.remove(&id.to_string()).is_some())
    }

    /// Store a medication definition in memory
    pub async fn store_medication(&self, medication: &Medication) -> Result<Medication, RepositoryError> {
        let mut store = self.medications.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        store.insert(medication.id.clone(), medication.clone());
        Ok(medication.clone())
    }

    /// Get all medication definitions from memory
    pub async fn get_all_medications(&self) -> Result<Vec<Medication>, RepositoryError> {
        let store = self.medications.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;

        let mut medications: Vec<Medication> = store.values().cloned().collect();
        medications.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(medications)
    }

    /// Find a medication definition by name (case-insensitive)
    pub async fn find_medication_by_name(&self, name: &str) -> Result<Option<Medication>, RepositoryError> {
        let store = self.medications.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        let needle = name.to_lowercase();
        Ok(store.values().find(|m| m.name.to_lowercase() == needle).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, timestamp: &str) -> InjectionEvent {
        InjectionEvent {
            id: id.to_string(),
            medication_name: "Testosterone Enanthate".to_string(),
            dosage_mg: 200.0,
            timestamp: timestamp.to_string(),
            half_life_minutes: 7200.0,
            site: None,
            notes: None,
            rating: None,
        }
    }

    #[tokio::test]
    async fn test_get_all_events_orders_chronologically_across_utc_offsets() {
        let storage = InMemoryStorage::new();

        // 08:00+02:00 is 06:00 UTC, earlier than 07:00Z even though it
        // sorts later as a string
        storage.store_event(&event("later", "2024-06-20T07:00:00Z")).await.unwrap();
        storage.store_event(&event("earlier", "2024-06-20T08:00:00+02:00")).await.unwrap();

        let events = storage.get_all_events().await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["earlier", "later"]);
    }
}
