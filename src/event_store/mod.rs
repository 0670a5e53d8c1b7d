//! Event Store - append-only in-memory event log
//!
//! The EventStore holds the single source of truth the engine replays.
//! Appends take the exclusive lock; every query takes the shared lock and
//! scans the full log in O(n). There is no indexing or memoization, and no
//! ordering guarantee beyond arrival order.
//!
//! The store is an explicitly constructed instance handed to the engine by
//! `Arc` handle; there is no ambient global log.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::{StatsError, StatsResult};
use crate::types::{Event, EventType};

/// Append-only, thread-safe log of domain events
#[derive(Debug, Default)]
pub struct EventStore {
    events: RwLock<Vec<Event>>,
}

impl EventStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the log
    ///
    /// Accepts any well-formed event; business rules never reject an append.
    pub fn append(&self, event: Event) {
        self.events.write().push(event);
    }

    /// Append a batch of events in order
    pub fn append_all(&self, events: impl IntoIterator<Item = Event>) {
        let mut log = self.events.write();
        log.extend(events);
    }

    /// All events of one kind, in insertion order
    pub fn query_by_type(&self, event_type: EventType) -> Vec<Event> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Events whose timestamp falls within `[start, end]` inclusive, in
    /// insertion order
    pub fn query_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<Vec<Event>> {
        if start > end {
            return Err(StatsError::InvalidTimeRange);
        }

        Ok(self
            .events
            .read()
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect())
    }

    /// Run a fold over the log under the shared lock
    ///
    /// The engine's replay queries go through here so they see one
    /// consistent view without copying the log. The closure must not block
    /// on I/O; use [`EventStore::snapshot`] for work that does.
    pub fn with_events<R>(&self, f: impl FnOnce(&[Event]) -> R) -> R {
        f(&self.events.read())
    }

    /// Copy of the full log, for work that must not hold the lock
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Number of events in the log
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True when the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clear all state
    ///
    /// Used only at process boundaries, never mid-query.
    pub fn reset(&self) {
        self.events.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CredentialCreatedData, EventPayload, EventSource, PasswordAccessedData};
    use chrono::Duration;

    fn created_event(credential_id: &str) -> Event {
        Event::new(
            EventSource::System,
            EventPayload::CredentialCreated(CredentialCreatedData {
                user_id: "u1".to_string(),
                group_id: None,
                credential_id: credential_id.to_string(),
                created_at: Utc::now(),
            }),
        )
    }

    fn accessed_event(credential_id: &str) -> Event {
        Event::new(
            EventSource::System,
            EventPayload::PasswordAccessed(PasswordAccessedData {
                credential_id: credential_id.to_string(),
                user_id: "u1".to_string(),
                accessed_at: Utc::now(),
            }),
        )
    }

    #[test]
    fn test_append_preserves_order() {
        let store = EventStore::new();
        store.append(created_event("c1"));
        store.append(accessed_event("c1"));
        store.append(created_event("c2"));

        assert_eq!(store.len(), 3);

        let created = store.query_by_type(EventType::CredentialCreated);
        assert_eq!(created.len(), 2);
        assert!(matches!(
            &created[0].payload,
            EventPayload::CredentialCreated(d) if d.credential_id == "c1"
        ));
        assert!(matches!(
            &created[1].payload,
            EventPayload::CredentialCreated(d) if d.credential_id == "c2"
        ));
    }

    #[test]
    fn test_query_by_type_empty_when_no_match() {
        let store = EventStore::new();
        store.append(created_event("c1"));
        assert!(store.query_by_type(EventType::CredentialDeleted).is_empty());
    }

    #[test]
    fn test_time_range_is_inclusive() {
        let store = EventStore::new();
        let t0 = Utc::now();
        let event = Event::with_timestamp(
            EventSource::System,
            EventPayload::CredentialCreated(CredentialCreatedData {
                user_id: "u1".to_string(),
                group_id: None,
                credential_id: "c1".to_string(),
                created_at: t0,
            }),
            t0,
        );
        store.append(event);

        // Exact boundary on both ends
        let hits = store.query_by_time_range(t0, t0).unwrap();
        assert_eq!(hits.len(), 1);

        // Outside the range
        let misses = store
            .query_by_time_range(t0 + Duration::seconds(1), t0 + Duration::seconds(2))
            .unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let store = EventStore::new();
        let now = Utc::now();
        let result = store.query_by_time_range(now, now - Duration::seconds(1));
        assert!(matches!(result, Err(StatsError::InvalidTimeRange)));
    }

    #[test]
    fn test_reset_clears_log() {
        let store = EventStore::new();
        store.append(created_event("c1"));
        assert!(!store.is_empty());

        store.reset();
        assert!(store.is_empty());
        assert!(store.query_by_type(EventType::CredentialCreated).is_empty());
    }

    #[test]
    fn test_concurrent_appends() {
        use std::sync::Arc;

        let store = Arc::new(EventStore::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    store.append(created_event(&format!("c{}", i)));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 200);
    }
}
