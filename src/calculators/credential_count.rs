//! Live credential count

use std::collections::HashSet;

use crate::error::StatsResult;
use crate::types::{Event, EventPayload, Metric, MetricCategory, MetricKind, MetricValue};

use super::MetricCalculator;

/// Folds create/delete events into a live credential set and reports its
/// cardinality at the end of the fold
///
/// Both credential-level and password-level lifecycle events feed the set;
/// membership is by credential ID, so the two families never double count.
pub struct CredentialCountCalculator;

impl MetricCalculator for CredentialCountCalculator {
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric> {
        let mut live: HashSet<&str> = HashSet::new();

        for event in events {
            match &event.payload {
                EventPayload::CredentialCreated(d) => {
                    live.insert(d.credential_id.as_str());
                }
                EventPayload::CredentialDeleted(d) => {
                    live.remove(d.credential_id.as_str());
                }
                EventPayload::PasswordCreated(d) => {
                    live.insert(d.credential_id.as_str());
                }
                EventPayload::PasswordDeleted(d) => {
                    live.remove(d.credential_id.as_str());
                }
                EventPayload::CredentialUpdated(_)
                | EventPayload::CredentialAccessed(_)
                | EventPayload::CredentialShared(_)
                | EventPayload::PasswordUpdated(_)
                | EventPayload::PasswordAccessed(_) => {}
            }
        }

        Ok(Metric::new(
            self.name(),
            self.description(),
            MetricValue::Count(live.len() as u64),
            "count",
            vec![MetricCategory::Password],
        ))
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Count
    }

    fn name(&self) -> &'static str {
        "credential_count"
    }

    fn description(&self) -> &'static str {
        "Number of live credentials"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CredentialCreatedData, CredentialDeletedData, EventSource};
    use chrono::Utc;

    fn created(credential_id: &str) -> Event {
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

    fn deleted(credential_id: &str) -> Event {
        Event::new(
            EventSource::System,
            EventPayload::CredentialDeleted(CredentialDeletedData {
                user_id: "u1".to_string(),
                group_id: None,
                credential_id: credential_id.to_string(),
                deleted_at: Utc::now(),
            }),
        )
    }

    #[test]
    fn test_delete_removes_from_count() {
        let events = vec![created("c1"), created("c2"), deleted("c1")];
        let metric = CredentialCountCalculator.calculate(&events).unwrap();
        assert_eq!(metric.value, MetricValue::Count(1));
    }

    #[test]
    fn test_duplicate_creates_count_once() {
        let events = vec![created("c1"), created("c1")];
        let metric = CredentialCountCalculator.calculate(&events).unwrap();
        assert_eq!(metric.value, MetricValue::Count(1));
    }

    #[test]
    fn test_delete_before_create_is_harmless() {
        let events = vec![deleted("c1"), created("c1")];
        let metric = CredentialCountCalculator.calculate(&events).unwrap();
        assert_eq!(metric.value, MetricValue::Count(1));
    }
}
