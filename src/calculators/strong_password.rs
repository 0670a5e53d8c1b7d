//! Strong password inventory

use std::collections::BTreeMap;

use crate::analyzer;
use crate::error::StatsResult;
use crate::types::{Event, Metric, MetricCategory, MetricKind, MetricValue};

use super::MetricCalculator;

/// Maps each strong password to the credentials using it
pub struct StrongPasswordCalculator;

impl MetricCalculator for StrongPasswordCalculator {
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric> {
        let mut strong: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for event in events {
            if let Some((credential_id, password, _)) = event.password_entry() {
                if analyzer::is_strong(password) {
                    strong
                        .entry(password.to_string())
                        .or_default()
                        .push(credential_id.to_string());
                }
            }
        }

        Ok(Metric::new(
            self.name(),
            self.description(),
            MetricValue::Exposure(strong),
            "list",
            vec![MetricCategory::Password],
        ))
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Count
    }

    fn name(&self) -> &'static str {
        "strong_password"
    }

    fn description(&self) -> &'static str {
        "Passwords meeting all strength requirements"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventPayload, EventSource, PasswordCreatedData};
    use chrono::Utc;

    fn password_event(credential_id: &str, password: &str) -> Event {
        Event::new(
            EventSource::System,
            EventPayload::PasswordCreated(PasswordCreatedData {
                credential_id: credential_id.to_string(),
                user_id: "u1".to_string(),
                group_id: None,
                password: password.to_string(),
                last_updated: Utc::now(),
            }),
        )
    }

    #[test]
    fn test_partitions_by_strength() {
        let events = vec![
            password_event("c1", "Secret123!"),
            password_event("c2", "weakling"),
            password_event("c3", "Secret123!"),
        ];

        let metric = StrongPasswordCalculator.calculate(&events).unwrap();
        match metric.value {
            MetricValue::Exposure(map) => {
                assert_eq!(map.len(), 1);
                assert_eq!(map["Secret123!"], vec!["c1", "c3"]);
            }
            other => panic!("unexpected value: {:?}", other),
        }
    }

    #[test]
    fn test_irrelevant_events_skipped() {
        use crate::types::PasswordAccessedData;

        let events = vec![Event::new(
            EventSource::System,
            EventPayload::PasswordAccessed(PasswordAccessedData {
                credential_id: "c1".to_string(),
                user_id: "u1".to_string(),
                accessed_at: Utc::now(),
            }),
        )];

        let metric = StrongPasswordCalculator.calculate(&events).unwrap();
        assert!(metric.value.is_empty());
    }
}
