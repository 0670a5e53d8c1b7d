//! Reused password detection

use std::collections::BTreeMap;

use crate::error::StatsResult;
use crate::types::{Event, Metric, MetricCategory, MetricKind, MetricValue};

use super::MetricCalculator;

/// Maps each password used by two or more distinct credentials to those
/// credential IDs
///
/// Repeated rotations of a single credential do not count as reuse; group
/// membership is by distinct credential ID.
pub struct ReusedPasswordCalculator;

impl MetricCalculator for ReusedPasswordCalculator {
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric> {
        let mut occurrences: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for event in events {
            if let Some((credential_id, password, _)) = event.password_entry() {
                let ids = occurrences.entry(password.to_string()).or_default();
                if !ids.iter().any(|id| id == credential_id) {
                    ids.push(credential_id.to_string());
                }
            }
        }

        occurrences.retain(|_, ids| ids.len() >= 2);

        Ok(Metric::new(
            self.name(),
            self.description(),
            MetricValue::Exposure(occurrences),
            "list",
            vec![MetricCategory::Password],
        ))
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Count
    }

    fn name(&self) -> &'static str {
        "reused_password"
    }

    fn description(&self) -> &'static str {
        "Passwords shared by more than one credential"
    }
}
