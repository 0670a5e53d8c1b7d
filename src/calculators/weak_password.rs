//! Weak password inventory

use std::collections::BTreeMap;

use crate::analyzer;
use crate::error::StatsResult;
use crate::types::{Event, Metric, MetricCategory, MetricKind, MetricValue};

use super::MetricCalculator;

/// Maps each weak password to the credentials using it
///
/// A password failing any single strength requirement is weak.
pub struct WeakPasswordCalculator;

impl MetricCalculator for WeakPasswordCalculator {
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric> {
        let mut weak: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for event in events {
            if let Some((credential_id, password, _)) = event.password_entry() {
                if !analyzer::is_strong(password) {
                    weak.entry(password.to_string())
                        .or_default()
                        .push(credential_id.to_string());
                }
            }
        }

        Ok(Metric::new(
            self.name(),
            self.description(),
            MetricValue::Exposure(weak),
            "list",
            vec![MetricCategory::Password],
        ))
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Count
    }

    fn name(&self) -> &'static str {
        "weak_password"
    }

    fn description(&self) -> &'static str {
        "Passwords failing at least one strength requirement"
    }
}
