//! Password access counting

use crate::error::StatsResult;
use crate::types::{Event, EventPayload, Metric, MetricCategory, MetricKind, MetricValue};

use super::MetricCalculator;

/// Counts PasswordAccessed events across the whole log
///
/// Reports the grand total; callers wanting a per-credential breakdown use
/// [`crate::engine::MetricsEngine::get_shared_credential_stats`] instead.
pub struct AccessCountCalculator;

impl MetricCalculator for AccessCountCalculator {
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric> {
        let total = events
            .iter()
            .filter(|e| matches!(e.payload, EventPayload::PasswordAccessed(_)))
            .count() as u64;

        Ok(Metric::new(
            self.name(),
            self.description(),
            MetricValue::Count(total),
            "count",
            vec![MetricCategory::Password],
        ))
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Count
    }

    fn name(&self) -> &'static str {
        "credential_access_count"
    }

    fn description(&self) -> &'static str {
        "Number of times passwords have been accessed"
    }
}
