//! Stale password detection

use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use crate::config::DEFAULT_OLD_PASSWORD_MAX_AGE_DAYS;
use crate::error::StatsResult;
use crate::types::{Event, Metric, MetricCategory, MetricKind, MetricValue};

use super::MetricCalculator;

/// Maps each password whose `last_updated` precedes the staleness cutoff to
/// the credentials using it
pub struct OldPasswordCalculator {
    max_age_days: i64,
}

impl OldPasswordCalculator {
    /// Calculator with an explicit staleness threshold in days
    pub fn new(max_age_days: i64) -> Self {
        Self { max_age_days }
    }
}

impl Default for OldPasswordCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_OLD_PASSWORD_MAX_AGE_DAYS)
    }
}

impl MetricCalculator for OldPasswordCalculator {
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric> {
        let cutoff = Utc::now() - Duration::days(self.max_age_days);
        let mut old: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for event in events {
            if let Some((credential_id, password, last_updated)) = event.password_entry() {
                if last_updated < cutoff {
                    old.entry(password.to_string())
                        .or_default()
                        .push(credential_id.to_string());
                }
            }
        }

        Ok(Metric::new(
            self.name(),
            self.description(),
            MetricValue::Exposure(old),
            "list",
            vec![MetricCategory::Password],
        ))
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Count
    }

    fn name(&self) -> &'static str {
        "old_password"
    }

    fn description(&self) -> &'static str {
        "Passwords unchanged beyond the staleness threshold"
    }
}
