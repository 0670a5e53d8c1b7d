//! Breach exposure inventory

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::breach::BreachLookup;
use crate::error::StatsResult;
use crate::types::{Event, Metric, MetricCategory, MetricKind, MetricValue};

use super::MetricCalculator;

/// Maps each breached password to the credentials using it
///
/// Identical passwords are de-duplicated before lookup, so the range
/// endpoint is queried once per distinct password regardless of how many
/// credentials share it. A failed lookup fails the metric; it is never
/// reported as "not breached".
pub struct BreachedPasswordCalculator {
    lookup: Arc<dyn BreachLookup>,
}

impl BreachedPasswordCalculator {
    /// Calculator backed by the given lookup
    pub fn new(lookup: Arc<dyn BreachLookup>) -> Self {
        Self { lookup }
    }
}

impl MetricCalculator for BreachedPasswordCalculator {
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric> {
        // Collect distinct passwords first; each key is looked up once.
        let mut observed: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for event in events {
            if let Some((credential_id, password, _)) = event.password_entry() {
                observed
                    .entry(password.to_string())
                    .or_default()
                    .push(credential_id.to_string());
            }
        }

        let mut breached: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (password, credential_ids) in observed {
            if self.lookup.is_breached(&password)? {
                breached.insert(password, credential_ids);
            }
        }

        Ok(Metric::new(
            self.name(),
            self.description(),
            MetricValue::Exposure(breached),
            "list",
            vec![MetricCategory::Password, MetricCategory::Security],
        ))
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Count
    }

    fn name(&self) -> &'static str {
        "breached_password"
    }

    fn description(&self) -> &'static str {
        "Passwords present in the breach corpus"
    }
}
