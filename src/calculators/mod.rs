//! Metric Calculators
//!
//! A calculator is a strategy object implementing one named metric's
//! derivation over an event sequence: filter the relevant kinds, classify,
//! aggregate. Calculators never mutate state; given the same events they
//! produce the same value (breach lookups excepted).
//!
//! Events whose payload does not carry the fields a calculator needs are
//! skipped, never fatal. Zero relevant events yield an empty-valued Metric,
//! not an error.

mod access_count;
mod breached_password;
mod credential_count;
mod old_password;
mod reused_password;
mod strong_password;
mod weak_password;

use std::sync::Arc;

pub use access_count::AccessCountCalculator;
pub use breached_password::BreachedPasswordCalculator;
pub use credential_count::CredentialCountCalculator;
pub use old_password::OldPasswordCalculator;
pub use reused_password::ReusedPasswordCalculator;
pub use strong_password::StrongPasswordCalculator;
pub use weak_password::WeakPasswordCalculator;

use crate::breach::BreachLookup;
use crate::config::EngineConfig;
use crate::error::StatsResult;
use crate::types::{Event, Metric, MetricKind};

/// Interface every metric calculator implements
pub trait MetricCalculator: Send + Sync {
    /// Compute the metric over the supplied event sequence
    fn calculate(&self, events: &[Event]) -> StatsResult<Metric>;

    /// Shape of metric this calculator produces
    fn kind(&self) -> MetricKind;

    /// Stable metric name used for registry lookup
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;
}

/// The full default calculator registry
pub fn default_calculators(
    breach: Arc<dyn BreachLookup>,
    config: &EngineConfig,
) -> Vec<Box<dyn MetricCalculator>> {
    vec![
        Box::new(StrongPasswordCalculator),
        Box::new(WeakPasswordCalculator),
        Box::new(ReusedPasswordCalculator),
        Box::new(OldPasswordCalculator::new(config.old_password_max_age_days)),
        Box::new(BreachedPasswordCalculator::new(breach)),
        Box::new(CredentialCountCalculator),
        Box::new(AccessCountCalculator),
    ]
}
