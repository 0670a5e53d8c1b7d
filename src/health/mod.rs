//! Health checks
//!
//! The embedding service exposes a health endpoint that probes its
//! collaborators (index store, message bus) plus the event store. Checks
//! run concurrently, one thread each, and the report is assembled once
//! every check has reported.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::event_store::EventStore;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Failure,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Ok => write!(f, "ok"),
            HealthStatus::Failure => write!(f, "failure"),
        }
    }
}

/// component name -> status
pub type HealthReport = BTreeMap<String, HealthStatus>;

/// A probe for one component
pub trait HealthCheck: Send + Sync {
    /// Component name used as the report key
    fn name(&self) -> &str;

    /// True when the component is reachable and serving
    fn check(&self) -> bool;
}

/// Probe for the in-process event store
pub struct EventStoreCheck {
    store: Arc<EventStore>,
}

impl EventStoreCheck {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }
}

impl HealthCheck for EventStoreCheck {
    fn name(&self) -> &str {
        "event_store"
    }

    fn check(&self) -> bool {
        // A readable log is a serving log
        let _ = self.store.len();
        true
    }
}

/// Run every check concurrently and fan the results into one report
///
/// Cancellation is just "wait for all to report".
pub fn run_checks(checks: &[&dyn HealthCheck]) -> HealthReport {
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for check in checks {
            let tx = tx.clone();
            scope.spawn(move || {
                let status = if check.check() {
                    HealthStatus::Ok
                } else {
                    HealthStatus::Failure
                };
                let _ = tx.send((check.name().to_string(), status));
            });
        }
        drop(tx);

        rx.iter().collect()
    })
}

/// True when every component reported Ok
pub fn is_healthy(report: &HealthReport) -> bool {
    report.values().all(|status| *status == HealthStatus::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticCheck {
        name: &'static str,
        healthy: bool,
    }

    impl HealthCheck for StaticCheck {
        fn name(&self) -> &str {
            self.name
        }

        fn check(&self) -> bool {
            self.healthy
        }
    }

    #[test]
    fn test_all_checks_reported() {
        let bus = StaticCheck {
            name: "message_bus",
            healthy: true,
        };
        let index = StaticCheck {
            name: "index_store",
            healthy: false,
        };

        let report = run_checks(&[&bus, &index]);
        assert_eq!(report.len(), 2);
        assert_eq!(report["message_bus"], HealthStatus::Ok);
        assert_eq!(report["index_store"], HealthStatus::Failure);
        assert!(!is_healthy(&report));
    }

    #[test]
    fn test_event_store_check_is_ok() {
        let store = Arc::new(EventStore::new());
        let check = EventStoreCheck::new(store);
        let report = run_checks(&[&check]);
        assert!(is_healthy(&report));
    }

    #[test]
    fn test_empty_report_is_healthy() {
        let report = run_checks(&[]);
        assert!(report.is_empty());
        assert!(is_healthy(&report));
    }
}
