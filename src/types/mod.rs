//! Data types for the metrics engine
//!
//! This module contains the core data structures: domain events, derived
//! metrics, and the result shapes engine queries return.

mod event;
mod metric;
mod report;

pub use event::{
    CredentialAccessedData, CredentialCreatedData, CredentialDeletedData, CredentialSharedData,
    CredentialUpdatedData, Event, EventPayload, EventSource, EventType, PasswordAccessedData,
    PasswordCreatedData, PasswordDeletedData, PasswordUpdatedData,
};
pub use metric::{Metric, MetricCategory, MetricKind, MetricValue};
pub use report::{
    BreachedCredential, CredentialAccess, CredentialTrend, GroupMetrics, OldPassword,
    PasswordStrength, ReusedPassword, SharedCredentialStats, TrendDataPoint, UserMetrics,
};
