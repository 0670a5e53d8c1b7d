//! Metric types
//!
//! A Metric is always freshly computed by a calculator or an engine fold.
//! It is a query result, not a stored entity.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shape of metric a calculator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Count,
    Gauge,
    Histogram,
    Summary,
}

/// Category tag attached to metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    User,
    Password,
    Performance,
    Security,
}

/// Metric-specific value
///
/// `BTreeMap` keys keep serialized output stable, so identical logs produce
/// byte-identical metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Scalar count
    Count(u64),
    /// password -> credential IDs affected
    Exposure(BTreeMap<String, Vec<String>>),
    /// credential ID -> per-ID count
    Breakdown(BTreeMap<String, u64>),
}

impl MetricValue {
    /// Empty exposure map
    pub fn empty_exposure() -> Self {
        MetricValue::Exposure(BTreeMap::new())
    }

    /// True when the value carries no data
    pub fn is_empty(&self) -> bool {
        match self {
            MetricValue::Count(n) => *n == 0,
            MetricValue::Exposure(m) => m.is_empty(),
            MetricValue::Breakdown(m) => m.is_empty(),
        }
    }
}

/// A statistical metric derived from events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Unique metric ID
    pub id: String,
    /// Stable metric name, e.g. `reused_password`
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Metric-specific value
    pub value: MetricValue,
    /// Unit label, e.g. `count` or `list`
    pub unit: String,
    /// When the metric was computed
    pub timestamp: DateTime<Utc>,
    /// Category tags
    pub tags: Vec<MetricCategory>,
}

impl Metric {
    /// Create a metric stamped with a fresh ID and the current time
    pub fn new(
        name: &str,
        description: &str,
        value: MetricValue,
        unit: &str,
        tags: Vec<MetricCategory>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            value,
            unit: unit.to_string(),
            timestamp: Utc::now(),
            tags,
        }
    }
}
