//! Vault Metrics - security-metrics engine
//!
//! Derives password-health statistics for a password manager by replaying
//! an append-only log of domain events. Nothing but the log is durable
//! state; every metric is a pure fold over a prefix of it.
//!
//! # Features
//!
//! - **Append-only event log**: thread-safe in-memory store, arrival order
//!   only, queryable by kind and by inclusive time range
//! - **Pluggable calculators**: strength, reuse, staleness, breach
//!   exposure, credential and access counts
//! - **Replay queries**: per-user and per-group metrics, shared-credential
//!   stats, day-bucketed trends
//! - **k-anonymity breach lookups**: only a 5-character hash prefix ever
//!   leaves the process
//! - **Ingest boundary**: typed decode of the credential topics with
//!   skip-and-log recovery
//!
//! # Modules
//!
//! - `types`: events, metrics, and query result shapes
//! - `event_store`: the append-only log
//! - `analyzer`: pure password strength functions
//! - `breach`: breach corpus range lookups
//! - `calculators`: one strategy per named metric
//! - `engine`: the query surface external callers use
//! - `ingest`: inbound message decoding
//! - `health`: component probes for the embedding service
//! - `config`: engine and breach checker settings
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vault_metrics::{BreachConfig, EventStore, HibpClient, MetricsEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(EventStore::new());
//!     let breach = Arc::new(HibpClient::new(&BreachConfig::default())?);
//!     let engine = MetricsEngine::new(Arc::clone(&store), breach);
//!
//!     let metrics = engine.get_user_metrics("user-1")?;
//!     println!("{} credentials", metrics.total_credentials);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod breach;
pub mod calculators;
pub mod config;
pub mod engine;
pub mod error;
pub mod event_store;
pub mod health;
pub mod ingest;
pub mod types;

// Re-export commonly used items at crate root
pub use breach::{BreachLookup, HibpClient};
pub use calculators::MetricCalculator;
pub use config::{BreachConfig, EngineConfig};
pub use engine::MetricsEngine;
pub use error::{StatsError, StatsResult};
pub use event_store::EventStore;
pub use ingest::Ingestor;
pub use types::{
    Event, EventPayload, EventSource, EventType, Metric, MetricCategory, MetricKind, MetricValue,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
