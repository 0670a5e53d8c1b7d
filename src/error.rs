//! Error types shared across the metrics engine
//!
//! Validation errors are rejected before any replay starts. Malformed
//! payloads and unknown topics are recovered at the ingest boundary and
//! never abort a replay. Breach lookup failures are always surfaced to the
//! caller of the affected metric.

/// Result type for all engine operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors that can occur in the metrics engine
#[derive(Debug)]
pub enum StatsError {
    /// Empty or missing user identifier in a query
    InvalidUserId,
    /// Empty or missing group identifier in a query
    InvalidGroupId,
    /// Empty or missing credential identifier in a query
    InvalidCredentialId,
    /// Time range where start is after end
    InvalidTimeRange,
    /// Non-positive age threshold
    InvalidThreshold,
    /// Event payload that failed to decode
    MalformedPayload(String),
    /// Inbound message on a topic the engine does not consume
    UnknownTopic(String),
    /// Breach range endpoint unreachable or returned a failure status
    BreachLookup(String),
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::InvalidUserId => write!(f, "invalid user ID"),
            StatsError::InvalidGroupId => write!(f, "invalid group ID"),
            StatsError::InvalidCredentialId => write!(f, "invalid credential ID"),
            StatsError::InvalidTimeRange => write!(f, "invalid time range: start is after end"),
            StatsError::InvalidThreshold => write!(f, "invalid threshold: must be positive"),
            StatsError::MalformedPayload(msg) => write!(f, "malformed event payload: {}", msg),
            StatsError::UnknownTopic(topic) => write!(f, "unknown topic: {}", topic),
            StatsError::BreachLookup(msg) => write!(f, "breach lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for StatsError {}

impl From<serde_json::Error> for StatsError {
    fn from(e: serde_json::Error) -> Self {
        StatsError::MalformedPayload(e.to_string())
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(e: reqwest::Error) -> Self {
        StatsError::BreachLookup(e.to_string())
    }
}
