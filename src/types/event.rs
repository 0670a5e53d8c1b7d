//! Event types for the append-only domain log
//!
//! Events are immutable records of credential and password activity.
//! Every derived metric is computed by replaying them in append order.
//! Payloads are decoded once at the ingest boundary into one typed record
//! per event kind; calculators never re-parse dynamic maps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event kinds that can occur in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A credential was created
    CredentialCreated,
    /// A credential's fields were updated
    CredentialUpdated,
    /// A credential was deleted
    CredentialDeleted,
    /// A credential was opened by a user
    CredentialAccessed,
    /// A credential was shared through a link
    CredentialShared,
    /// A password was set for the first time
    PasswordCreated,
    /// A password was rotated
    PasswordUpdated,
    /// A password was removed
    PasswordDeleted,
    /// A password was revealed or autofilled
    PasswordAccessed,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventType::CredentialCreated => "credential_created",
            EventType::CredentialUpdated => "credential_updated",
            EventType::CredentialDeleted => "credential_deleted",
            EventType::CredentialAccessed => "credential_accessed",
            EventType::CredentialShared => "credential_shared",
            EventType::PasswordCreated => "password_created",
            EventType::PasswordUpdated => "password_updated",
            EventType::PasswordDeleted => "password_deleted",
            EventType::PasswordAccessed => "password_accessed",
        };
        write!(f, "{}", s)
    }
}

/// Origin of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Web application
    WebApp,
    /// Mobile application
    MobileApp,
    /// Direct API client
    ApiClient,
    /// Produced by another service (message bus, migration)
    #[default]
    System,
}

/// Payload for CredentialCreated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialCreatedData {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub credential_id: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for CredentialUpdated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialUpdatedData {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub credential_id: String,
    pub updated_at: DateTime<Utc>,
}

/// Payload for CredentialDeleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDeletedData {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub credential_id: String,
    pub deleted_at: DateTime<Utc>,
}

/// Payload for CredentialAccessed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialAccessedData {
    pub credential_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub is_one_time: bool,
    pub accessed_at: DateTime<Utc>,
}

/// Payload for CredentialShared
///
/// Shared links are how credentials reach viewers, so this record carries
/// the same access attribution fields as [`CredentialAccessedData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSharedData {
    pub credential_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub is_one_time: bool,
    pub shared_at: DateTime<Utc>,
}

/// Payload for PasswordCreated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordCreatedData {
    pub credential_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub password: String,
    pub last_updated: DateTime<Utc>,
}

/// Payload for PasswordUpdated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordUpdatedData {
    pub credential_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub password: String,
    pub last_updated: DateTime<Utc>,
}

/// Payload for PasswordDeleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordDeletedData {
    pub credential_id: String,
    pub user_id: String,
    pub deleted_at: DateTime<Utc>,
}

/// Payload for PasswordAccessed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordAccessedData {
    pub credential_id: String,
    pub user_id: String,
    pub accessed_at: DateTime<Utc>,
}

/// Typed payload, one variant per event kind
///
/// Internally tagged so the wire form stays self-describing even where the
/// surrounding event is absent (metric persistence, test fixtures).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    CredentialCreated(CredentialCreatedData),
    CredentialUpdated(CredentialUpdatedData),
    CredentialDeleted(CredentialDeletedData),
    CredentialAccessed(CredentialAccessedData),
    CredentialShared(CredentialSharedData),
    PasswordCreated(PasswordCreatedData),
    PasswordUpdated(PasswordUpdatedData),
    PasswordDeleted(PasswordDeletedData),
    PasswordAccessed(PasswordAccessedData),
}

impl EventPayload {
    /// The event kind this payload belongs to
    pub fn event_type(&self) -> EventType {
        match self {
            EventPayload::CredentialCreated(_) => EventType::CredentialCreated,
            EventPayload::CredentialUpdated(_) => EventType::CredentialUpdated,
            EventPayload::CredentialDeleted(_) => EventType::CredentialDeleted,
            EventPayload::CredentialAccessed(_) => EventType::CredentialAccessed,
            EventPayload::CredentialShared(_) => EventType::CredentialShared,
            EventPayload::PasswordCreated(_) => EventType::PasswordCreated,
            EventPayload::PasswordUpdated(_) => EventType::PasswordUpdated,
            EventPayload::PasswordDeleted(_) => EventType::PasswordDeleted,
            EventPayload::PasswordAccessed(_) => EventType::PasswordAccessed,
        }
    }
}

/// An immutable event in the log
///
/// Events are the source of truth. Metrics are derived by replaying them in
/// append order; nothing else is durable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: String,

    /// Kind of event
    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Ingestion time, not necessarily the payload's own timestamp
    pub timestamp: DateTime<Utc>,

    /// Where the event came from
    #[serde(default)]
    pub source: EventSource,

    /// Kind-specific payload
    pub payload: EventPayload,
}

impl Event {
    /// Create a new event stamped with the current time
    pub fn new(source: EventSource, payload: EventPayload) -> Self {
        Self::with_timestamp(source, payload, Utc::now())
    }

    /// Create a new event with an explicit timestamp
    pub fn with_timestamp(
        source: EventSource,
        payload: EventPayload,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type: payload.event_type(),
            timestamp,
            source,
            payload,
        }
    }

    /// The `(credential_id, password, last_updated)` triple carried by
    /// PasswordCreated/PasswordUpdated payloads; `None` for everything else.
    pub fn password_entry(&self) -> Option<(&str, &str, DateTime<Utc>)> {
        match &self.payload {
            EventPayload::PasswordCreated(d) => {
                Some((d.credential_id.as_str(), d.password.as_str(), d.last_updated))
            }
            EventPayload::PasswordUpdated(d) => {
                Some((d.credential_id.as_str(), d.password.as_str(), d.last_updated))
            }
            _ => None,
        }
    }

    /// Access attribution for CredentialAccessed/CredentialShared payloads.
    ///
    /// Returns `(credential_id, user_id, is_one_time, occurred_at)`.
    pub fn access_record(&self) -> Option<(&str, &str, bool, DateTime<Utc>)> {
        match &self.payload {
            EventPayload::CredentialAccessed(d) => Some((
                d.credential_id.as_str(),
                d.user_id.as_str(),
                d.is_one_time,
                d.accessed_at,
            )),
            EventPayload::CredentialShared(d) => Some((
                d.credential_id.as_str(),
                d.user_id.as_str(),
                d.is_one_time,
                d.shared_at,
            )),
            _ => None,
        }
    }
}
