//! Ingest boundary - inbound message decoding
//!
//! The message bus delivers one JSON shape per credential topic. Each
//! message is decoded once into typed events, stamped with the ingestion
//! time. A message carrying a password also emits the matching password
//! event, so password analyses never re-parse credential payloads.
//!
//! Malformed payloads and unknown topics are logged and skipped; a bad
//! message never aborts ingestion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::error::{StatsError, StatsResult};
use crate::event_store::EventStore;
use crate::types::{
    CredentialCreatedData, CredentialDeletedData, CredentialSharedData, CredentialUpdatedData,
    Event, EventPayload, EventSource, EventType, PasswordCreatedData, PasswordUpdatedData,
};

/// Topic names the engine consumes
pub mod topics {
    pub const CREDENTIAL_CREATION: &str = "credential_creation";
    pub const CREDENTIAL_UPDATE: &str = "credential_update";
    pub const CREDENTIAL_DELETION: &str = "credential_deletion";
    pub const CREDENTIAL_SHARED: &str = "credential_shared";
}

/// Event kind an inbound topic maps to
pub fn event_type_for_topic(topic: &str) -> StatsResult<EventType> {
    match topic {
        topics::CREDENTIAL_CREATION => Ok(EventType::CredentialCreated),
        topics::CREDENTIAL_UPDATE => Ok(EventType::CredentialUpdated),
        topics::CREDENTIAL_DELETION => Ok(EventType::CredentialDeleted),
        topics::CREDENTIAL_SHARED => Ok(EventType::CredentialShared),
        other => Err(StatsError::UnknownTopic(other.to_string())),
    }
}

/// The JSON shape every credential topic carries
#[derive(Debug, Deserialize)]
struct CredentialMessage {
    user_id: String,
    #[serde(default)]
    group_id: Option<String>,
    credential_id: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    is_one_time: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    shared_at: Option<DateTime<Utc>>,
}

/// Decode one inbound message into typed events
///
/// The event timestamp is the time of ingestion, not the payload's own
/// timestamp. Returns one event per message, plus a password event when
/// the message carries one.
pub fn decode_message(topic: &str, payload: &[u8]) -> StatsResult<Vec<Event>> {
    let event_type = event_type_for_topic(topic)?;
    let message: CredentialMessage = serde_json::from_slice(payload)?;
    let ingested_at = Utc::now();

    let mut events = Vec::with_capacity(2);

    match event_type {
        EventType::CredentialCreated => {
            let occurred_at = message.created_at.unwrap_or(ingested_at);
            events.push(Event::with_timestamp(
                EventSource::System,
                EventPayload::CredentialCreated(CredentialCreatedData {
                    user_id: message.user_id.clone(),
                    group_id: message.group_id.clone(),
                    credential_id: message.credential_id.clone(),
                    created_at: occurred_at,
                }),
                ingested_at,
            ));

            if let Some(password) = message.password {
                events.push(Event::with_timestamp(
                    EventSource::System,
                    EventPayload::PasswordCreated(PasswordCreatedData {
                        credential_id: message.credential_id,
                        user_id: message.user_id,
                        group_id: message.group_id,
                        password,
                        last_updated: occurred_at,
                    }),
                    ingested_at,
                ));
            }
        }
        EventType::CredentialUpdated => {
            let occurred_at = message.updated_at.unwrap_or(ingested_at);
            events.push(Event::with_timestamp(
                EventSource::System,
                EventPayload::CredentialUpdated(CredentialUpdatedData {
                    user_id: message.user_id.clone(),
                    group_id: message.group_id.clone(),
                    credential_id: message.credential_id.clone(),
                    updated_at: occurred_at,
                }),
                ingested_at,
            ));

            if let Some(password) = message.password {
                events.push(Event::with_timestamp(
                    EventSource::System,
                    EventPayload::PasswordUpdated(PasswordUpdatedData {
                        credential_id: message.credential_id,
                        user_id: message.user_id,
                        group_id: message.group_id,
                        password,
                        last_updated: occurred_at,
                    }),
                    ingested_at,
                ));
            }
        }
        EventType::CredentialDeleted => {
            events.push(Event::with_timestamp(
                EventSource::System,
                EventPayload::CredentialDeleted(CredentialDeletedData {
                    user_id: message.user_id,
                    group_id: message.group_id,
                    credential_id: message.credential_id,
                    deleted_at: message.deleted_at.unwrap_or(ingested_at),
                }),
                ingested_at,
            ));
        }
        EventType::CredentialShared => {
            events.push(Event::with_timestamp(
                EventSource::System,
                EventPayload::CredentialShared(CredentialSharedData {
                    credential_id: message.credential_id,
                    user_id: message.user_id,
                    group_id: message.group_id,
                    ip_address: message.ip_address,
                    user_agent: message.user_agent,
                    is_one_time: message.is_one_time.unwrap_or(false),
                    shared_at: message.shared_at.unwrap_or(ingested_at),
                }),
                ingested_at,
            ));
        }
        // Password kinds never arrive on a topic of their own
        _ => return Err(StatsError::UnknownTopic(topic.to_string())),
    }

    Ok(events)
}

/// Appends decoded messages to the store, recovering from bad input
pub struct Ingestor {
    store: Arc<EventStore>,
    skipped: AtomicU64,
}

impl Ingestor {
    /// Ingestor feeding the given store
    pub fn new(store: Arc<EventStore>) -> Self {
        Self {
            store,
            skipped: AtomicU64::new(0),
        }
    }

    /// Decode and append one inbound message
    ///
    /// Returns the number of events appended. Malformed payloads and
    /// unknown topics are warned and skipped, returning 0 — the degraded
    /// result surfaces in metrics fidelity, not as an error.
    pub fn ingest(&self, topic: &str, payload: &[u8]) -> usize {
        match decode_message(topic, payload) {
            Ok(events) => {
                let count = events.len();
                self.store.append_all(events);
                count
            }
            Err(e) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                warn!(topic, error = %e, "skipping inbound message");
                0
            }
        }
    }

    /// Number of messages skipped since construction
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}
