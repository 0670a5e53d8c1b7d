//! Metrics Engine - replay queries over the event log
//!
//! The engine is what external callers interact with. Every query validates
//! its parameters first, then derives its answer by folding the log under
//! the store's shared lock. Replay never errors on an individual event;
//! events that do not carry the fields a fold needs are skipped. Reads
//! mutate nothing, so repeated queries against an unchanged log return
//! identical results.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::warn;

use crate::analyzer;
use crate::breach::BreachLookup;
use crate::calculators::{default_calculators, MetricCalculator};
use crate::config::EngineConfig;
use crate::error::{StatsError, StatsResult};
use crate::event_store::EventStore;
use crate::types::{
    BreachedCredential, CredentialAccess, CredentialTrend, EventPayload, GroupMetrics, Metric,
    OldPassword, PasswordStrength, ReusedPassword, SharedCredentialStats, TrendDataPoint,
    UserMetrics,
};

/// Orchestrates calculators and ad-hoc replay queries
pub struct MetricsEngine {
    store: Arc<EventStore>,
    breach: Arc<dyn BreachLookup>,
    calculators: Vec<Box<dyn MetricCalculator>>,
    config: EngineConfig,
}

impl MetricsEngine {
    /// Engine with the default calculator registry and configuration
    pub fn new(store: Arc<EventStore>, breach: Arc<dyn BreachLookup>) -> Self {
        Self::with_config(store, breach, EngineConfig::default())
    }

    /// Engine with explicit configuration
    pub fn with_config(
        store: Arc<EventStore>,
        breach: Arc<dyn BreachLookup>,
        config: EngineConfig,
    ) -> Self {
        let calculators = default_calculators(Arc::clone(&breach), &config);
        Self {
            store,
            breach,
            calculators,
            config,
        }
    }

    /// The store this engine replays
    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }

    /// Add a calculator to the registry
    pub fn register_calculator(&mut self, calculator: Box<dyn MetricCalculator>) {
        self.calculators.push(calculator);
    }

    /// Run every registered calculator over the current log
    ///
    /// Works on a snapshot so appends are never blocked behind breach
    /// lookups. A failing calculator is logged and skipped; the rest
    /// proceed.
    pub fn calculate_all(&self) -> Vec<Metric> {
        let events = self.store.snapshot();
        let mut metrics = Vec::with_capacity(self.calculators.len());

        for calculator in &self.calculators {
            match calculator.calculate(&events) {
                Ok(metric) => metrics.push(metric),
                Err(e) => {
                    warn!(calculator = calculator.name(), error = %e, "calculator failed");
                }
            }
        }

        metrics
    }

    /// Per-user credential totals
    pub fn get_user_metrics(&self, user_id: &str) -> StatsResult<UserMetrics> {
        require_id(user_id, StatsError::InvalidUserId)?;

        let total_credentials = self.store.with_events(|events| {
            let mut total = 0i64;
            for event in events {
                match &event.payload {
                    EventPayload::CredentialCreated(d) if d.user_id == user_id => total += 1,
                    EventPayload::CredentialDeleted(d) if d.user_id == user_id => total -= 1,
                    _ => {}
                }
            }
            total
        });

        Ok(UserMetrics {
            user_id: user_id.to_string(),
            total_credentials,
            last_updated: Utc::now(),
        })
    }

    /// Per-group credential totals and distinct active users
    pub fn get_group_metrics(&self, group_id: &str) -> StatsResult<GroupMetrics> {
        require_id(group_id, StatsError::InvalidGroupId)?;

        let (total_credentials, active_users) = self.store.with_events(|events| {
            let mut total = 0i64;
            let mut users: HashSet<&str> = HashSet::new();

            for event in events {
                match &event.payload {
                    EventPayload::CredentialCreated(d) if d.group_id.as_deref() == Some(group_id) => {
                        total += 1;
                        users.insert(d.user_id.as_str());
                    }
                    EventPayload::CredentialUpdated(d) if d.group_id.as_deref() == Some(group_id) => {
                        users.insert(d.user_id.as_str());
                    }
                    EventPayload::CredentialDeleted(d) if d.group_id.as_deref() == Some(group_id) => {
                        total -= 1;
                        users.insert(d.user_id.as_str());
                    }
                    _ => {}
                }
            }

            (total, users.len())
        });

        Ok(GroupMetrics {
            group_id: group_id.to_string(),
            total_credentials,
            active_users,
            last_updated: Utc::now(),
        })
    }

    /// View statistics for one shared credential
    pub fn get_shared_credential_stats(
        &self,
        credential_id: &str,
    ) -> StatsResult<SharedCredentialStats> {
        require_id(credential_id, StatsError::InvalidCredentialId)?;

        Ok(self.store.with_events(|events| {
            let mut stats = SharedCredentialStats::empty(credential_id);
            let mut viewers: HashSet<String> = HashSet::new();
            let mut one_time_viewers: HashSet<String> = HashSet::new();

            for event in events {
                let Some((id, user_id, is_one_time, at)) = event.access_record() else {
                    continue;
                };
                if id != credential_id {
                    continue;
                }

                stats.total_views += 1;
                viewers.insert(user_id.to_string());
                if is_one_time {
                    one_time_viewers.insert(user_id.to_string());
                }

                stats.first_shared = Some(match stats.first_shared {
                    Some(first) => first.min(at),
                    None => at,
                });
                stats.last_accessed = Some(match stats.last_accessed {
                    Some(last) => last.max(at),
                    None => at,
                });
            }

            stats.unique_viewers = viewers.len();
            stats.one_time_views = one_time_viewers.len();
            stats
        }))
    }

    /// Creation/access counts bucketed by UTC calendar day
    ///
    /// Days without events are omitted; points come back sorted by date.
    pub fn get_credential_trends(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<CredentialTrend> {
        let events = self.store.query_by_time_range(start, end)?;

        let mut by_day: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
        for event in &events {
            let day = event.timestamp.date_naive();
            match &event.payload {
                EventPayload::CredentialCreated(_) => by_day.entry(day).or_default().0 += 1,
                EventPayload::CredentialAccessed(_) | EventPayload::CredentialShared(_) => {
                    by_day.entry(day).or_default().1 += 1
                }
                _ => {}
            }
        }

        let data_points = by_day
            .into_iter()
            .map(|(date, (creations, accesses))| TrendDataPoint {
                date,
                creations,
                accesses,
            })
            .collect();

        Ok(CredentialTrend {
            start_date: start,
            end_date: end,
            data_points,
        })
    }

    /// Access records for one credential within a time range
    pub fn get_credential_accesses(
        &self,
        credential_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatsResult<Vec<CredentialAccess>> {
        require_id(credential_id, StatsError::InvalidCredentialId)?;
        let events = self.store.query_by_time_range(start, end)?;

        let mut accesses = Vec::new();
        for event in &events {
            match &event.payload {
                EventPayload::CredentialAccessed(d) if d.credential_id == credential_id => {
                    accesses.push(CredentialAccess {
                        credential_id: d.credential_id.clone(),
                        user_id: d.user_id.clone(),
                        group_id: d.group_id.clone(),
                        ip_address: d.ip_address.clone(),
                        user_agent: d.user_agent.clone(),
                        is_one_time: d.is_one_time,
                        timestamp: d.accessed_at,
                    });
                }
                EventPayload::CredentialShared(d) if d.credential_id == credential_id => {
                    accesses.push(CredentialAccess {
                        credential_id: d.credential_id.clone(),
                        user_id: d.user_id.clone(),
                        group_id: d.group_id.clone(),
                        ip_address: d.ip_address.clone(),
                        user_agent: d.user_agent.clone(),
                        is_one_time: d.is_one_time,
                        timestamp: d.shared_at,
                    });
                }
                _ => {}
            }
        }

        Ok(accesses)
    }

    /// Strength analysis of each of the user's current passwords
    pub fn get_password_strengths(&self, user_id: &str) -> StatsResult<Vec<PasswordStrength>> {
        require_id(user_id, StatsError::InvalidUserId)?;

        let current = self.current_passwords(user_id);
        Ok(current
            .into_iter()
            .map(|(credential_id, (password, _))| {
                let score = analyzer::score(&password);
                PasswordStrength {
                    credential_id,
                    strength: analyzer::Strength::from_score(score),
                    score,
                }
            })
            .collect())
    }

    /// The user's passwords shared by two or more credentials
    pub fn get_reused_passwords(&self, user_id: &str) -> StatsResult<Vec<ReusedPassword>> {
        require_id(user_id, StatsError::InvalidUserId)?;

        let current = self.current_passwords(user_id);
        let mut by_password: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (credential_id, (password, _)) in current {
            by_password.entry(password).or_default().push(credential_id);
        }

        Ok(by_password
            .into_iter()
            .filter(|(_, ids)| ids.len() >= 2)
            .map(|(password, credential_ids)| ReusedPassword {
                password,
                credential_ids,
            })
            .collect())
    }

    /// The user's credentials whose current password appears in the breach
    /// corpus
    ///
    /// Distinct passwords are looked up once each, outside the store lock.
    /// A lookup failure is surfaced, never converted to "not breached".
    pub fn get_breached_credentials(&self, user_id: &str) -> StatsResult<Vec<BreachedCredential>> {
        require_id(user_id, StatsError::InvalidUserId)?;

        let current = self.current_passwords(user_id);
        let mut by_password: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (credential_id, (password, _)) in current {
            by_password.entry(password).or_default().push(credential_id);
        }

        let mut breached = Vec::new();
        for (password, credential_ids) in by_password {
            if self.breach.is_breached(&password)? {
                for credential_id in credential_ids {
                    breached.push(BreachedCredential {
                        credential_id,
                        password: password.clone(),
                    });
                }
            }
        }

        Ok(breached)
    }

    /// The user's passwords older than `threshold_days`
    pub fn get_old_passwords(
        &self,
        user_id: &str,
        threshold_days: i64,
    ) -> StatsResult<Vec<OldPassword>> {
        require_id(user_id, StatsError::InvalidUserId)?;
        if threshold_days <= 0 {
            return Err(StatsError::InvalidThreshold);
        }

        let now = Utc::now();
        let cutoff = now - Duration::days(threshold_days);
        let current = self.current_passwords(user_id);

        Ok(current
            .into_iter()
            .filter(|(_, (_, last_updated))| *last_updated < cutoff)
            .map(|(credential_id, (password, last_updated))| OldPassword {
                credential_id,
                password,
                age_days: (now - last_updated).num_days(),
            })
            .collect())
    }

    /// The staleness threshold this engine was configured with
    pub fn old_password_max_age_days(&self) -> i64 {
        self.config.old_password_max_age_days
    }

    /// Fold the user's password events into their current password per
    /// credential: the last created/updated value wins, deletions drop the
    /// entry.
    fn current_passwords(&self, user_id: &str) -> BTreeMap<String, (String, DateTime<Utc>)> {
        self.store.with_events(|events| {
            let mut current: BTreeMap<String, (String, DateTime<Utc>)> = BTreeMap::new();

            for event in events {
                match &event.payload {
                    EventPayload::PasswordCreated(d) if d.user_id == user_id => {
                        current.insert(
                            d.credential_id.clone(),
                            (d.password.clone(), d.last_updated),
                        );
                    }
                    EventPayload::PasswordUpdated(d) if d.user_id == user_id => {
                        current.insert(
                            d.credential_id.clone(),
                            (d.password.clone(), d.last_updated),
                        );
                    }
                    EventPayload::PasswordDeleted(d) if d.user_id == user_id => {
                        current.remove(&d.credential_id);
                    }
                    _ => {}
                }
            }

            current
        })
    }
}

fn require_id(value: &str, err: StatsError) -> StatsResult<()> {
    if value.trim().is_empty() {
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CredentialCreatedData, CredentialDeletedData, Event, EventSource, PasswordCreatedData,
        PasswordDeletedData, PasswordUpdatedData,
    };

    struct NoBreaches;

    impl BreachLookup for NoBreaches {
        fn is_breached(&self, _password: &str) -> StatsResult<bool> {
            Ok(false)
        }
    }

    fn engine_with(events: Vec<Event>) -> MetricsEngine {
        let store = Arc::new(EventStore::new());
        store.append_all(events);
        MetricsEngine::new(store, Arc::new(NoBreaches))
    }

    fn credential_created(user_id: &str, group_id: &str, credential_id: &str) -> Event {
        Event::new(
            EventSource::System,
            EventPayload::CredentialCreated(CredentialCreatedData {
                user_id: user_id.to_string(),
                group_id: Some(group_id.to_string()),
                credential_id: credential_id.to_string(),
                created_at: Utc::now(),
            }),
        )
    }

    fn credential_deleted(user_id: &str, group_id: &str, credential_id: &str) -> Event {
        Event::new(
            EventSource::System,
            EventPayload::CredentialDeleted(CredentialDeletedData {
                user_id: user_id.to_string(),
                group_id: Some(group_id.to_string()),
                credential_id: credential_id.to_string(),
                deleted_at: Utc::now(),
            }),
        )
    }

    fn password_created(user_id: &str, credential_id: &str, password: &str) -> Event {
        Event::new(
            EventSource::System,
            EventPayload::PasswordCreated(PasswordCreatedData {
                credential_id: credential_id.to_string(),
                user_id: user_id.to_string(),
                group_id: None,
                password: password.to_string(),
                last_updated: Utc::now(),
            }),
        )
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let engine = engine_with(vec![]);
        assert!(matches!(
            engine.get_user_metrics(""),
            Err(StatsError::InvalidUserId)
        ));
        assert!(matches!(
            engine.get_password_strengths("  "),
            Err(StatsError::InvalidUserId)
        ));
    }

    #[test]
    fn test_non_positive_threshold_rejected() {
        let engine = engine_with(vec![]);
        assert!(matches!(
            engine.get_old_passwords("u1", 0),
            Err(StatsError::InvalidThreshold)
        ));
        assert!(matches!(
            engine.get_old_passwords("u1", -3),
            Err(StatsError::InvalidThreshold)
        ));
    }

    #[test]
    fn test_user_metrics_fold() {
        let engine = engine_with(vec![
            credential_created("u1", "g1", "c1"),
            credential_created("u1", "g1", "c2"),
            credential_created("u2", "g1", "c3"),
            credential_deleted("u1", "g1", "c1"),
        ]);

        let metrics = engine.get_user_metrics("u1").unwrap();
        assert_eq!(metrics.total_credentials, 1);
    }

    #[test]
    fn test_group_metrics_fold() {
        let engine = engine_with(vec![
            credential_created("u1", "g1", "c1"),
            credential_created("u2", "g1", "c2"),
            credential_deleted("u1", "g1", "c1"),
        ]);

        let metrics = engine.get_group_metrics("g1").unwrap();
        assert_eq!(metrics.total_credentials, 1);
        assert_eq!(metrics.active_users, 2);
    }

    #[test]
    fn test_current_password_follows_rotation() {
        let mut events = vec![password_created("u1", "c1", "weakling")];
        events.push(Event::new(
            EventSource::System,
            EventPayload::PasswordUpdated(PasswordUpdatedData {
                credential_id: "c1".to_string(),
                user_id: "u1".to_string(),
                group_id: None,
                password: "Secret123!".to_string(),
                last_updated: Utc::now(),
            }),
        ));

        let engine = engine_with(events);
        let strengths = engine.get_password_strengths("u1").unwrap();
        assert_eq!(strengths.len(), 1);
        assert_eq!(strengths[0].strength, analyzer::Strength::Strong);
    }

    #[test]
    fn test_deleted_password_drops_out() {
        let mut events = vec![password_created("u1", "c1", "Secret123!")];
        events.push(Event::new(
            EventSource::System,
            EventPayload::PasswordDeleted(PasswordDeletedData {
                credential_id: "c1".to_string(),
                user_id: "u1".to_string(),
                deleted_at: Utc::now(),
            }),
        ));

        let engine = engine_with(events);
        assert!(engine.get_password_strengths("u1").unwrap().is_empty());
    }

    #[test]
    fn test_queries_are_idempotent() {
        let engine = engine_with(vec![
            credential_created("u1", "g1", "c1"),
            password_created("u1", "c1", "Secret123!"),
            password_created("u1", "c2", "Secret123!"),
        ]);

        let first = engine.get_reused_passwords("u1").unwrap();
        let second = engine.get_reused_passwords("u1").unwrap();
        assert_eq!(first, second);

        let user_first = engine.get_user_metrics("u1").unwrap();
        let user_second = engine.get_user_metrics("u1").unwrap();
        assert_eq!(
            user_first.total_credentials,
            user_second.total_credentials
        );
    }
}
