//! Engine query results
//!
//! These are the JSON-serializable shapes the outer HTTP layer returns.
//! Each one is rebuilt from scratch on every query by folding the log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::Strength;

/// Per-user credential metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetrics {
    pub user_id: String,
    pub total_credentials: i64,
    /// Wall-clock time of the query, not of the last matching event
    pub last_updated: DateTime<Utc>,
}

/// Per-group credential metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub group_id: String,
    pub total_credentials: i64,
    /// Distinct users observed on the group's credential events
    pub active_users: usize,
    pub last_updated: DateTime<Utc>,
}

/// Creation/access trend over a time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialTrend {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// One point per UTC calendar day that saw events; quiet days are
    /// omitted, callers needing a dense series zero-fill themselves
    pub data_points: Vec<TrendDataPoint>,
}

/// A single day in a trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    pub date: NaiveDate,
    pub creations: u64,
    pub accesses: u64,
}

/// Statistics about a shared credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedCredentialStats {
    pub credential_id: String,
    pub total_views: u64,
    pub unique_viewers: usize,
    /// Distinct viewers who used a one-time link
    pub one_time_views: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_shared: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl SharedCredentialStats {
    /// Empty stats for a credential with no recorded activity
    pub fn empty(credential_id: &str) -> Self {
        Self {
            credential_id: credential_id.to_string(),
            total_views: 0,
            unique_viewers: 0,
            one_time_views: 0,
            first_shared: None,
            last_accessed: None,
        }
    }
}

/// Strength analysis of one credential's current password
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordStrength {
    pub credential_id: String,
    pub strength: Strength,
    pub score: u8,
}

/// A password shared by two or more credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReusedPassword {
    pub password: String,
    pub credential_ids: Vec<String>,
}

/// A credential whose password appears in a breach corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachedCredential {
    pub credential_id: String,
    pub password: String,
}

/// A password older than the staleness threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OldPassword {
    pub credential_id: String,
    pub password: String,
    /// Days since the password was last changed
    pub age_days: i64,
}

/// A single recorded access to a credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialAccess {
    pub credential_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub is_one_time: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_point_date_format() {
        let point = TrendDataPoint {
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            creations: 2,
            accesses: 5,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"date\":\"2025-03-14\""));
    }

    #[test]
    fn test_empty_shared_stats_omit_timestamps() {
        let stats = SharedCredentialStats::empty("c1");
        let json = serde_json::to_string(&stats).unwrap();
        assert!(!json.contains("first_shared"));
        assert!(!json.contains("last_accessed"));
    }
}
