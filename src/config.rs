//! Configuration for the metrics engine
//!
//! Plain owned structs with defaults and environment overrides. The engine
//! never reads config files; the embedding service decides where values
//! come from.

use std::env;
use std::time::Duration;

/// Default breach range endpoint
pub const DEFAULT_BREACH_API_URL: &str = "https://api.pwnedpasswords.com";

/// Default outbound timeout for breach lookups
pub const DEFAULT_BREACH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default staleness threshold in days (one year)
pub const DEFAULT_OLD_PASSWORD_MAX_AGE_DAYS: i64 = 365;

/// Configuration for the breach checker
#[derive(Debug, Clone)]
pub struct BreachConfig {
    /// Base URL of the range endpoint
    pub base_url: String,
    /// Outbound request timeout
    pub timeout: Duration,
    /// User-Agent header sent with range queries
    pub user_agent: String,
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BREACH_API_URL.to_string(),
            timeout: DEFAULT_BREACH_TIMEOUT,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

/// Configuration for the metrics engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Breach checker settings
    pub breach: BreachConfig,
    /// Passwords older than this many days count as old
    pub old_password_max_age_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breach: BreachConfig::default(),
            old_password_max_age_days: DEFAULT_OLD_PASSWORD_MAX_AGE_DAYS,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by environment variables
    ///
    /// Recognized: `BREACH_API_URL`, `BREACH_TIMEOUT_SECS`,
    /// `OLD_PASSWORD_MAX_AGE_DAYS`. Unparseable values fall back to the
    /// default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("BREACH_API_URL") {
            if !url.is_empty() {
                config.breach.base_url = url;
            }
        }

        if let Ok(secs) = env::var("BREACH_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.breach.timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(days) = env::var("OLD_PASSWORD_MAX_AGE_DAYS") {
            if let Ok(days) = days.parse::<i64>() {
                if days > 0 {
                    config.old_password_max_age_days = days;
                }
            }
        }

        config
    }

    /// Override the breach endpoint
    pub fn with_breach_url(mut self, base_url: &str) -> Self {
        self.breach.base_url = base_url.to_string();
        self
    }

    /// Override the staleness threshold
    pub fn with_old_password_max_age_days(mut self, days: i64) -> Self {
        self.old_password_max_age_days = days;
        self
    }
}
