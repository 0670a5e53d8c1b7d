//! Breach Checker - k-anonymity range lookups
//!
//! A password is checked against a breach corpus without the plaintext or
//! the full hash ever leaving the process: the 40-character uppercase SHA-1
//! digest is split into a 5-character prefix and 35-character suffix, only
//! the prefix is sent, and the response lists `SUFFIX:COUNT` lines for
//! every corpus hash sharing that prefix.
//!
//! Transport and HTTP failures are surfaced as errors. They are never
//! reported as "not breached".

use std::time::Duration;

use sha1::{Digest, Sha1};

use crate::config::BreachConfig;
use crate::error::{StatsError, StatsResult};

/// Length of the hash prefix transmitted to the range endpoint
pub const PREFIX_LEN: usize = 5;

/// Lookup seam the calculators and engine depend on
///
/// The production implementation is [`HibpClient`]; tests substitute a
/// static corpus.
pub trait BreachLookup: Send + Sync {
    /// True iff the password appears in the breach corpus
    fn is_breached(&self, password: &str) -> StatsResult<bool>;
}

/// Client for a HaveIBeenPwned-compatible range endpoint
pub struct HibpClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HibpClient {
    /// Build a client from configuration
    pub fn new(config: &BreachConfig) -> StatsResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(clamp_timeout(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client with defaults and a custom endpoint
    pub fn with_base_url(base_url: &str) -> StatsResult<Self> {
        let config = BreachConfig {
            base_url: base_url.to_string(),
            ..BreachConfig::default()
        };
        Self::new(&config)
    }

    /// The configured endpoint base
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl BreachLookup for HibpClient {
    fn is_breached(&self, password: &str) -> StatsResult<bool> {
        let digest = sha1_hex_upper(password);
        let (prefix, suffix) = digest.split_at(PREFIX_LEN);

        let url = format!("{}/range/{}", self.base_url, prefix);
        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::BreachLookup(format!(
                "range endpoint returned status {}",
                status
            )));
        }

        let body = response.text()?;
        Ok(body_contains_suffix(&body, suffix))
    }
}

/// Uppercase hexadecimal SHA-1 digest of a password
pub(crate) fn sha1_hex_upper(password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    hex::encode_upper(hasher.finalize())
}

/// Scan a `SUFFIX:COUNT` range response for a hash suffix
pub(crate) fn body_contains_suffix(body: &str, suffix: &str) -> bool {
    body.lines()
        .any(|line| line.trim_end().starts_with(suffix))
}

/// Duration guard so a stuck endpoint cannot wedge a replay
pub(crate) fn clamp_timeout(timeout: Duration) -> Duration {
    const MAX_TIMEOUT: Duration = Duration::from_secs(60);
    timeout.min(MAX_TIMEOUT)
}
