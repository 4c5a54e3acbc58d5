//! Configuration types for company-code-resolver

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote company lookup service settings
///
/// One lookup is a `GET {base_url}{lookup_path}?{phone_param}={phone}` that answers
/// with a JSON body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LookupServiceConfig {
    /// Base URL of the lookup service (default: "http://localhost:8080")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the lookup endpoint (default: "/api/company-code")
    #[serde(default = "default_lookup_path")]
    pub lookup_path: String,

    /// Query parameter carrying the phone number (default: "phone")
    #[serde(default = "default_phone_param")]
    pub phone_param: String,

    /// Timeout for a single lookup request (default: 10 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Value sent as the `Authorization` header (None = no header)
    #[serde(default)]
    pub auth_header: Option<String>,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LookupServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lookup_path: default_lookup_path(),
            phone_param: default_phone_param(),
            request_timeout: default_request_timeout(),
            auth_header: None,
            user_agent: default_user_agent(),
        }
    }
}

impl LookupServiceConfig {
    /// Full lookup endpoint URL without the phone query parameter
    pub fn endpoint(&self) -> Result<url::Url> {
        let base = url::Url::parse(&self.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::config(
                "base_url",
                format!("unsupported scheme '{}', expected http or https", base.scheme()),
            ));
        }
        Ok(base.join(&self.lookup_path)?)
    }
}

/// Main configuration for [`CompanyCodeResolver`](crate::CompanyCodeResolver)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Lookup service settings
    #[serde(default)]
    pub lookup: LookupServiceConfig,

    /// Concurrency used when the caller does not ask for one (default: 3)
    #[serde(default = "default_concurrency")]
    pub default_concurrency: usize,

    /// Ceiling on caller-requested concurrency (default: 16)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Overall deadline for one batch (default: 25 seconds)
    ///
    /// Reporting handlers time out around 25-30 seconds, so a batch must return
    /// before that even when the lookup service is degraded.
    #[serde(default = "default_batch_deadline", with = "duration_serde")]
    pub batch_deadline: Duration,

    /// Expected latency of one lookup, used by the budget pre-check (default: 800ms)
    #[serde(default = "default_expected_lookup_latency", with = "duration_ms_serde")]
    pub expected_lookup_latency: Duration,

    /// Capacity of the progress event channel (default: 256)
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lookup: LookupServiceConfig::default(),
            default_concurrency: default_concurrency(),
            max_concurrency: default_max_concurrency(),
            batch_deadline: default_batch_deadline(),
            expected_lookup_latency: default_expected_lookup_latency(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl ResolverConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.default_concurrency == 0 {
            return Err(Error::config(
                "default_concurrency",
                "default_concurrency must be at least 1",
            ));
        }
        if self.max_concurrency == 0 {
            return Err(Error::config(
                "max_concurrency",
                "max_concurrency must be at least 1",
            ));
        }
        if self.default_concurrency > self.max_concurrency {
            return Err(Error::config(
                "default_concurrency",
                format!(
                    "default_concurrency ({}) exceeds max_concurrency ({})",
                    self.default_concurrency, self.max_concurrency
                ),
            ));
        }
        if self.batch_deadline.is_zero() {
            return Err(Error::config(
                "batch_deadline",
                "batch_deadline must be greater than zero",
            ));
        }
        if self.lookup.request_timeout.is_zero() {
            return Err(Error::config(
                "lookup.request_timeout",
                "request_timeout must be greater than zero",
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::config(
                "event_channel_capacity",
                "event_channel_capacity must be at least 1",
            ));
        }
        self.lookup.endpoint()?;
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_lookup_path() -> String {
    "/api/company-code".to_string()
}

fn default_phone_param() -> String {
    "phone".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("company-code-resolver/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_concurrency() -> usize {
    3
}

fn default_max_concurrency() -> usize {
    16
}

fn default_batch_deadline() -> Duration {
    Duration::from_secs(25)
}

fn default_expected_lookup_latency() -> Duration {
    Duration::from_millis(800)
}

fn default_event_channel_capacity() -> usize {
    256
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Millisecond Duration serialization helper
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
