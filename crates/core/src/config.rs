//! Dashboard configuration
//!
//! Loaded from environment variables, with builder-style overrides.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notification::NotificationKind;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A value was present but not usable
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Notification timing
///
/// `*_duration` is how long a widget stays visible; `*_grace` is the exit
/// animation period between DISMISSING and REMOVED. `transition_log` caps how
/// many undrained transitions the scheduler keeps; the oldest are dropped
/// first, and 0 keeps none.
///
/// # Example
///
/// ```
/// use sentinelx_core::NotificationConfig;
/// use std::time::Duration;
///
/// let config = NotificationConfig::default()
///     .with_toast_duration(Duration::from_secs(2))
///     .with_sms_grace(Duration::from_millis(250));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(with = "duration_millis")]
    pub toast_duration: Duration,

    #[serde(with = "duration_millis")]
    pub sms_duration: Duration,

    #[serde(with = "duration_millis")]
    pub toast_grace: Duration,

    #[serde(with = "duration_millis")]
    pub sms_grace: Duration,

    #[serde(default = "default_transition_log")]
    pub transition_log: usize,
}

fn default_transition_log() -> usize {
    256
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            toast_duration: Duration::from_millis(3000),
            sms_duration: Duration::from_millis(5000),
            toast_grace: Duration::from_millis(300),
            sms_grace: Duration::from_millis(400),
            transition_log: default_transition_log(),
        }
    }
}

impl NotificationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn with_sms_duration(mut self, duration: Duration) -> Self {
        self.sms_duration = duration;
        self
    }

    pub fn with_toast_grace(mut self, grace: Duration) -> Self {
        self.toast_grace = grace;
        self
    }

    pub fn with_sms_grace(mut self, grace: Duration) -> Self {
        self.sms_grace = grace;
        self
    }

    pub fn with_transition_log(mut self, capacity: usize) -> Self {
        self.transition_log = capacity;
        self
    }

    /// Default visible duration for a kind
    pub fn duration_for(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::Toast => self.toast_duration,
            NotificationKind::Sms => self.sms_duration,
        }
    }

    /// Exit grace period for a kind
    pub fn grace_for(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::Toast => self.toast_grace,
            NotificationKind::Sms => self.sms_grace,
        }
    }

    /// Grace periods must be non-zero so the exit step is never skipped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toast_grace.is_zero() {
            return Err(ConfigError::invalid("toast_grace", "must be greater than zero"));
        }
        if self.sms_grace.is_zero() {
            return Err(ConfigError::invalid("sms_grace", "must be greater than zero"));
        }
        Ok(())
    }
}

/// Top-level configuration for a dashboard session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Backend base URL
    pub api_url: String,

    /// Per-request timeout for the HTTP gateway
    #[serde(with = "duration_millis")]
    pub http_timeout: Duration,

    /// Largest count shown on the badge before it collapses to "N+"
    pub badge_cap: usize,

    pub notifications: NotificationConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            http_timeout: Duration::from_secs(10),
            badge_cap: 99,
            notifications: NotificationConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `SENTINELX_API_URL`: Backend base URL (default: http://localhost:5000)
    /// - `SENTINELX_HTTP_TIMEOUT_SECS`: Request timeout (default: 10)
    /// - `SENTINELX_BADGE_CAP`: Badge cap (default: 99)
    /// - `SENTINELX_TOAST_DURATION_MS` / `SENTINELX_SMS_DURATION_MS`: Visible time
    /// - `SENTINELX_TOAST_GRACE_MS` / `SENTINELX_SMS_GRACE_MS`: Exit animation time
    /// - `SENTINELX_TRANSITION_LOG`: Undrained transitions kept (default: 256)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let notifications = NotificationConfig {
            toast_duration: env_millis("SENTINELX_TOAST_DURATION_MS")
                .unwrap_or(defaults.notifications.toast_duration),
            sms_duration: env_millis("SENTINELX_SMS_DURATION_MS")
                .unwrap_or(defaults.notifications.sms_duration),
            toast_grace: env_millis("SENTINELX_TOAST_GRACE_MS")
                .unwrap_or(defaults.notifications.toast_grace),
            sms_grace: env_millis("SENTINELX_SMS_GRACE_MS")
                .unwrap_or(defaults.notifications.sms_grace),
            transition_log: env_parse("SENTINELX_TRANSITION_LOG")
                .unwrap_or(defaults.notifications.transition_log),
        };

        Self {
            api_url: env::var("SENTINELX_API_URL").unwrap_or(defaults.api_url),
            http_timeout: env_parse::<u64>("SENTINELX_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            badge_cap: env_parse("SENTINELX_BADGE_CAP").unwrap_or(defaults.badge_cap),
            notifications,
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_badge_cap(mut self, cap: usize) -> Self {
        self.badge_cap = cap;
        self
    }

    pub fn with_notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api_url",
                format!("'{}' is not an http(s) URL", self.api_url),
            ));
        }
        if self.badge_cap == 0 {
            return Err(ConfigError::invalid("badge_cap", "must be greater than zero"));
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::invalid("http_timeout", "must be greater than zero"));
        }
        self.notifications.validate()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_millis(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_millis)
}

/// Serde support for Duration as milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
