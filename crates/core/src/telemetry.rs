// Logging setup
//
// Console logging through tracing-subscriber. Output goes to stderr so that
// machine-readable command output on stdout stays clean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_FILTER: &str = "sentinelx=info";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Whether to log to the console at all
    pub enable_console: bool,
    /// Log filter (e.g., "info", "sentinelx=debug")
    pub log_filter: Option<String>,
    /// Include module targets in log lines
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable_console: true,
            log_filter: None,
            with_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `RUST_LOG` or `LOG_LEVEL`: Log filter
    pub fn from_env() -> Self {
        Self {
            log_filter: std::env::var("RUST_LOG")
                .ok()
                .or_else(|| std::env::var("LOG_LEVEL").ok()),
            ..Self::default()
        }
    }

    /// Silence everything below warnings
    pub fn quiet(mut self) -> Self {
        self.log_filter = Some("warn".to_string());
        self
    }

    /// Resolve the configured filter, falling back to [`DEFAULT_LOG_FILTER`]
    /// when it is missing or unparsable
    pub fn env_filter(&self) -> EnvFilter {
        self.log_filter
            .as_ref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

/// Install the global subscriber.
///
/// Returns false if a subscriber was already installed, which is harmless
/// (tests install their own).
///
/// # Example
///
/// ```ignore
/// use sentinelx_core::telemetry::{init_telemetry, TelemetryConfig};
///
/// #[tokio::main]
/// async fn main() {
///     init_telemetry(TelemetryConfig::from_env());
///     // ... your application code
/// }
/// ```
pub fn init_telemetry(config: TelemetryConfig) -> bool {
    let console_layer = if config.enable_console {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.with_target)
                .with_filter(config.env_filter()),
        )
    } else {
        None
    };

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = ?config.log_filter, "logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let config = TelemetryConfig::default();
        assert_eq!(config.env_filter().to_string(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_quiet() {
        let config = TelemetryConfig::default().quiet();
        assert_eq!(config.log_filter.as_deref(), Some("warn"));
    }

    #[test]
    fn test_second_init_is_harmless() {
        init_telemetry(TelemetryConfig::default());
        assert!(!init_telemetry(TelemetryConfig::default()));
    }
}
