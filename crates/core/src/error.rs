// Error types for the notification engine

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::GatewayFailure;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the dashboard controller
///
/// Unknown alert ids and cancelled notifications are never errors; the only
/// failures the engine reports are backend failures and bad configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Backend request failed; local state was left untouched
    #[error("backend request failed: {0}")]
    Gateway(#[from] GatewayFailure),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Create a gateway error from a plain message
    pub fn gateway(msg: impl Into<String>) -> Self {
        EngineError::Gateway(GatewayFailure::new(msg))
    }

    /// Whether this error came from the backend
    pub fn is_gateway(&self) -> bool {
        matches!(self, EngineError::Gateway(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = EngineError::gateway("HTTP 500");
        assert!(err.is_gateway());
        assert_eq!(err.to_string(), "backend request failed: HTTP 500");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: EngineError = ConfigError::InvalidValue {
            field: "badge_cap",
            reason: "must be greater than zero".into(),
        }
        .into();
        assert!(!err.is_gateway());
        assert!(err.to_string().contains("badge_cap"));
    }
}
