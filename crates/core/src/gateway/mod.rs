// Backend gateway
//
// The REST backend is an external collaborator. Every call resolves to either
// data or a GatewayFailure carrying a human readable message; transport
// details never leak past this boundary.

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::InMemoryGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alert::{AlertId, AlertRecord};
use crate::monitoring::MonitoringStatus;

/// A failed backend call (the `{ok: false, error}` envelope)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayFailure {
    pub message: String,
}

impl GatewayFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a backend call
pub type GatewayResult<T> = std::result::Result<T, GatewayFailure>;

/// `GET /api/alerts/unread-count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: usize,
}

/// `POST /api/emails/{id}/check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub breaches_found: u32,
}

/// The REST operations the dashboard consumes
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// `GET /api/alerts`
    async fn list_alerts(&self) -> GatewayResult<Vec<AlertRecord>>;

    /// `GET /api/alerts/unread-count`
    async fn unread_count(&self) -> GatewayResult<usize>;

    /// `PUT /api/alerts/{id}/read`
    async fn mark_read(&self, id: &AlertId) -> GatewayResult<()>;

    /// `PUT /api/alerts/read-all`
    async fn mark_all_read(&self) -> GatewayResult<()>;

    /// `DELETE /api/alerts/{id}`
    async fn delete_alert(&self, id: &AlertId) -> GatewayResult<()>;

    /// `POST /api/emails/{id}/check`
    async fn check_email(&self, email_id: &str) -> GatewayResult<ScanResult>;

    /// `GET /api/monitoring/status`
    async fn monitoring_status(&self) -> GatewayResult<MonitoringStatus>;

    /// `POST /api/monitoring/toggle`
    async fn toggle_monitoring(&self, enabled: bool) -> GatewayResult<()>;
}
