// HTTP gateway over the SentinelX REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::{BackendGateway, GatewayFailure, GatewayResult, ScanResult, UnreadCount};
use crate::alert::{AlertId, AlertRecord};
use crate::config::DashboardConfig;
use crate::monitoring::MonitoringStatus;

/// [`BackendGateway`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Gateway whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayFailure::new(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> GatewayResult<Self> {
        Self::with_timeout(&config.api_url, config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GatewayFailure::new(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayFailure::new(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> GatewayResult<T> {
        let response = self
            .http
            .get(self.url(path)?)
            .send()
            .await
            .map_err(transport_failure)?;
        decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &[&str],
        body: &B,
    ) -> GatewayResult<T> {
        let response = self
            .http
            .post(self.url(path)?)
            .json(body)
            .send()
            .await
            .map_err(transport_failure)?;
        decode(response).await
    }

    async fn put(&self, path: &[&str]) -> GatewayResult<()> {
        let response = self
            .http
            .put(self.url(path)?)
            .send()
            .await
            .map_err(transport_failure)?;
        expect_success(response).await
    }

    async fn delete(&self, path: &[&str]) -> GatewayResult<()> {
        let response = self
            .http
            .delete(self.url(path)?)
            .send()
            .await
            .map_err(transport_failure)?;
        expect_success(response).await
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn list_alerts(&self) -> GatewayResult<Vec<AlertRecord>> {
        self.get(&["api", "alerts"]).await
    }

    async fn unread_count(&self) -> GatewayResult<usize> {
        let body: UnreadCount = self.get(&["api", "alerts", "unread-count"]).await?;
        Ok(body.count)
    }

    async fn mark_read(&self, id: &AlertId) -> GatewayResult<()> {
        self.put(&["api", "alerts", id.as_str(), "read"]).await
    }

    async fn mark_all_read(&self) -> GatewayResult<()> {
        self.put(&["api", "alerts", "read-all"]).await
    }

    async fn delete_alert(&self, id: &AlertId) -> GatewayResult<()> {
        self.delete(&["api", "alerts", id.as_str()]).await
    }

    async fn check_email(&self, email_id: &str) -> GatewayResult<ScanResult> {
        self.post(&["api", "emails", email_id, "check"], &json!({}))
            .await
    }

    async fn monitoring_status(&self) -> GatewayResult<MonitoringStatus> {
        self.get(&["api", "monitoring", "status"]).await
    }

    async fn toggle_monitoring(&self, enabled: bool) -> GatewayResult<()> {
        let response = self
            .http
            .post(self.url(&["api", "monitoring", "toggle"])?)
            .json(&json!({ "enabled": enabled }))
            .send()
            .await
            .map_err(transport_failure)?;
        expect_success(response).await
    }
}

fn transport_failure(err: reqwest::Error) -> GatewayFailure {
    tracing::debug!(error = %err, "backend request failed");
    if err.is_timeout() {
        GatewayFailure::new("request timed out")
    } else {
        GatewayFailure::new(err.to_string())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(failure_from_body(status, response).await);
    }

    let bytes = response.bytes().await.map_err(transport_failure)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayFailure::new(format!("invalid response body: {}", e)))
}

async fn expect_success(response: Response) -> GatewayResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(failure_from_body(status, response).await)
}

/// Use the body's `error` field when there is one, otherwise `HTTP <status>`.
async fn failure_from_body(status: StatusCode, response: Response) -> GatewayFailure {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    GatewayFailure::new(message)
}
