//! In-memory implementation of BackendGateway for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{BackendGateway, GatewayFailure, GatewayResult, ScanResult};
use crate::alert::{AlertId, AlertRecord, Severity};
use crate::monitoring::MonitoringStatus;

/// A monitored address and what the next scan of it will find
struct MonitoredEmail {
    address: String,
    breaches_found: u32,
}

/// In-memory backend
///
/// Holds the server-side alert list, monitored addresses and monitoring
/// status. Scans that find breaches append a critical alert, the way the real
/// backend does. Mutations on unknown alert ids succeed without effect.
///
/// # Example
///
/// ```
/// use sentinelx_core::gateway::InMemoryGateway;
///
/// let gateway = InMemoryGateway::new().with_email("1", "demo@example.com", 2);
/// assert_eq!(gateway.alert_count(), 0);
/// ```
pub struct InMemoryGateway {
    alerts: RwLock<Vec<AlertRecord>>,
    emails: RwLock<HashMap<String, MonitoredEmail>>,
    monitoring: RwLock<MonitoringStatus>,
    failure: RwLock<Option<String>>,
    next_alert_id: AtomicI64,
    calls: AtomicUsize,
}

impl InMemoryGateway {
    /// Create an empty backend with monitoring enabled and no sweep yet
    pub fn new() -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
            emails: RwLock::new(HashMap::new()),
            monitoring: RwLock::new(MonitoringStatus {
                enabled: true,
                last_sweep_at: None,
            }),
            failure: RwLock::new(None),
            next_alert_id: AtomicI64::new(1),
            calls: AtomicUsize::new(0),
        }
    }

    /// Seed server-side alerts
    pub fn with_alerts(self, alerts: Vec<AlertRecord>) -> Self {
        let max_numeric = alerts
            .iter()
            .filter_map(|a| a.id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        self.next_alert_id.store(max_numeric + 1, Ordering::SeqCst);
        *self.alerts.write() = alerts;
        self
    }

    /// Register a monitored address whose scans find `breaches_found` leaks
    pub fn with_email(self, email_id: &str, address: &str, breaches_found: u32) -> Self {
        self.emails.write().insert(
            email_id.to_string(),
            MonitoredEmail {
                address: address.to_string(),
                breaches_found,
            },
        );
        self
    }

    pub fn with_monitoring(self, status: MonitoringStatus) -> Self {
        *self.monitoring.write() = status;
        self
    }

    /// Make every following call fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    /// Stop failing calls
    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// Number of calls made, including failed ones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.read().len()
    }

    /// Server-side copy of an alert
    pub fn alert(&self, id: &AlertId) -> Option<AlertRecord> {
        self.alerts.read().iter().find(|a| &a.id == id).cloned()
    }

    fn begin_call(&self) -> GatewayResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.read().as_ref() {
            Some(message) => Err(GatewayFailure::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendGateway for InMemoryGateway {
    async fn list_alerts(&self) -> GatewayResult<Vec<AlertRecord>> {
        self.begin_call()?;
        let mut alerts = self.alerts.read().clone();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    async fn unread_count(&self) -> GatewayResult<usize> {
        self.begin_call()?;
        Ok(self.alerts.read().iter().filter(|a| !a.is_read).count())
    }

    async fn mark_read(&self, id: &AlertId) -> GatewayResult<()> {
        self.begin_call()?;
        if let Some(alert) = self.alerts.write().iter_mut().find(|a| &a.id == id) {
            alert.is_read = true;
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> GatewayResult<()> {
        self.begin_call()?;
        for alert in self.alerts.write().iter_mut() {
            alert.is_read = true;
        }
        Ok(())
    }

    async fn delete_alert(&self, id: &AlertId) -> GatewayResult<()> {
        self.begin_call()?;
        self.alerts.write().retain(|a| &a.id != id);
        Ok(())
    }

    async fn check_email(&self, email_id: &str) -> GatewayResult<ScanResult> {
        self.begin_call()?;
        let emails = self.emails.read();
        let email = emails
            .get(email_id)
            .ok_or_else(|| GatewayFailure::new("Email not found"))?;

        if email.breaches_found > 0 {
            let id = self.next_alert_id.fetch_add(1, Ordering::SeqCst);
            let alert = AlertRecord::new(
                id,
                Severity::Critical,
                format!(
                    "{} found in {} new breach(es)",
                    email.address, email.breaches_found
                ),
            )
            .with_email(email.address.clone())
            .with_created_at(Utc::now());
            self.alerts.write().push(alert);
        }

        Ok(ScanResult {
            breaches_found: email.breaches_found,
        })
    }

    async fn monitoring_status(&self) -> GatewayResult<MonitoringStatus> {
        self.begin_call()?;
        Ok(self.monitoring.read().clone())
    }

    async fn toggle_monitoring(&self, enabled: bool) -> GatewayResult<()> {
        self.begin_call()?;
        self.monitoring.write().enabled = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_with_breaches_creates_alert() {
        let gateway = InMemoryGateway::new().with_email("4", "demo@example.com", 3);

        let result = gateway.check_email("4").await.unwrap();
        assert_eq!(result.breaches_found, 3);
        assert_eq!(gateway.alert_count(), 1);
        assert_eq!(gateway.unread_count().await.unwrap(), 1);

        let alerts = gateway.list_alerts().await.unwrap();
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].associated_email.as_deref(), Some("demo@example.com"));
    }

    #[tokio::test]
    async fn test_clean_scan_creates_nothing() {
        let gateway = InMemoryGateway::new().with_email("4", "clean@example.com", 0);
        let result = gateway.check_email("4").await.unwrap();
        assert_eq!(result.breaches_found, 0);
        assert_eq!(gateway.alert_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_email_fails() {
        let gateway = InMemoryGateway::new();
        let err = gateway.check_email("99").await.unwrap_err();
        assert_eq!(err.message, "Email not found");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let gateway = InMemoryGateway::new()
            .with_alerts(vec![AlertRecord::new("1", Severity::Low, "hello")]);

        gateway.fail_with("HTTP 503");
        assert_eq!(
            gateway.mark_all_read().await.unwrap_err(),
            GatewayFailure::new("HTTP 503")
        );
        assert!(!gateway.alert(&AlertId::from("1")).unwrap().is_read);

        gateway.recover();
        gateway.mark_all_read().await.unwrap();
        assert!(gateway.alert(&AlertId::from("1")).unwrap().is_read);
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_new_alert_ids_follow_seeded_ones() {
        let gateway = InMemoryGateway::new()
            .with_alerts(vec![AlertRecord::new("41", Severity::Low, "old")])
            .with_email("1", "a@b.c", 1);
        gateway.check_email("1").await.unwrap();
        assert!(gateway.alert(&AlertId::from("42")).is_some());
    }

    #[tokio::test]
    async fn test_toggle_monitoring() {
        let gateway = InMemoryGateway::new();
        gateway.toggle_monitoring(false).await.unwrap();
        assert!(!gateway.monitoring_status().await.unwrap().enabled);
    }
}
