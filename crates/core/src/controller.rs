//! Dashboard controller
//!
//! Glue between user actions, the backend gateway, the alert store and the
//! notification scheduler. One controller per dashboard session; it owns its
//! store and scheduler outright.
//!
//! Every mutating action calls the backend first and only touches local state
//! once the call succeeded, so a failed request leaves the store exactly as it
//! was. Locks are taken after the await returns and released before the next
//! one, which makes concurrently issued actions apply in completion order.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::alert::{AlertId, AlertRecord};
use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::gateway::BackendGateway;
use crate::monitoring::MonitoringStatus;
use crate::notification::{NotificationPayload, NotificationScheduler, TaskHandle, ToastLevel};
use crate::store::{AlertStateStore, Badge};

/// What a scan produced on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub breaches_found: u32,
    /// The SMS-style popup, when breaches were found
    pub sms: Option<TaskHandle>,
    /// Badge after the post-scan refresh
    pub badge: Badge,
}

pub struct DashboardController {
    session_id: Uuid,
    gateway: Arc<dyn BackendGateway>,
    store: Mutex<AlertStateStore>,
    scheduler: Arc<Mutex<NotificationScheduler>>,
    /// Last monitoring status the backend reported
    monitoring: Mutex<Option<MonitoringStatus>>,
    config: DashboardConfig,
}

impl DashboardController {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        clock: Arc<dyn Clock>,
        config: DashboardConfig,
    ) -> Result<Self> {
        config.validate()?;
        let scheduler = NotificationScheduler::new(clock, config.notifications.clone());
        let session_id = Uuid::now_v7();
        tracing::debug!(session_id = %session_id, api_url = %config.api_url, "dashboard session started");

        Ok(Self {
            session_id,
            gateway,
            store: Mutex::new(AlertStateStore::new()),
            scheduler: Arc::new(Mutex::new(scheduler)),
            monitoring: Mutex::new(None),
            config,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Shared scheduler, for the surface that renders and drives the widgets
    pub fn scheduler(&self) -> Arc<Mutex<NotificationScheduler>> {
        Arc::clone(&self.scheduler)
    }

    /// Snapshot of the loaded alerts in display order
    pub fn alerts(&self) -> Vec<AlertRecord> {
        self.store.lock().records().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.store.lock().unread_count()
    }

    pub fn badge(&self) -> Badge {
        self.store.lock().badge(self.config.badge_cap)
    }

    /// Replace the local alert list with the backend's
    pub async fn refresh_alerts(&self) -> Result<Badge> {
        let records = self.gateway.list_alerts().await.inspect_err(|e| {
            tracing::warn!(session_id = %self.session_id, error = %e, "failed to load alerts");
        })?;

        let count = records.len();
        let badge = {
            let mut store = self.store.lock();
            store.load(records);
            store.badge(self.config.badge_cap)
        };
        tracing::debug!(session_id = %self.session_id, alerts = count, unread = badge.count, "alerts refreshed");
        Ok(badge)
    }

    pub async fn mark_read(&self, id: &AlertId) -> Result<Badge> {
        self.gateway.mark_read(id).await.inspect_err(|e| {
            tracing::warn!(session_id = %self.session_id, alert_id = %id, error = %e, "failed to mark alert read");
        })?;

        let mut store = self.store.lock();
        if !store.mark_read(id) {
            tracing::debug!(alert_id = %id, "mark read had no local effect");
        }
        Ok(store.badge(self.config.badge_cap))
    }

    pub async fn mark_all_read(&self) -> Result<Badge> {
        self.gateway.mark_all_read().await.inspect_err(|e| {
            tracing::warn!(session_id = %self.session_id, error = %e, "failed to mark all alerts read");
        })?;

        let mut store = self.store.lock();
        store.mark_all_read();
        Ok(store.badge(self.config.badge_cap))
    }

    pub async fn delete_alert(&self, id: &AlertId) -> Result<Badge> {
        self.gateway.delete_alert(id).await.inspect_err(|e| {
            tracing::warn!(session_id = %self.session_id, alert_id = %id, error = %e, "failed to delete alert");
        })?;

        let mut store = self.store.lock();
        if store.delete(id) {
            tracing::info!(alert_id = %id, "alert deleted");
        }
        Ok(store.badge(self.config.badge_cap))
    }

    /// Backend's unread count, without reloading the list
    pub async fn remote_unread_count(&self) -> Result<usize> {
        let remote = self.gateway.unread_count().await?;
        let local = self.unread_count();
        if remote != local {
            tracing::debug!(local, remote, "unread count differs from backend");
        }
        Ok(remote)
    }

    /// Scan one monitored address and report the result through notifications.
    ///
    /// A failed scan returns the failure after the "Scanning" toast and shows
    /// nothing else. A failed refresh after a successful scan is only logged.
    pub async fn check_email(&self, email_id: &str, email: &str) -> Result<ScanOutcome> {
        self.notify(format!("Scanning {} for breaches...", email), ToastLevel::Info);

        let result = self.gateway.check_email(email_id).await.inspect_err(|e| {
            tracing::warn!(session_id = %self.session_id, email_id, error = %e, "scan failed");
        })?;

        let breaches_found = result.breaches_found;
        let sms = if breaches_found > 0 {
            tracing::info!(email_id, breaches_found, "breaches found");
            self.notify(
                format!("Alert! Found {} breaches for {}.", breaches_found, email),
                ToastLevel::Error,
            );
            self.simulate_sms(email, breaches_found)
        } else {
            self.notify("Scan complete. No breaches found.", ToastLevel::Success);
            None
        };

        let badge = match self.refresh_alerts().await {
            Ok(badge) => badge,
            Err(e) => {
                tracing::warn!(error = %e, "post-scan refresh failed; badge may be stale");
                self.badge()
            }
        };

        Ok(ScanOutcome {
            breaches_found,
            sms,
            badge,
        })
    }

    pub async fn monitoring_status(&self) -> Result<MonitoringStatus> {
        let status = self.gateway.monitoring_status().await?;
        *self.monitoring.lock() = Some(status.clone());
        Ok(status)
    }

    /// Switch background monitoring and return the backend's new status.
    ///
    /// Once the toggle itself succeeded, a failed status re-fetch is only
    /// logged; the result then carries the requested state and the last
    /// sweep time seen before.
    pub async fn toggle_monitoring(&self, enabled: bool) -> Result<MonitoringStatus> {
        self.gateway.toggle_monitoring(enabled).await.inspect_err(|e| {
            tracing::warn!(session_id = %self.session_id, enabled, error = %e, "failed to toggle monitoring");
        })?;

        let message = if enabled {
            "Auto-monitoring enabled"
        } else {
            "Auto-monitoring paused"
        };
        self.notify(message, ToastLevel::Info);

        let status = match self.monitoring_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "status refresh after toggle failed; last sweep may be stale");
                let mut cached = self.monitoring.lock();
                let status = MonitoringStatus {
                    enabled,
                    last_sweep_at: cached.as_ref().and_then(|s| s.last_sweep_at),
                };
                *cached = Some(status.clone());
                status
            }
        };
        tracing::info!(
            enabled = status.enabled,
            last_sweep = %status.last_sweep_label(Utc::now()),
            "monitoring toggled"
        );
        Ok(status)
    }

    /// Show a toast for the configured toast duration
    pub fn notify(&self, message: impl Into<String>, level: ToastLevel) -> TaskHandle {
        self.scheduler
            .lock()
            .schedule_default(NotificationPayload::toast(message, level))
    }

    /// Show the SMS-style delivery popup; nothing is shown for zero breaches
    pub fn simulate_sms(&self, email: &str, breach_count: u32) -> Option<TaskHandle> {
        if breach_count == 0 {
            return None;
        }
        let handle = self
            .scheduler
            .lock()
            .schedule_default(NotificationPayload::sms(email, breach_count));
        Some(handle)
    }
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("session_id", &self.session_id)
            .field("api_url", &self.config.api_url)
            .finish_non_exhaustive()
    }
}
