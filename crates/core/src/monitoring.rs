// Auto-monitoring status
//
// "Last sweep" is rendered from the timestamp the backend stored for the last
// completed sweep. Rendering it from the current instant would always read
// "Just now".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::timestamp;

/// Backend auto-monitoring state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringStatus {
    pub enabled: bool,
    /// When the last background sweep finished, if one ever ran
    #[serde(default, with = "timestamp::option")]
    pub last_sweep_at: Option<DateTime<Utc>>,
}

impl MonitoringStatus {
    /// "Active" or "Paused"
    pub fn label(&self) -> &'static str {
        if self.enabled {
            "Active"
        } else {
            "Paused"
        }
    }

    /// Relative age of the last sweep, e.g. "12m ago"
    pub fn last_sweep_label(&self, now: DateTime<Utc>) -> String {
        time_ago(self.last_sweep_at, now)
    }
}

/// Coarse relative time: "Never", "Just now", "5m ago", "3h ago", "2d ago".
///
/// Timestamps in the future read "Just now".
pub fn time_ago(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "Never".to_string();
    };

    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}
