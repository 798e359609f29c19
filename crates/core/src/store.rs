//! Local alert state
//!
//! [`AlertStateStore`] is the client-side cache of the backend's alerts and
//! the single source of truth for the unread badge. Every mutation recounts
//! unread records from the snapshot itself, so the counter can never drift
//! from a direct scan.
//!
//! The store never fails: unknown ids are stale references (the local cache
//! may lag the backend) and are ignored. Reconciliation with the backend only
//! happens through [`AlertStateStore::load`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::alert::{AlertId, AlertRecord};

/// Badge shown next to the alerts entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub count: usize,
    /// Hidden when there is nothing unread
    pub visible: bool,
    /// Count as displayed, e.g. "7" or "99+"
    pub label: String,
}

impl Badge {
    /// Build a badge for `count`, collapsing anything above `cap` to "cap+".
    pub fn from_count(count: usize, cap: usize) -> Self {
        let label = if count > cap {
            format!("{}+", cap)
        } else {
            count.to_string()
        };
        Self {
            count,
            visible: count > 0,
            label,
        }
    }
}

/// In-memory alert snapshot plus its unread counter
///
/// # Example
///
/// ```
/// use sentinelx_core::{AlertRecord, AlertStateStore, Severity};
///
/// let mut store = AlertStateStore::new();
/// store.load(vec![AlertRecord::new("1", Severity::High, "new breach")]);
/// assert_eq!(store.unread_count(), 1);
///
/// store.mark_all_read();
/// assert_eq!(store.unread_count(), 0);
/// ```
#[derive(Debug, Default, Clone)]
pub struct AlertStateStore {
    records: Vec<AlertRecord>,
    unread: usize,
}

impl AlertStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot.
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn load(&mut self, records: Vec<AlertRecord>) {
        let mut seen = HashSet::with_capacity(records.len());
        let total = records.len();
        self.records = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();

        if self.records.len() != total {
            tracing::warn!(
                received = total,
                kept = self.records.len(),
                "dropped alerts with duplicate ids"
            );
        }

        self.recount();
    }

    /// Mark one alert read. Returns whether anything changed.
    pub fn mark_read(&mut self, id: &AlertId) -> bool {
        let changed = match self.records.iter_mut().find(|r| &r.id == id) {
            Some(record) if !record.is_read => {
                record.is_read = true;
                true
            }
            Some(_) => false,
            None => {
                tracing::debug!(alert_id = %id, "mark_read on unknown alert ignored");
                false
            }
        };
        self.recount();
        changed
    }

    /// Mark every alert read. Returns whether anything changed.
    pub fn mark_all_read(&mut self) -> bool {
        let mut changed = false;
        for record in self.records.iter_mut().filter(|r| !r.is_read) {
            record.is_read = true;
            changed = true;
        }
        self.recount();
        changed
    }

    /// Remove an alert. Returns whether it was present.
    pub fn delete(&mut self, id: &AlertId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        let removed = self.records.len() != before;
        if !removed {
            tracing::debug!(alert_id = %id, "delete on unknown alert ignored");
        }
        self.recount();
        removed
    }

    /// Number of unread alerts
    pub fn unread_count(&self) -> usize {
        self.unread
    }

    /// Snapshot in backend order
    pub fn records(&self) -> &[AlertRecord] {
        &self.records
    }

    pub fn get(&self, id: &AlertId) -> Option<&AlertRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Badge view of the unread counter
    pub fn badge(&self, cap: usize) -> Badge {
        Badge::from_count(self.unread, cap)
    }

    fn recount(&mut self) {
        self.unread = self.records.iter().filter(|r| !r.is_read).count();
    }
}
