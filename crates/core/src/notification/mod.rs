//! Timed notification widgets
//!
//! Toasts and SMS-style popups are modelled as [`NotificationTask`]s moving
//! through a fixed lifecycle:
//!
//! ```text
//! ┌─────────┐  attach   ┌─────────┐  duration  ┌────────────┐  grace  ┌─────────┐
//! │ Pending │ ────────► │ Visible │ ─────────► │ Dismissing │ ──────► │ Removed │
//! └─────────┘           └─────────┘            └────────────┘         └─────────┘
//!      │                     │                       ▲
//!      └──── cancel ─────────┴───────────────────────┘
//! ```
//!
//! The [`NotificationScheduler`] owns every task and its timer. Tasks never
//! skip the Dismissing step, and a task's timer is disarmed on every
//! transition, so nothing fires after a task is removed.

mod driver;
mod scheduler;

pub use driver::run_until_idle;
pub use scheduler::NotificationScheduler;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Widget family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Short status toast
    Toast,
    /// Simulated SMS delivery popup
    Sms,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toast => write!(f, "toast"),
            Self::Sms => write!(f, "sms"),
        }
    }
}

/// Visual intent of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// What a widget shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    Toast { message: String, level: ToastLevel },
    Sms { email: String, breach_count: u32 },
}

impl NotificationPayload {
    pub fn toast(message: impl Into<String>, level: ToastLevel) -> Self {
        Self::Toast {
            message: message.into(),
            level,
        }
    }

    pub fn sms(email: impl Into<String>, breach_count: u32) -> Self {
        Self::Sms {
            email: email.into(),
            breach_count,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Toast { .. } => NotificationKind::Toast,
            Self::Sms { .. } => NotificationKind::Sms,
        }
    }

    /// Text rendered inside the widget
    pub fn text(&self) -> String {
        match self {
            Self::Toast { message, .. } => message.clone(),
            Self::Sms {
                email,
                breach_count,
            } => format!(
                "Security breach detected for {}. Found in {} new database leak(s).",
                email, breach_count
            ),
        }
    }
}

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Created, not yet attached to a surface
    Pending,
    /// On screen, visible timer armed
    Visible,
    /// Exit animation running, grace timer armed
    Dismissing,
    /// Terminal; all resources released
    Removed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Visible => write!(f, "visible"),
            Self::Dismissing => write!(f, "dismissing"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Handle returned by the scheduler, usable to cancel a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(u64);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

/// A live notification widget
#[derive(Debug, Clone)]
pub struct NotificationTask {
    handle: TaskHandle,
    payload: NotificationPayload,
    created_at: Duration,
    duration: Duration,
    state: TaskState,
}

impl NotificationTask {
    pub fn handle(&self) -> TaskHandle {
        self.handle
    }

    pub fn kind(&self) -> NotificationKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &NotificationPayload {
        &self.payload
    }

    /// Scheduler clock time at creation
    pub fn created_at(&self) -> Duration {
        self.created_at
    }

    /// How long the task stays visible once attached
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn state(&self) -> TaskState {
        self.state
    }
}

/// A single state change, handed to whatever renders the widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub handle: TaskHandle,
    pub payload: NotificationPayload,
    pub from: TaskState,
    pub to: TaskState,
    /// Scheduler clock time of the change
    #[serde(rename = "at_ms", serialize_with = "serialize_millis")]
    pub at: Duration,
}

fn serialize_millis<S>(at: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(at.as_millis() as u64)
}
