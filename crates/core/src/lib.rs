// SentinelX alert & risk notification engine
//
// Client-side core of the SentinelX breach-monitoring dashboard: the local
// alert list and its unread badge, risk classification, and the timed toast
// and SMS-style notifications shown when scans find something.
//
// Key design decisions:
// - AlertStateStore and NotificationScheduler are plain synchronous state; only
//   backend calls await
// - The backend sits behind the BackendGateway trait (HTTP or in-memory)
// - Notification timers run off an injected Clock so lifecycles are testable
//   without real time
// - DashboardController owns one store and one scheduler per session; there
//   are no globals

pub mod alert;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod monitoring;
pub mod notification;
pub mod risk;
pub mod store;

// Logging setup
pub mod telemetry;

// Re-exports for convenience
pub use alert::{AlertId, AlertRecord, Severity};
pub use clock::{Clock, ManualClock, TokioClock};
pub use config::{ConfigError, DashboardConfig, NotificationConfig};
pub use controller::{DashboardController, ScanOutcome};
pub use error::{EngineError, Result};
pub use gateway::{
    BackendGateway, GatewayFailure, GatewayResult, HttpGateway, InMemoryGateway, ScanResult,
};
pub use monitoring::{time_ago, MonitoringStatus};
pub use notification::{
    run_until_idle, NotificationKind, NotificationPayload, NotificationScheduler,
    NotificationTask, TaskHandle, TaskState, ToastLevel, Transition,
};
pub use risk::{
    assess_breaches, classify, evaluate, BreachRecord, Classification, ExposureStatus,
    RiskAssessment, RiskStatus, RiskTier,
};
pub use store::{AlertStateStore, Badge};
