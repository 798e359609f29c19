// CLI subcommands

pub mod alerts;
pub mod monitoring;
pub mod risk;
pub mod scan;

use sentinelx_core::{
    run_until_idle, DashboardController, EngineError, NotificationPayload, TaskState, ToastLevel,
    Transition,
};

use crate::output::OutputFormat;

/// Everything a command needs
pub struct Context {
    pub controller: DashboardController,
    pub output: OutputFormat,
    pub quiet: bool,
    pub notifications: bool,
}

impl Context {
    /// Render pending notifications and wait until they are dismissed.
    ///
    /// Notifications are only shown in text mode; otherwise they are dropped.
    pub async fn present_notifications(&self) {
        let scheduler = self.controller.scheduler();

        if !self.notifications || !self.output.is_text() {
            let mut guard = scheduler.lock();
            guard.cancel_all();
            guard.drain_transitions();
            return;
        }

        run_until_idle(&scheduler, render_transition).await;
    }
}

fn render_transition(transition: Transition) {
    if transition.to != TaskState::Visible {
        return;
    }
    println!("{}", notification_line(&transition.payload));
}

/// One-line rendering of a notification widget
pub fn notification_line(payload: &NotificationPayload) -> String {
    let marker = match payload {
        NotificationPayload::Toast { level, .. } => match level {
            ToastLevel::Info => "[i]",
            ToastLevel::Success => "[ok]",
            ToastLevel::Warning => "[!]",
            ToastLevel::Error => "[!!]",
        },
        NotificationPayload::Sms { .. } => "[SMS]",
    };
    format!("{} {}", marker, payload.text())
}

/// Attach a short description of the failed action to a controller error
pub fn describe(err: EngineError, action: &str) -> anyhow::Error {
    anyhow::Error::new(err).context(format!("Failed to {}", action))
}
