// Alert management commands

use anyhow::Result;
use clap::Subcommand;
use sentinelx_core::{AlertId, AlertRecord, Badge};
use serde_json::json;

use super::{describe, Context};
use crate::output::{print_field, print_table_header, print_table_row};

#[derive(Subcommand)]
pub enum AlertsCommand {
    /// List all alerts, newest first
    List {
        /// Only show unread alerts
        #[arg(long)]
        unread: bool,
    },

    /// Mark one alert as read
    Read {
        /// Alert ID
        alert_id: String,
    },

    /// Mark every alert as read
    ReadAll,

    /// Delete an alert
    Delete {
        /// Alert ID
        alert_id: String,
    },

    /// Show the unread badge
    Badge {
        /// Ask the backend for its unread count instead of loading the list
        #[arg(long)]
        remote: bool,
    },
}

pub async fn run(command: AlertsCommand, ctx: &Context) -> Result<()> {
    match command {
        AlertsCommand::List { unread } => list(ctx, unread).await,
        AlertsCommand::Read { alert_id } => mark_read(ctx, AlertId::from(alert_id)).await,
        AlertsCommand::ReadAll => mark_all_read(ctx).await,
        AlertsCommand::Delete { alert_id } => delete(ctx, AlertId::from(alert_id)).await,
        AlertsCommand::Badge { remote } => badge(ctx, remote).await,
    }
}

async fn list(ctx: &Context, unread_only: bool) -> Result<()> {
    ctx.controller
        .refresh_alerts()
        .await
        .map_err(|e| describe(e, "load alerts"))?;

    let alerts: Vec<AlertRecord> = ctx
        .controller
        .alerts()
        .into_iter()
        .filter(|a| !unread_only || !a.is_read)
        .collect();

    if !ctx.output.is_text() {
        return ctx.output.print_value(&alerts);
    }

    if alerts.is_empty() {
        println!("No alerts found");
        return Ok(());
    }

    print_table_header(&[
        ("ID", 6),
        ("SEVERITY", 12),
        ("READ", 4),
        ("CREATED", 16),
        ("EMAIL", 24),
        ("MESSAGE", 48),
    ]);

    for alert in &alerts {
        let severity = format!("{} {}", alert.severity.icon(), alert.severity);
        let created = alert.created_at.format("%Y-%m-%d %H:%M").to_string();
        let read = if alert.is_read { "yes" } else { "no" };
        let email = alert.associated_email.as_deref().unwrap_or("-");
        print_table_row(&[
            (alert.id.as_str(), 6),
            (&severity, 12),
            (read, 4),
            (&created, 16),
            (email, 24),
            (&alert.message, 48),
        ]);
    }

    if !ctx.quiet {
        println!();
        print_badge(&ctx.controller.badge());
    }
    Ok(())
}

async fn mark_read(ctx: &Context, alert_id: AlertId) -> Result<()> {
    // Load first so the badge reflects the backend
    ctx.controller
        .refresh_alerts()
        .await
        .map_err(|e| describe(e, "load alerts"))?;
    let badge = ctx
        .controller
        .mark_read(&alert_id)
        .await
        .map_err(|e| describe(e, &format!("mark alert {} read", alert_id)))?;

    report(ctx, &format!("Marked alert {} read", alert_id), &alert_id, "read", &badge)
}

async fn mark_all_read(ctx: &Context) -> Result<()> {
    ctx.controller
        .refresh_alerts()
        .await
        .map_err(|e| describe(e, "load alerts"))?;
    let badge = ctx
        .controller
        .mark_all_read()
        .await
        .map_err(|e| describe(e, "mark all alerts read"))?;

    if ctx.output.is_text() {
        if !ctx.quiet {
            println!("All alerts marked read");
        }
    } else {
        ctx.output
            .print_value(&json!({ "status": "read", "badge": badge }))?;
    }
    Ok(())
}

async fn delete(ctx: &Context, alert_id: AlertId) -> Result<()> {
    ctx.controller
        .refresh_alerts()
        .await
        .map_err(|e| describe(e, "load alerts"))?;
    let badge = ctx
        .controller
        .delete_alert(&alert_id)
        .await
        .map_err(|e| describe(e, &format!("delete alert {}", alert_id)))?;

    report(ctx, &format!("Deleted alert {}", alert_id), &alert_id, "deleted", &badge)
}

async fn badge(ctx: &Context, remote: bool) -> Result<()> {
    let badge = if remote {
        let count = ctx
            .controller
            .remote_unread_count()
            .await
            .map_err(|e| describe(e, "fetch unread count"))?;
        Badge::from_count(count, ctx.controller.config().badge_cap)
    } else {
        ctx.controller
            .refresh_alerts()
            .await
            .map_err(|e| describe(e, "load alerts"))?
    };

    if ctx.output.is_text() {
        print_badge(&badge);
        Ok(())
    } else {
        ctx.output.print_value(&badge)
    }
}

fn report(ctx: &Context, message: &str, alert_id: &AlertId, status: &str, badge: &Badge) -> Result<()> {
    if ctx.output.is_text() {
        if !ctx.quiet {
            println!("{}", message);
            print_badge(badge);
        }
        Ok(())
    } else {
        ctx.output
            .print_value(&json!({ "id": alert_id, "status": status, "badge": badge }))
    }
}

fn print_badge(badge: &Badge) {
    if badge.visible {
        print_field("Unread", &badge.label);
    } else {
        print_field("Unread", "none");
    }
}
