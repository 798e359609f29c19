// Background monitoring commands

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use sentinelx_core::MonitoringStatus;

use super::{describe, Context};
use crate::output::print_field;

#[derive(Subcommand)]
pub enum MonitoringCommand {
    /// Show whether auto-monitoring is on and when it last ran
    Status,

    /// Turn auto-monitoring on or off
    Toggle {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
}

pub async fn run(command: MonitoringCommand, ctx: &Context) -> Result<()> {
    let status = match command {
        MonitoringCommand::Status => ctx
            .controller
            .monitoring_status()
            .await
            .map_err(|e| describe(e, "fetch monitoring status"))?,
        MonitoringCommand::Toggle { state } => ctx
            .controller
            .toggle_monitoring(state == "on")
            .await
            .map_err(|e| describe(e, "toggle monitoring"))?,
    };

    if ctx.output.is_text() {
        print_status(&status);
        Ok(())
    } else {
        ctx.output.print_value(&status)
    }
}

fn print_status(status: &MonitoringStatus) {
    print_field("Monitoring", status.label());
    print_field("Last sweep", &status.last_sweep_label(Utc::now()));
}
