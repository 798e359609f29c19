// SentinelX CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Logs go to stderr; command output goes to stdout.
// Design Decision: Notifications are rendered as lines and driven on tokio time
// so a command exits once every toast has run its course.

mod commands;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentinelx_core::telemetry::{init_telemetry, TelemetryConfig};
use sentinelx_core::{DashboardConfig, DashboardController, HttpGateway, TokioClock};

#[derive(Parser)]
#[command(name = "sentinelx")]
#[command(about = "SentinelX CLI - Breach alerts, scans and risk scoring")]
#[command(version)]
pub struct Cli {
    /// API base URL (defaults to SENTINELX_API_URL or http://localhost:5000)
    #[arg(long, env = "SENTINELX_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    /// Do not show toast / SMS notifications
    #[arg(long)]
    pub no_notifications: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage breach alerts
    Alerts {
        #[command(subcommand)]
        command: commands::alerts::AlertsCommand,
    },

    /// Scan a monitored email address for new breaches
    Scan {
        /// Backend id of the monitored address
        email_id: String,

        /// Address shown in notifications
        email: String,
    },

    /// Background monitoring
    Monitoring {
        #[command(subcommand)]
        command: commands::monitoring::MonitoringCommand,
    },

    /// Risk scoring (offline)
    Risk {
        #[command(subcommand)]
        command: commands::risk::RiskCommand,
    },

    /// Show the SMS-style breach popup without contacting the backend
    SimulateSms {
        /// Address the message is about
        email: String,

        /// Number of new leaks
        #[arg(long, short, default_value = "1")]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let telemetry = if cli.quiet {
        TelemetryConfig::from_env().quiet()
    } else {
        TelemetryConfig::from_env()
    };
    init_telemetry(telemetry);
    let output = output::OutputFormat::from_str(&cli.output);

    let command = match cli.command {
        Commands::Risk { command } => return commands::risk::run(command, output, cli.quiet),
        command => command,
    };

    let mut config = DashboardConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    let config = session_config(&command, config);

    let gateway = HttpGateway::from_config(&config).context("Failed to create HTTP client")?;
    let controller = DashboardController::new(Arc::new(gateway), Arc::new(TokioClock::new()), config)
        .context("Invalid configuration")?;
    tracing::debug!(
        session_id = %controller.session_id(),
        api_url = %controller.config().api_url,
        "dashboard ready"
    );

    let ctx = commands::Context {
        controller,
        output,
        quiet: cli.quiet,
        notifications: !cli.no_notifications,
    };

    let result = match command {
        Commands::Alerts { command } => commands::alerts::run(command, &ctx).await,
        Commands::Scan { email_id, email } => commands::scan::run(&ctx, &email_id, &email).await,
        Commands::Monitoring { command } => commands::monitoring::run(command, &ctx).await,
        Commands::Risk { command } => commands::risk::run(command, output, cli.quiet),
        Commands::SimulateSms { email, count } => commands::scan::simulate_sms(&ctx, &email, count),
    };

    // Let notifications raised so far run out, even when the command failed
    ctx.present_notifications().await;
    result
}

/// simulate-sms never reaches the backend, so a bad API URL must not stop it;
/// only the notification settings carry over.
fn session_config(command: &Commands, config: DashboardConfig) -> DashboardConfig {
    match command {
        Commands::SimulateSms { .. } => {
            DashboardConfig::default().with_notifications(config.notifications)
        }
        _ => config,
    }
}
