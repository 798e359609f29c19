// Offline risk scoring commands

use anyhow::{Context as _, Result};
use clap::Subcommand;
use sentinelx_core::{assess_breaches, evaluate, BreachRecord, RiskStatus};

use crate::output::{print_field, OutputFormat};

#[derive(Subcommand)]
pub enum RiskCommand {
    /// Classify a status/score pair into a display tier
    Classify {
        /// Address status
        #[arg(long, value_parser = ["safe", "active"])]
        status: String,

        /// Risk score (0-100; out-of-range values are clamped)
        #[arg(long, allow_negative_numbers = true)]
        score: f64,
    },

    /// Score a breach history from a JSON or YAML file
    Assess {
        /// File holding a list of breach records
        #[arg(short, long)]
        file: String,
    },
}

/// Runs without a dashboard session; nothing here reaches the backend.
pub fn run(command: RiskCommand, output: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        RiskCommand::Classify { status, score } => classify(output, quiet, &status, score),
        RiskCommand::Assess { file } => assess(output, quiet, &file),
    }
}

fn classify(output: OutputFormat, quiet: bool, status: &str, score: f64) -> Result<()> {
    let status: RiskStatus = status.parse()?;
    let classification = evaluate(status, score);

    if !output.is_text() {
        return output.print_value(&classification);
    }

    if quiet {
        println!("{}", classification.tier);
        return Ok(());
    }
    print_field("Tier", &classification.tier.to_string());
    print_field("Score", &format!("{:.1}", classification.score));
    if classification.clamped {
        println!("(score {} was outside 0-100 and has been clamped)", score);
    }
    Ok(())
}

fn assess(output: OutputFormat, quiet: bool, path: &str) -> Result<()> {
    let breaches = load_breaches(path)?;
    let assessment = assess_breaches(&breaches);

    if !output.is_text() {
        return output.print_value(&assessment);
    }

    if quiet {
        println!("{}", assessment.status);
        return Ok(());
    }
    print_field("Breaches", &breaches.len().to_string());
    print_field("Score", &format!("{:.0}", assessment.score));
    print_field("Status", &assessment.status.to_string());
    Ok(())
}

fn load_breaches(path: &str) -> Result<Vec<BreachRecord>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;
    parse_breaches(path, &content)
}

/// Detect format by extension, falling back to YAML then JSON
fn parse_breaches(path: &str, content: &str) -> Result<Vec<BreachRecord>> {
    if path.ends_with(".json") {
        serde_json::from_str(content).with_context(|| format!("Failed to parse JSON: {}", path))
    } else if path.ends_with(".yaml") || path.ends_with(".yml") {
        serde_yaml::from_str(content).with_context(|| format!("Failed to parse YAML: {}", path))
    } else {
        serde_yaml::from_str(content)
            .or_else(|_| serde_json::from_str(content))
            .with_context(|| format!("Failed to parse file (tried YAML and JSON): {}", path))
    }
}
