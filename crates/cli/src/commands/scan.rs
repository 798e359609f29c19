// Breach scan and SMS simulation

use anyhow::Result;
use serde_json::json;

use super::{describe, Context};
use crate::output::print_field;

pub async fn run(ctx: &Context, email_id: &str, email: &str) -> Result<()> {
    let outcome = ctx
        .controller
        .check_email(email_id, email)
        .await
        .map_err(|e| describe(e, &format!("scan {}", email)))?;

    if !ctx.output.is_text() {
        return ctx.output.print_value(&json!({
            "email_id": email_id,
            "email": email,
            "breaches_found": outcome.breaches_found,
            "sms_sent": outcome.sms.is_some(),
            "badge": outcome.badge,
        }));
    }

    if ctx.quiet {
        println!("{}", outcome.breaches_found);
    } else {
        print_field("Email", email);
        print_field("Breaches", &outcome.breaches_found.to_string());
        print_field("Unread", &outcome.badge.label);
    }
    Ok(())
}

pub fn simulate_sms(ctx: &Context, email: &str, count: u32) -> Result<()> {
    let handle = ctx.controller.simulate_sms(email, count);

    if !ctx.output.is_text() {
        return ctx
            .output
            .print_value(&json!({ "email": email, "count": count, "shown": handle.is_some() }));
    }

    if handle.is_none() && !ctx.quiet {
        println!("No new leaks; nothing to send");
    }
    Ok(())
}
