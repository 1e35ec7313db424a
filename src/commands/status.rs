//! `p4auth status` — report on the current session ticket.

use std::process::Output;

use anyhow::Result;

use crate::output::OutputContext;
use crate::p4::Perforce;
use crate::session::Outcome;

/// Run the status command. `p4 login -s` exits zero when a valid ticket
/// exists and prints its expiry.
///
/// # Errors
///
/// Returns an error if the client cannot be spawned.
pub async fn run(ctx: &OutputContext, p4: &impl Perforce, json: bool) -> Result<Outcome> {
    let output = p4.login_status().await?;
    let outcome = if output.status.success() {
        Outcome::Success
    } else {
        Outcome::Failure
    };
    let detail = ticket_detail(&output, outcome);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "logged_in": outcome == Outcome::Success,
                "detail": detail,
            })
        );
    } else {
        match outcome {
            Outcome::Success => ctx.success(&detail),
            Outcome::Failure => ctx.warn(&detail),
        }
    }
    Ok(outcome)
}

/// Client-reported ticket detail, with a fallback when the client prints
/// nothing usable.
fn ticket_detail(output: &Output, outcome: Outcome) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match outcome {
        Outcome::Success => "Logged in".to_string(),
        Outcome::Failure => "Not logged in".to_string(),
    }
}
