//! `p4auth logout` — invalidate the current session ticket.

use anyhow::Result;

use crate::output::OutputContext;
use crate::p4::Perforce;
use crate::session;

/// Run the logout command.
///
/// # Errors
///
/// Returns an error if the client cannot be spawned or reports a failure.
pub async fn run(ctx: &OutputContext, p4: &impl Perforce, json: bool) -> Result<()> {
    let output = p4.logout().await?;
    if !output.status.success() {
        anyhow::bail!("logout failed: {}", session::failure_detail(&output));
    }
    if json {
        println!("{}", serde_json::json!({"logged_out": true}));
    } else {
        ctx.success("Logged out");
    }
    Ok(())
}
