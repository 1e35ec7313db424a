//! `p4auth login` — apply connection settings, authenticate, report.

use std::process::Output;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::YamlConfigStore;
use crate::output::{OutputContext, progress};
use crate::p4::Perforce;
use crate::session::{self, Credentials, Outcome, Password};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Server address (host:port); overrides the stored connection.address
    #[arg(long, value_name = "HOST:PORT")]
    pub port: Option<String>,

    /// Username; overrides the stored connection.user
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,

    /// Password or ticket value. Prefer the environment variable or the
    /// interactive prompt over passing this on the command line.
    #[arg(long, env = "P4AUTH_PASSWORD", hide_env_values = true, value_name = "VALUE")]
    pub password: Option<String>,
}

/// Run the login command.
///
/// A rejected password yields `Ok(Outcome::Failure)`; `Err` is reserved
/// for configuration and spawn failures.
///
/// # Errors
///
/// Returns an error if no address/username is available, a `p4 set` step
/// fails, or the client cannot be spawned.
pub async fn run(
    ctx: &OutputContext,
    p4: &impl Perforce,
    args: LoginArgs,
    json: bool,
) -> Result<Outcome> {
    let config = YamlConfigStore.load()?;
    let address = args.port.or(config.connection.address).context(
        "no server address configured; run: p4auth config set connection.address <host:port>",
    )?;
    let user = args
        .user
        .or(config.connection.user)
        .context("no username configured; run: p4auth config set connection.user <name>")?;

    // Resolve the password before touching the client's persistent state,
    // so an aborted prompt leaves the host untouched.
    let password = resolve_password(ctx, args.password, &user)?;
    let credentials = Credentials { user, password };

    let show_progress = !json && ctx.show_progress();

    let pb = show_progress.then(|| progress::spinner("Applying connection settings"));
    match session::configure_connection(p4, &address, &credentials.user).await {
        Ok(()) => {
            if let Some(pb) = &pb {
                progress::finish_ok(pb, "Connection settings applied");
            }
        }
        Err(e) => {
            if let Some(pb) = &pb {
                progress::finish_fail(pb, "Connection settings not applied");
            }
            return Err(e);
        }
    }

    let pb = show_progress
        .then(|| progress::spinner(&format!("Logging in to {address} as {}", credentials.user)));
    let result = match session::login(p4, &credentials).await {
        Ok(result) => {
            if let Some(pb) = &pb {
                pb.finish_and_clear();
            }
            result
        }
        Err(e) => {
            if let Some(pb) = &pb {
                progress::finish_fail(pb, "Login did not complete");
            }
            return Err(e);
        }
    };

    let outcome = session::classify(&result);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json_payload(outcome, &credentials.user, &result))
                .context("JSON serialization failed")?
        );
    } else {
        match outcome {
            Outcome::Success => {
                if !ctx.quiet {
                    println!("  {}", success_line(&credentials.user));
                }
            }
            Outcome::Failure => {
                ctx.error("Login failed");
                for line in raw_output_lines(&result) {
                    eprintln!("    {line}");
                }
            }
        }
    }
    Ok(outcome)
}

/// Resolve the password: `--password` / `P4AUTH_PASSWORD`, then an
/// interactive hidden prompt when attached to a terminal.
fn resolve_password(ctx: &OutputContext, flag: Option<String>, user: &str) -> Result<Password> {
    if let Some(value) = flag {
        return Ok(Password::new(value));
    }
    if ctx.is_tty {
        let value = dialoguer::Password::new()
            .with_prompt(format!("Password for {user}"))
            .allow_empty_password(true)
            .interact()?;
        return Ok(Password::new(value));
    }
    anyhow::bail!("no password available; set P4AUTH_PASSWORD or run from a terminal")
}

/// Final human status line for a successful login.
fn success_line(user: &str) -> String {
    format!("✅ Login succeeded for {user}")
}

/// Raw client output lines echoed in the failure report for diagnosis.
fn raw_output_lines(result: &Output) -> Vec<String> {
    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    let stderr = String::from_utf8_lossy(&result.stderr).to_string();
    stdout
        .lines()
        .chain(stderr.lines())
        .filter(|line| !line.trim().is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Machine-readable result object for `--json` mode. Never includes the
/// password.
fn json_payload(outcome: Outcome, user: &str, result: &Output) -> serde_json::Value {
    match outcome {
        Outcome::Success => serde_json::json!({
            "outcome": "success",
            "user": user,
        }),
        Outcome::Failure => serde_json::json!({
            "outcome": "failure",
            "user": user,
            "stdout": String::from_utf8_lossy(&result.stdout),
            "stderr": String::from_utf8_lossy(&result.stderr),
        }),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
