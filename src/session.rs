//! Login orchestration: apply connection settings, authenticate, classify.
//!
//! The flow is a fixed linear sequence — configure `P4PORT` and `P4USER`,
//! run `p4 login` with the password on stdin, then classify the captured
//! output. A rejected password is a normal [`Outcome::Failure`], not an
//! error; only a configuration or spawn failure aborts the flow.

use std::process::Output;

use anyhow::Result;

use crate::error::SetupError;
use crate::p4::Perforce;

/// Wording the client prints on a successful login. Only consulted as a
/// fallback when the exit status is non-zero (broker/proxy chains are known
/// to mangle exit codes); the exit status is the primary signal.
pub const LOGIN_SUCCEEDED_MARKER: &str = "Login succeeded";

// ── Types ─────────────────────────────────────────────────────────────────────

/// A password or ticket value. Redacts itself in `Debug` output so it
/// cannot leak through error chains or debug logs.
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Raw bytes to deliver on the client's stdin. May be empty — some
    /// server configurations accept an empty password.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Username plus password for one login attempt.
#[derive(Debug)]
pub struct Credentials {
    pub user: String,
    pub password: Password,
}

/// Result of classifying a completed `p4 login` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

// ── Operations ────────────────────────────────────────────────────────────────

/// Apply `P4PORT` and `P4USER` through the external client, in that order.
///
/// Each write is verified before the next; `p4 login` must never run after
/// a failed write. The client persists these values outside this process,
/// so a failure of the second write leaves the host half-updated — that
/// case is reported as [`SetupError::PartiallyApplied`].
///
/// # Errors
///
/// Returns an error if either `p4 set` cannot be spawned or exits non-zero.
pub async fn configure_connection(p4: &impl Perforce, address: &str, user: &str) -> Result<()> {
    apply_setting(p4, "P4PORT", address, None).await?;
    apply_setting(p4, "P4USER", user, Some("P4PORT")).await?;
    Ok(())
}

async fn apply_setting(
    p4: &impl Perforce,
    name: &str,
    value: &str,
    applied: Option<&str>,
) -> Result<()> {
    let output = p4.set(name, value).await?;
    if output.status.success() {
        return Ok(());
    }
    let detail = failure_detail(&output);
    Err(match applied {
        None => SetupError::SettingRejected {
            name: name.to_string(),
            detail,
        },
        Some(prev) => SetupError::PartiallyApplied {
            name: name.to_string(),
            applied: prev.to_string(),
            detail,
        },
    }
    .into())
}

/// Run `p4 login`, delivering the password over stdin and capturing the
/// client's output. The exit status is not interpreted here — pass the
/// result to [`classify`].
///
/// # Errors
///
/// Returns an error only if the client cannot be spawned or written to.
pub async fn login(p4: &impl Perforce, credentials: &Credentials) -> Result<Output> {
    p4.login(credentials.password.as_bytes()).await
}

/// Classify a completed login invocation.
///
/// A zero exit status is a success regardless of wording. The
/// [`LOGIN_SUCCEEDED_MARKER`] substring is a last-resort fallback for
/// setups where an intermediary rewrites the exit code but passes the
/// client's own message through.
#[must_use]
pub fn classify(result: &Output) -> Outcome {
    if result.status.success() {
        return Outcome::Success;
    }
    if String::from_utf8_lossy(&result.stdout).contains(LOGIN_SUCCEEDED_MARKER) {
        return Outcome::Success;
    }
    Outcome::Failure
}

/// Best human-readable detail from a failed invocation: stderr, then
/// stdout, then the bare exit status.
pub(crate) fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    format!("exit status {}", output.status)
}

// ── Unit tests ────────────────────────────────────────────────────────────────
