//! Typed error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. A failed login is not an error —
//! it is the `Failure` variant of [`crate::session::Outcome`].

use thiserror::Error;

// ── Connection setup errors ───────────────────────────────────────────────────

/// Errors raised while applying connection settings before login.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A `p4 set` invocation exited non-zero before anything took effect.
    #[error("could not set {name}: {detail}")]
    SettingRejected { name: String, detail: String },

    /// A later `p4 set` failed after an earlier one succeeded. The client
    /// offers no transactional API, so the settings are left half-updated.
    #[error(
        "could not set {name}: {detail}\n{applied} was already applied; connection settings are partially updated"
    )]
    PartiallyApplied {
        name: String,
        applied: String,
        detail: String,
    },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
