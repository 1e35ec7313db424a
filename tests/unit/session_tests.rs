//! Orchestration tests for the login session flow.

#![allow(clippy::expect_used)]

use p4auth_cli::error::SetupError;
use p4auth_cli::session::{self, Credentials, Outcome, Password};

use crate::mocks::{ScriptedP4, err_output_with_stdout, ok_output};

// ── configure_connection ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_configure_connection_applies_port_then_user_verbatim() {
    let p4 = ScriptedP4::new(ok_output(b""));

    session::configure_connection(&p4, "127.0.0.1:1666", "alice")
        .await
        .expect("configure");

    let calls = p4.set_calls.lock().expect("lock poisoned");
    assert_eq!(
        *calls,
        vec![
            ("P4PORT".to_string(), "127.0.0.1:1666".to_string()),
            ("P4USER".to_string(), "alice".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_configure_connection_stops_at_first_rejected_setting() {
    let p4 = ScriptedP4::failing_set("P4PORT");

    let err = session::configure_connection(&p4, "127.0.0.1:1666", "alice")
        .await
        .expect_err("P4PORT write must fail");

    // P4USER must never be attempted after P4PORT is rejected.
    let calls = p4.set_calls.lock().expect("lock poisoned");
    assert_eq!(calls.len(), 1);
    assert!(matches!(
        err.downcast_ref::<SetupError>(),
        Some(SetupError::SettingRejected { name, .. }) if name == "P4PORT"
    ));
}

#[tokio::test]
async fn test_configure_connection_reports_partial_application() {
    let p4 = ScriptedP4::failing_set("P4USER");

    let err = session::configure_connection(&p4, "127.0.0.1:1666", "alice")
        .await
        .expect_err("P4USER write must fail");

    let message = err.to_string();
    assert!(message.contains("P4PORT was already applied"), "got: {message}");
    assert!(
        matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::PartiallyApplied { name, applied, .. })
                if name == "P4USER" && applied == "P4PORT"
        ),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_configure_connection_error_carries_client_stderr() {
    let p4 = ScriptedP4::failing_set("P4PORT");

    let err = session::configure_connection(&p4, "127.0.0.1:1666", "alice")
        .await
        .expect_err("must fail");

    assert!(
        err.to_string().contains("registry access denied"),
        "got: {err}"
    );
}

// ── login ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_delivers_password_bytes_on_stdin() {
    let p4 = ScriptedP4::new(ok_output(b"User alice logged in.\n"));
    let credentials = Credentials {
        user: "alice".to_string(),
        password: Password::new("secret".to_string()),
    };

    session::login(&p4, &credentials).await.expect("login");

    let stdin = p4.login_stdin.lock().expect("lock poisoned");
    assert_eq!(stdin.as_deref(), Some(b"secret".as_slice()));
}

#[tokio::test]
async fn test_login_with_empty_password_delivers_empty_stdin() {
    let p4 = ScriptedP4::new(ok_output(b""));
    let credentials = Credentials {
        user: "alice".to_string(),
        password: Password::new(String::new()),
    };

    session::login(&p4, &credentials).await.expect("login");

    let stdin = p4.login_stdin.lock().expect("lock poisoned");
    assert_eq!(stdin.as_deref(), Some(b"".as_slice()));
}

#[tokio::test]
async fn test_rejected_login_is_a_normal_outcome_not_an_error() {
    let p4 = ScriptedP4::new(err_output_with_stdout(b"Password invalid.\n"));
    let credentials = Credentials {
        user: "alice".to_string(),
        password: Password::new("wrong".to_string()),
    };

    let result = session::login(&p4, &credentials).await.expect("login runs");
    assert_eq!(session::classify(&result), Outcome::Failure);
}
