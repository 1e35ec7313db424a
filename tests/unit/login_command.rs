//! Unit tests for the login command flow, driven through canned doubles.

#![allow(clippy::expect_used)]

use p4auth_cli::commands::login::{self, LoginArgs};
use p4auth_cli::error::SetupError;
use p4auth_cli::output::OutputContext;
use p4auth_cli::session::Outcome;

use crate::mocks::{ScriptedP4, err_output_with_stdout, ok_output};

fn quiet_ctx() -> OutputContext {
    OutputContext::new(true, true)
}

fn args(password: &str) -> LoginArgs {
    LoginArgs {
        port: Some("127.0.0.1:1666".to_string()),
        user: Some("alice".to_string()),
        password: Some(password.to_string()),
    }
}

#[tokio::test]
async fn test_login_success_scenario() {
    let p4 = ScriptedP4::new(ok_output(b"User alice logged in. Login succeeded.\n"));

    let outcome = login::run(&quiet_ctx(), &p4, args("secret"), false)
        .await
        .expect("flow completes");

    assert_eq!(outcome, Outcome::Success);
    let calls = p4.set_calls.lock().expect("lock poisoned");
    assert_eq!(
        *calls,
        vec![
            ("P4PORT".to_string(), "127.0.0.1:1666".to_string()),
            ("P4USER".to_string(), "alice".to_string()),
        ]
    );
    let stdin = p4.login_stdin.lock().expect("lock poisoned");
    assert_eq!(stdin.as_deref(), Some(b"secret".as_slice()));
}

#[tokio::test]
async fn test_login_rejected_password_is_failure_outcome() {
    let p4 = ScriptedP4::new(err_output_with_stdout(b"Password invalid.\n"));

    let outcome = login::run(&quiet_ctx(), &p4, args("wrong"), false)
        .await
        .expect("a rejected password is not an error");

    assert_eq!(outcome, Outcome::Failure);
}

#[tokio::test]
async fn test_login_never_runs_after_failed_configuration() {
    let p4 = ScriptedP4::failing_set("P4PORT");

    let err = login::run(&quiet_ctx(), &p4, args("secret"), false)
        .await
        .expect_err("configuration failure aborts the flow");

    assert!(!p4.login_was_invoked(), "p4 login must not run");
    assert!(err.downcast_ref::<SetupError>().is_some(), "got: {err:?}");
}

#[tokio::test]
async fn test_login_never_runs_after_partial_configuration() {
    let p4 = ScriptedP4::failing_set("P4USER");

    let err = login::run(&quiet_ctx(), &p4, args("secret"), false)
        .await
        .expect_err("partial configuration aborts the flow");

    assert!(!p4.login_was_invoked(), "p4 login must not run");
    assert!(
        err.to_string().contains("partially updated"),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_login_json_mode_reports_success_outcome() {
    let p4 = ScriptedP4::new(ok_output(b"User alice logged in.\n"));

    let outcome = login::run(&quiet_ctx(), &p4, args("secret"), true)
        .await
        .expect("flow completes");

    assert_eq!(outcome, Outcome::Success);
}
