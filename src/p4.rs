//! Perforce CLI abstraction — enables test doubles for all `p4` commands.

use std::process::Output;

use anyhow::{Context, Result};

use crate::command_runner::{CommandRunner, TokioCommandRunner};

/// Name of the external Helix Core client binary.
pub const P4_BIN: &str = "p4";

/// Abstraction over the `p4` CLI, enabling test doubles.
///
/// The production implementation delegates to the `p4` binary through a
/// [`CommandRunner`]. A failed command is reported through the returned
/// [`Output`]'s exit status; an `Err` means the process could not be run
/// at all.
#[allow(async_fn_in_trait)]
pub trait Perforce {
    /// Run `p4 set <name>=<value>`.
    ///
    /// Writes to the client's persistent registry/config state on the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    async fn set(&self, name: &str, value: &str) -> Result<Output>;

    /// Run `p4 login` with the password piped to stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or stdin cannot
    /// be written.
    async fn login(&self, password: &[u8]) -> Result<Output>;

    /// Run `p4 login -s` (report on the current session ticket).
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    async fn login_status(&self) -> Result<Output>;

    /// Run `p4 logout` (invalidate the session ticket).
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    async fn logout(&self) -> Result<Output>;
}

/// Production implementation — shells out to the `p4` binary.
pub struct P4Cli<R: CommandRunner> {
    runner: R,
}

impl P4Cli<TokioCommandRunner> {
    /// `P4Cli` backed by the default tokio runner and timeout.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> P4Cli<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Perforce for P4Cli<R> {
    async fn set(&self, name: &str, value: &str) -> Result<Output> {
        let assignment = format!("{name}={value}");
        self.runner
            .run(P4_BIN, &["set", &assignment])
            .await
            .with_context(|| format!("failed to run p4 set {name}"))
    }

    async fn login(&self, password: &[u8]) -> Result<Output> {
        self.runner
            .run_with_stdin(P4_BIN, &["login"], password)
            .await
            .context("failed to run p4 login")
    }

    async fn login_status(&self) -> Result<Output> {
        self.runner
            .run(P4_BIN, &["login", "-s"])
            .await
            .context("failed to run p4 login -s")
    }

    async fn logout(&self) -> Result<Output> {
        self.runner
            .run(P4_BIN, &["logout"])
            .await
            .context("failed to run p4 logout")
    }
}
