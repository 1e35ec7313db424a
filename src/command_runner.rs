//! Generic command execution with timeout and guaranteed process kill.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;

/// Default timeout for external client invocations. `p4 set` is local and
/// fast; `p4 login` talks to the server and may wait on the network.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Abstracts process execution so the production implementation can be
/// swapped for canned results in tests without spawning processes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a command and capture its output, bounded by the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// timeout. On timeout, the child process is killed (not left orphaned).
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a command with stdin piped from `input`, capturing output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// timeout.
    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output>;
}

/// Production `CommandRunner` — uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT kill
/// the child process when the timeout fires — the future is dropped but the
/// OS process keeps running. This implementation uses `tokio::select!` with
/// explicit `child.kill()` to guarantee the process is terminated.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let child = tokio::process::Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        wait_capture(child, program, self.timeout).await
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        // Write stdin from a spawned task so a child that fills its output
        // pipes before draining stdin cannot deadlock against our reads.
        let stdin_handle = child.stdin.take();
        let input_owned = input.to_vec();
        let stdin_task = tokio::spawn(async move {
            if let Some(mut stdin) = stdin_handle {
                use tokio::io::AsyncWriteExt;
                let _ = stdin.write_all(&input_owned).await;
            }
        });

        let output = wait_capture(child, program, self.timeout).await;
        let _ = stdin_task.await;
        output
    }
}

/// Wait for the child while draining both output pipes, killing it if the
/// timeout fires first.
///
/// The pipes are read CONCURRENTLY with `wait()`. If the child writes more
/// than the OS pipe buffer (64KB Linux, 4KB some Windows configs), it
/// blocks on write; waiting first would never resolve — deadlock.
async fn wait_capture(mut child: Child, program: &str, timeout: Duration) -> Result<Output> {
    let mut stdout_handle = child.stdout.take();
    let mut stderr_handle = child.stderr.take();

    tokio::select! {
        result = async {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                read_to_end(&mut stdout_handle),
                read_to_end(&mut stderr_handle),
            );
            Ok(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        } => result,
        () = tokio::time::sleep(timeout) => {
            let _ = child.kill().await;
            anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
        }
    }
}

async fn read_to_end(handle: &mut Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}
