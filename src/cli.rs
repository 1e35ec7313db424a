//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::error::{ConfigError, SetupError};
use crate::output::{self, OutputContext};
use crate::p4::P4Cli;
use crate::session::Outcome;

/// Perforce Helix Core login helper
#[derive(Parser)]
#[command(
    name = "p4auth",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply connection settings and log in
    Login(commands::login::LoginArgs),

    /// Invalidate the current session ticket
    Logout,

    /// Show whether a valid session ticket exists
    Status,

    /// Manage stored connection settings
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails. In `--json` mode the error
    /// is rendered as a JSON object instead and the exit code carries the
    /// failure.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
        } = self;
        match Self::dispatch(command, json, quiet, no_color).await {
            Err(e) if json => {
                println!(
                    "{}",
                    output::json::format_error(&format!("{e:#}"), error_code(&e))?
                );
                Ok(ExitCode::FAILURE)
            }
            other => other,
        }
    }

    async fn dispatch(
        command: Command,
        json: bool,
        quiet: bool,
        no_color: bool,
    ) -> Result<ExitCode> {
        let ctx = OutputContext::new(no_color, quiet);
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
            Command::Login(args) => {
                let p4 = P4Cli::default_runner();
                let outcome = commands::login::run(&ctx, &p4, args, json).await?;
                Ok(exit_code(outcome))
            }
            Command::Logout => {
                let p4 = P4Cli::default_runner();
                commands::logout::run(&ctx, &p4, json).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Status => {
                let p4 = P4Cli::default_runner();
                let outcome = commands::status::run(&ctx, &p4, json).await?;
                Ok(exit_code(outcome))
            }
            Command::Config(cmd) => {
                commands::config::run(&ctx, cmd, json)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn exit_code(outcome: Outcome) -> ExitCode {
    match outcome {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Failure => ExitCode::FAILURE,
    }
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if e.downcast_ref::<SetupError>().is_some() {
        "setup_failed"
    } else if e.downcast_ref::<ConfigError>().is_some() {
        "invalid_config"
    } else {
        "error"
    }
}
