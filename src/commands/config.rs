//! `p4auth config` — show and set stored connection settings.

use anyhow::Result;

use clap::Subcommand;

use crate::config::{YamlConfigStore, validate_config_key, validate_config_value};
use crate::output::OutputContext;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be accessed or the
/// key/value is invalid.
pub fn run(ctx: &OutputContext, cmd: ConfigCommand, json: bool) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(ctx, json),
        ConfigCommand::Set { key, value } => set_config(ctx, &key, &value, json),
    }
}

fn show_config(ctx: &OutputContext, json: bool) -> Result<()> {
    let store = YamlConfigStore;
    let config = store.load()?;
    let path = store.path()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "connection": {
                    "address": config.connection.address,
                    "user": config.connection.user,
                },
                "path": path,
            }))?
        );
        return Ok(());
    }

    ctx.header("Configuration");
    ctx.kv(
        "connection.address",
        config.connection.address.as_deref().unwrap_or("(not set)"),
    );
    ctx.kv(
        "connection.user",
        config.connection.user.as_deref().unwrap_or("(not set)"),
    );
    ctx.info(&format!("Config file: {}", path.display()));
    Ok(())
}

fn set_config(ctx: &OutputContext, key: &str, value: &str, json: bool) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;

    let store = YamlConfigStore;
    let mut config = store.load()?;

    match key {
        "connection.address" => config.connection.address = Some(value.to_string()),
        "connection.user" => config.connection.user = Some(value.to_string()),
        _ => anyhow::bail!("Unknown setting: {key}"),
    }

    store.save(&config)?;

    if json {
        println!("{}", serde_json::json!({"key": key, "value": value}));
    } else {
        ctx.success(&format!("Set {key} = {value}"));
    }
    Ok(())
}
