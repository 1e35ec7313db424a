//! Stored connection settings: schema, validators, and the YAML store.
//!
//! Only the server address and username are persisted. The password is
//! deliberately not part of this schema — it comes from the environment or
//! an interactive prompt at login time.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &["connection.address", "connection.user"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.p4auth/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct P4AuthConfig {
    /// Connection settings applied before login.
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Connection settings for the remote Helix Core service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Server address, e.g. `127.0.0.1:1666` or `ssl:perforce.example.com:1666`.
    pub address: Option<String>,
    /// Username to authenticate as.
    pub user: Option<String>,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// Both settings are passed verbatim to `p4 set`, so the only local rule
/// is that they are non-empty and contain no whitespace.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: "a non-empty value without whitespace".to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Store ────────────────────────────────────────────────────────────────────

/// YAML-file-backed configuration store.
pub struct YamlConfigStore;

impl YamlConfigStore {
    /// Load the configuration, returning defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<P4AuthConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(P4AuthConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Persist the configuration, restricting file permissions on Unix.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be
    /// written.
    pub fn save(&self, config: &P4AuthConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    /// Path to the config file. `P4AUTH_CONFIG` overrides the default
    /// `~/.p4auth/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("P4AUTH_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".p4auth").join("config.yaml"))
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
