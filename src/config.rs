//! Configuration loading with layered overrides.
//!
//! Config is loaded in order (each layer overrides the previous):
//! 1. Default values
//! 2. Config file (TOML)
//! 3. Environment variables
//! 4. Explicit overrides (typically CLI arguments)

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Dispatcher configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispatch: Dispatch,
}

/// When the global `can_read` hook fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalRead {
    /// `can_read` on safe methods, `can_write` on unsafe ones.
    #[default]
    SafeOnly,
    /// `can_read` on every request, plus `can_write` on unsafe ones.
    Always,
}

impl FromStr for GlobalRead {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe-only" | "safe_only" => Ok(GlobalRead::SafeOnly),
            "always" => Ok(GlobalRead::Always),
            other => Err(Error::Config(format!(
                "Unknown global read mode \"{other}\", expected \"safe-only\" or \"always\""
            ))),
        }
    }
}

impl fmt::Display for GlobalRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalRead::SafeOnly => f.write_str("safe-only"),
            GlobalRead::Always => f.write_str("always"),
        }
    }
}

/// Hook dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatch {
    #[serde(default)]
    pub global_read: GlobalRead,

    /// Re-run the create/update object hooks after serializer validation.
    #[serde(default = "default_recheck_after_validation")]
    pub recheck_after_validation: bool,
}

impl Default for Dispatch {
    fn default() -> Self {
        Self {
            global_read: GlobalRead::default(),
            recheck_after_validation: default_recheck_after_validation(),
        }
    }
}

fn default_recheck_after_validation() -> bool {
    true
}

/// Builder for loading configuration with customizable options.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix (e.g., "MYAPP" -> MYAPP_GLOBAL_READ)
    pub env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            env_prefix: "WARRANT".to_string(),
        }
    }
}

impl ConfigLoader {
    /// Create a new config loader with the given environment prefix.
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into(),
        }
    }

    /// Load configuration from file, environment, and explicit overrides.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to TOML config file
    /// * `cli_global_read` - Override for the global read mode
    pub fn load(
        &self,
        config_path: Option<&Path>,
        cli_global_read: Option<GlobalRead>,
    ) -> crate::Result<Config> {
        let mut config: Config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?
        } else {
            Config::default()
        };

        let prefix = &self.env_prefix;

        if let Ok(mode) = std::env::var(format!("{prefix}_GLOBAL_READ")) {
            config.dispatch.global_read = mode.parse()?;
        }
        if let Ok(flag) = std::env::var(format!("{prefix}_RECHECK_AFTER_VALIDATION")) {
            config.dispatch.recheck_after_validation = flag.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{prefix}_RECHECK_AFTER_VALIDATION must be true or false, got \"{flag}\""
                ))
            })?;
        }

        if let Some(mode) = cli_global_read {
            config.dispatch.global_read = mode;
        }

        tracing::debug!(
            global_read = %config.dispatch.global_read,
            recheck = config.dispatch.recheck_after_validation,
            "loaded dispatch config"
        );

        Ok(config)
    }
}
