use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use reqwest::Url;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// File picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "jira-relay.yaml";

/// Prefix for environment overrides; nested keys are joined with `__`
pub const ENV_PREFIX: &str = "JIRA_RELAY_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid base URL: {0}. Must be an http:// or https:// URL with a host")]
    InvalidBaseUrl(String),

    #[error("Invalid {name}: must be greater than zero")]
    ZeroTimeout { name: &'static str },

    #[error("Invalid max_file_bytes: must be greater than zero")]
    ZeroUploadLimit,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Allowed download host cannot be empty")]
    EmptyAllowedHost,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `jira-relay.yaml` in the working directory (optional)
    /// 3. Environment variables (`JIRA_RELAY_*` prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment(Path::new(DEFAULT_CONFIG_FILE))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Self::figment(path)
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        let has_site = Url::parse(config.jira.base_url.trim()).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        });
        if !has_site {
            return Err(ConfigError::InvalidBaseUrl(config.jira.base_url.clone()));
        }

        if config.jira.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                name: "request_timeout_secs",
            });
        }
        if config.jira.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                name: "connect_timeout_secs",
            });
        }

        if config.uploads.max_file_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }

        if config
            .download
            .allowed_hosts
            .iter()
            .any(|host| host.trim().is_empty())
        {
            return Err(ConfigError::EmptyAllowedHost);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
