//! CLI command implementations.

pub mod config;
pub mod serve;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Flags shared by commands that resolve the configuration
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Configuration file (defaults to ./jira-relay.yaml when present)
    #[arg(short, long, env = "JIRA_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Remote site root, e.g. https://acme.atlassian.net
    #[arg(long)]
    pub base_url: Option<String>,
}

impl ConfigOverrides {
    /// Load the layered configuration, apply command-line flags, then validate.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };

        if let Some(bind) = &self.bind {
            config.server.bind.clone_from(bind);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(base_url) = &self.base_url {
            config.jira.base_url = base_url.trim_end_matches('/').to_string();
        }

        ConfigLoader::validate(&config)?;
        Ok(config)
    }
}
