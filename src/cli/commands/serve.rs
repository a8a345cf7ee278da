//! Implementation of the `jira-relay serve` command.

use anyhow::{Context, Result};
use clap::Args;

use super::ConfigOverrides;
use crate::infrastructure::http;
use crate::infrastructure::logging::LoggerImpl;

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = args.overrides.resolve()?;
    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    http::serve(config).await
}
