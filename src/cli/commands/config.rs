//! Implementation of the `jira-relay config` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::ConfigOverrides;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config: Config,
    pub placeholder_site: bool,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        let mut text = serde_yaml::to_string(&self.config)
            .unwrap_or_else(|e| format!("# could not render configuration: {e}\n"));
        if self.placeholder_site {
            text.push_str("\n# warning: jira.base_url is still the placeholder site\n");
        }
        text
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: ConfigArgs, json_mode: bool) -> Result<()> {
    let config = args.overrides.resolve()?;
    let result = ConfigOutput {
        placeholder_site: config.jira.is_placeholder(),
        config,
    };
    output(&result, json_mode);
    Ok(())
}
