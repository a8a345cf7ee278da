//! jira-relay CLI entry point.

use clap::Parser;

use jira_relay::cli::{commands, handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Config(args) => commands::config::execute(args, cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
