//! jira-relay - Forwarding gateway for the Jira Cloud REST API
//!
//! Browser clients cannot call the remote service directly: it enforces
//! cross-site request forgery checks and does not answer CORS preflights.
//! The relay accepts their requests, attaches the caller's credential, issues
//! the corresponding remote calls and relays the outcome.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): configuration, remote models, errors and the tracker port
//! - **Service Layer** (`services`): validation and sequencing of each operation
//! - **Infrastructure Layer** (`infrastructure`): reqwest client, axum router, config and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use jira_relay::{ConfigLoader, infrastructure::http};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     http::serve(config).await
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::error::GatewayError;
pub use domain::models::{Config, Credential, RelayBody, RemoteResponse};
pub use domain::ports::TrackerClient;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::http::{router, AppState};
pub use infrastructure::jira::JiraClient;
