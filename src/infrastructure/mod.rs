//! Infrastructure layer: remote client, HTTP surface, configuration and logging

pub mod config;
pub mod http;
pub mod jira;
pub mod logging;
