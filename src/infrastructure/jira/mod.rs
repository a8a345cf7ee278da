//! reqwest-backed implementation of the tracker port

pub mod client;

pub use client::JiraClient;

/// Header the remote service checks before accepting uploads from
/// non-browser clients
pub const CSRF_BYPASS_HEADER: &str = "X-Atlassian-Token";
pub const CSRF_BYPASS_VALUE: &str = "no-check";

/// Opt-in header for experimental endpoints
pub const EXPERIMENTAL_API_HEADER: &str = "X-ExperimentalApi";
pub const EXPERIMENTAL_API_VALUE: &str = "opt-in";
