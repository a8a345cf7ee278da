use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the relay
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote issue tracker configuration
    #[serde(default)]
    pub jira: JiraConfig,

    /// Attachment upload limits and staging
    #[serde(default)]
    pub uploads: UploadConfig,

    /// Attachment download restrictions
    #[serde(default)]
    pub download: DownloadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `bind:port` form accepted by `TcpListener::bind`
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Remote issue tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct JiraConfig {
    /// Site root, e.g. `https://acme.atlassian.net`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent sent on every outbound request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Placeholder used when no site has been configured.
pub const PLACEHOLDER_BASE_URL: &str = "https://your-domain.atlassian.net";

fn default_base_url() -> String {
    PLACEHOLDER_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    concat!("jira-relay/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_request_timeout_secs() -> u64 {
    60
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl JiraConfig {
    /// Convenience constructor for a given site, used heavily by tests
    pub fn for_site(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// True while the placeholder site is still configured
    pub fn is_placeholder(&self) -> bool {
        self.base_url.trim_end_matches('/') == PLACEHOLDER_BASE_URL
    }
}

/// Attachment upload configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct UploadConfig {
    /// Largest accepted file, in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Directory for staged uploads; the system temp dir when unset
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

const fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            staging_dir: None,
        }
    }
}

impl UploadConfig {
    /// Resolved staging directory
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Attachment download restrictions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DownloadConfig {
    /// Hosts a download URL may point at. Empty means any host.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

impl DownloadConfig {
    pub fn allows_host(&self, host: &str) -> bool {
        self.allowed_hosts.is_empty()
            || self
                .allowed_hosts
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Enable stdout logging
    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// File rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            enable_stdout: true,
            rotation: RotationPolicy::default(),
        }
    }
}
