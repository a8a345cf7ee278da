pub mod config;
pub mod credential;
pub mod document;
pub mod operations;
pub mod payloads;
pub mod relay;
pub mod tracker;
pub mod upload;

pub use config::{
    Config, DownloadConfig, JiraConfig, LogFormat, LoggingConfig, RotationPolicy, ServerConfig,
    UploadConfig,
};
pub use credential::Credential;
pub use document::Document;
pub use relay::{RelayBody, RemoteResponse};
pub use tracker::{ServiceDesk, TrackerUser};
pub use upload::StagedUpload;
