//! Router assembly and the listener loop.

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::routing::{any, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};

use super::handlers;
use super::uploads::MULTIPART_OVERHEAD_BYTES;
use crate::domain::models::{Config, UploadConfig};
use crate::domain::ports::TrackerClient;
use crate::infrastructure::jira::JiraClient;
use crate::infrastructure::logging::scrub;
use crate::services::{
    AttachmentService, IssueService, NotificationService, PeopleService, ProxyService,
};

/// Shared, immutable state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyService<dyn TrackerClient>>,
    pub issues: Arc<IssueService<dyn TrackerClient>>,
    pub attachments: Arc<AttachmentService<dyn TrackerClient>>,
    pub people: Arc<PeopleService<dyn TrackerClient>>,
    pub notifications: Arc<NotificationService<dyn TrackerClient>>,
    pub uploads: Arc<UploadConfig>,
}

impl AppState {
    pub fn new(client: Arc<dyn TrackerClient>, config: &Config) -> Self {
        Self {
            proxy: Arc::new(ProxyService::new(Arc::clone(&client))),
            issues: Arc::new(IssueService::new(Arc::clone(&client))),
            attachments: Arc::new(AttachmentService::new(
                Arc::clone(&client),
                config.download.clone(),
            )),
            people: Arc::new(PeopleService::new(Arc::clone(&client))),
            notifications: Arc::new(NotificationService::new(client)),
            uploads: Arc::new(config.uploads.clone()),
        }
    }
}

/// Build the relay router
pub fn router(state: AppState) -> Router {
    let upload_limit = usize::try_from(
        state
            .uploads
            .max_file_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    )
    .unwrap_or(usize::MAX);

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/{*path}", any(handlers::proxy))
        .route("/add-comment", post(handlers::add_comment))
        .route(
            "/add-attachment",
            post(handlers::add_attachment).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/list-attachments", post(handlers::list_attachments))
        .route("/download-attachment", get(handlers::download_attachment))
        .route("/get-issue-reporter", post(handlers::get_issue_reporter))
        .route("/update-issue-reporter", post(handlers::update_issue_reporter))
        .route("/send-notification", post(handlers::send_notification))
        .route("/execute-transition", post(handlers::execute_transition))
        .route("/create-issue", post(handlers::create_issue))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                info_span!(
                    "request",
                    method = %request.method(),
                    uri = %scrub(&request.uri().to_string()),
                )
            }),
        )
        .layer(CorsLayer::permissive())
}

/// Run the relay until Ctrl-C
pub async fn serve(config: Config) -> Result<()> {
    if config.jira.is_placeholder() {
        warn!(
            "jira.base_url is still the placeholder {}; set it in jira-relay.yaml or JIRA_RELAY_JIRA__BASE_URL",
            config.jira.base_url
        );
    }

    let client: Arc<dyn TrackerClient> = Arc::new(
        JiraClient::new(&config.jira).context("Failed to build the remote service client")?,
    );
    let app = router(AppState::new(client, &config));

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(address = %addr, base_url = %config.jira.base_url, "jira-relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("jira-relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
