//! Issue notifications with a best-effort audit comment.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::people_service::resolve_account;
use crate::domain::error::GatewayError;
use crate::domain::models::operations::{required, NotificationSent, SendNotificationRequest};
use crate::domain::models::payloads::{AccountRef, CommentPayload, NotifyPayload, NotifyRecipients};
use crate::domain::models::Credential;
use crate::domain::ports::TrackerClient;
use crate::infrastructure::logging::scrub;

pub struct NotificationService<C: TrackerClient + ?Sized> {
    client: Arc<C>,
}

impl<C: TrackerClient + ?Sized> NotificationService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Notify the chosen recipients, then record the notification as a comment.
    ///
    /// Emails resolve one at a time in input order. Unresolved emails are
    /// skipped; remote or transport failures while resolving abort the
    /// operation. A failed audit comment is reported as `warning`.
    #[instrument(skip(self, credential, request))]
    pub async fn send(
        &self,
        credential: &Credential,
        request: SendNotificationRequest,
    ) -> Result<NotificationSent, GatewayError> {
        let issue_key = required(request.issue_key, "issueKey")?;
        let subject = required(request.subject, "subject")?;
        let message = required(request.message, "message")?;

        let mut notified_users = Vec::new();
        let mut skipped_emails = Vec::new();
        for email in request.emails {
            let email = email.trim();
            if email.is_empty() {
                continue;
            }
            match resolve_account(self.client.as_ref(), credential, email).await {
                Ok(user) => {
                    if !notified_users.contains(&user.account_id) {
                        notified_users.push(user.account_id);
                    }
                }
                Err(err @ (GatewayError::NotFound(_) | GatewayError::Ambiguous(_))) => {
                    warn!(email = %email, reason = %err, "skipping unresolved recipient");
                    skipped_emails.push(email.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        let recipients = NotifyRecipients {
            reporter: request.notify_reporter,
            assignee: request.notify_assignee,
            users: notified_users
                .iter()
                .map(|id| AccountRef {
                    account_id: id.clone(),
                })
                .collect(),
        };
        let payload = NotifyPayload {
            subject: subject.clone(),
            text_body: message.clone(),
            to: recipients,
        };
        self.client
            .notify(credential, &issue_key, &payload)
            .await?
            .into_success()?;
        info!(issue_key = %issue_key, users = notified_users.len(), "notification sent");

        let warning = self.record_comment(credential, &issue_key, &subject, &message).await;

        Ok(NotificationSent {
            success: true,
            notified_users,
            skipped_emails,
            warning,
        })
    }

    async fn record_comment(
        &self,
        credential: &Credential,
        issue_key: &str,
        subject: &str,
        message: &str,
    ) -> Option<String> {
        let comment = CommentPayload::plain(format!("Notification sent: {subject}\n\n{message}"));
        let outcome = match self.client.add_comment(credential, issue_key, &comment).await {
            Ok(response) => response.into_success().map(|_| ()),
            Err(err) => Err(err),
        };

        outcome.err().map(|err| {
            let body = err.body().to_string();
            warn!(issue_key = %issue_key, error = %scrub(&body), "notification comment not recorded");
            format!("Notification sent but comment could not be added: {err}")
        })
    }
}
