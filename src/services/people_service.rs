//! Account lookup by email and the two-step reporter update.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::error::GatewayError;
use crate::domain::models::operations::{
    required, IssueKeyRequest, IssuePeople, ReporterUpdated, UpdateReporterRequest,
};
use crate::domain::models::{Credential, TrackerUser};
use crate::domain::ports::TrackerClient;

/// Resolve `email` to exactly one account.
///
/// Zero matches is [`GatewayError::NotFound`]. Several matches resolve only
/// when exactly one of them carries that email address (case-insensitive);
/// otherwise the result is [`GatewayError::Ambiguous`].
pub async fn resolve_account<C>(
    client: &C,
    credential: &Credential,
    email: &str,
) -> Result<TrackerUser, GatewayError>
where
    C: TrackerClient + ?Sized,
{
    let mut matches = client.search_users(credential, email).await?;

    match matches.len() {
        0 => Err(GatewayError::NotFound(format!("No user found for email: {email}"))),
        1 => Ok(matches.remove(0)),
        count => {
            let mut exact = matches.into_iter().filter(|user| {
                user.email_address
                    .as_deref()
                    .is_some_and(|address| address.eq_ignore_ascii_case(email))
            });
            match (exact.next(), exact.next()) {
                (Some(user), None) => Ok(user),
                _ => Err(GatewayError::Ambiguous(format!(
                    "{count} users match email: {email}"
                ))),
            }
        }
    }
}

pub struct PeopleService<C: TrackerClient + ?Sized> {
    client: Arc<C>,
}

impl<C: TrackerClient + ?Sized> PeopleService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Reporter, assignee, creator and summary of one issue
    #[instrument(skip(self, credential, request))]
    pub async fn issue_people(
        &self,
        credential: &Credential,
        request: IssueKeyRequest,
    ) -> Result<IssuePeople, GatewayError> {
        let issue_key = required(request.issue_key, "issueKey")?;
        let fields = self.client.issue_people(credential, &issue_key).await?;

        Ok(IssuePeople {
            issue_key,
            summary: fields.summary,
            reporter: fields.reporter,
            assignee: fields.assignee,
            creator: fields.creator,
        })
    }

    /// Resolve the email, then set the issue's reporter to that account.
    #[instrument(skip(self, credential, request))]
    pub async fn update_reporter(
        &self,
        credential: &Credential,
        request: UpdateReporterRequest,
    ) -> Result<ReporterUpdated, GatewayError> {
        let issue_key = required(request.issue_key, "issueKey")?;
        let email = required(request.email, "email")?;

        let account = resolve_account(self.client.as_ref(), credential, &email).await?;
        self.client
            .set_reporter(credential, &issue_key, &account.account_id)
            .await?
            .into_success()?;

        info!(issue_key = %issue_key, account_id = %account.account_id, "reporter updated");
        Ok(ReporterUpdated {
            success: true,
            issue_key,
            account_id: account.account_id,
        })
    }
}
