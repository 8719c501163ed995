//! GitHub issue notifier
//!
//! API endpoints:
//! - {api_url}/repos/{owner}/{repo}/issues (new issue)
//! - {api_url}/repos/{owner}/{repo}/issues/{number}/comments (comment)

use super::{Notification, Notifier};
use crate::config::{Credentials, Destination};
use crate::error::{HttpError, NotifyError};
use crate::http::HttpClient;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct NewIssue<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct NewComment {
    body: String,
}

/// Files notifications as GitHub issues or issue comments
pub struct GitHubIssueNotifier {
    client: HttpClient,
    api_url: String,
    destination: Destination,
    credentials: Option<Credentials>,
}

impl GitHubIssueNotifier {
    /// Create a new notifier
    pub fn new(
        client: HttpClient,
        api_url: &str,
        destination: Destination,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            destination,
            credentials,
        }
    }

    /// Endpoint the notification is posted to
    fn endpoint(&self) -> String {
        let base = format!(
            "{}/repos/{}/{}/issues",
            self.api_url, self.destination.owner, self.destination.repo
        );
        match self.destination.issue {
            Some(number) => format!("{}/{}/comments", base, number),
            None => base,
        }
    }

    fn map_error(&self, error: HttpError) -> NotifyError {
        let destination = self.destination.to_string();
        match error.status() {
            Some(401) | Some(403) => NotifyError::authentication(destination, error.to_string()),
            _ => NotifyError::posting(destination, error.to_string()),
        }
    }
}

#[async_trait]
impl Notifier for GitHubIssueNotifier {
    async fn post(&self, notification: &Notification) -> Result<(), NotifyError> {
        let url = self.endpoint();
        debug!("Posting notification to {}", url);

        let result = match self.destination.issue {
            Some(_) => {
                let comment = NewComment {
                    body: format!("**{}**\n\n{}", notification.title, notification.body),
                };
                self.client
                    .post_github_json(&url, &comment, self.credentials.as_ref())
                    .await
            }
            None => {
                let issue = NewIssue {
                    title: &notification.title,
                    body: &notification.body,
                };
                self.client
                    .post_github_json(&url, &issue, self.credentials.as_ref())
                    .await
            }
        };

        result.map_err(|e| self.map_error(e))?;
        info!("Posted \"{}\" to {}", notification.title, self.destination);
        Ok(())
    }
}
