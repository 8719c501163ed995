//! Notification delivery
//!
//! This module provides:
//! - `Notification`: title and body announcing a new upstream release
//! - The `Notifier` capability with a GitHub issue variant and a console
//!   variant used for dry runs
//! - `create_notifier`, selecting the variant from the run configuration

mod console;
mod github;

pub use console::{ConsoleNotifier, ConsoleTarget};
pub use github::GitHubIssueNotifier;

use crate::config::RunConfig;
use crate::domain::Dependency;
use crate::error::NotifyError;
use crate::http::HttpClient;
use async_trait::async_trait;

/// Message announcing a new upstream release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    /// Build the standard announcement for a dependency
    pub fn for_release(dependency: &Dependency, changelog: &str) -> Self {
        Self {
            title: format!("Upstream release of dependency: {}", dependency.name),
            body: format!(
                "This is a message from an automated system that monitors `{}` releases.\n\n{}",
                dependency.name, changelog
            ),
        }
    }

    /// Append a paragraph to the body
    pub fn push_paragraph(&mut self, text: &str) {
        self.body.push_str("\n\n");
        self.body.push_str(text);
    }
}

/// Trait for notification sinks
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification
    async fn post(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Create the notifier for this run: console output for dry runs, GitHub
/// issues otherwise
pub fn create_notifier(config: &RunConfig, client: HttpClient) -> Box<dyn Notifier> {
    if config.dry_run {
        return Box::new(ConsoleNotifier::new());
    }
    Box::new(GitHubIssueNotifier::new(
        client,
        &config.api_url,
        config.destination.clone(),
        config.credentials.clone(),
    ))
}
