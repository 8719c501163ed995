//! GitHub Releases checker
//!
//! Fetches the latest published release of an `owner/repo` dependency.
//! API endpoint: {api_url}/repos/{owner}/{repo}/releases/latest

use crate::checker::{VersionChecker, NO_CHANGELOG};
use crate::config::Credentials;
use crate::domain::{CheckerKind, Dependency, VersionSnapshot};
use crate::error::{CheckError, HttpError};
use crate::http::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Snapshot field holding the release page URL
const URL_FIELD: &str = "url";

/// Response from the latest-release endpoint
#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

/// Checker backed by GitHub releases
pub struct GitHubReleaseChecker {
    client: HttpClient,
    api_url: String,
    credentials: Option<Credentials>,
}

impl GitHubReleaseChecker {
    /// Create a new checker; credentials, when given, lift API rate limits
    pub fn new(client: HttpClient, api_url: &str, credentials: Option<Credentials>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Build the latest-release URL for a repository
    fn build_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/releases/latest", self.api_url, owner, repo)
    }
}

#[async_trait]
impl VersionChecker for GitHubReleaseChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::GitHub
    }

    async fn fetch_version(
        &self,
        dependency: &Dependency,
        _reference: Option<&VersionSnapshot>,
        _workdir: &Path,
    ) -> Result<VersionSnapshot, CheckError> {
        let (owner, repo) = dependency.owner_repo().ok_or_else(|| {
            CheckError::parse(&dependency.name, "dependency is not named <owner>/<repo>")
        })?;

        let url = self.build_url(owner, repo);
        let release: Release = self
            .client
            .get_github_json(&url, self.credentials.as_ref())
            .await
            .map_err(|e| match e {
                HttpError::Status { status: 404, .. } => {
                    CheckError::upstream(&dependency.name, "no published release found")
                }
                HttpError::Decode { message, .. } => CheckError::parse(&dependency.name, message),
                other => CheckError::upstream(&dependency.name, other.to_string()),
            })?;

        let tag = release
            .tag_name
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CheckError::parse(&dependency.name, "release has no tag_name"))?;
        debug!("Latest release of {} is {}", dependency.name, tag);

        let mut snapshot = VersionSnapshot::new(tag.trim());
        if let Some(html_url) = release.html_url {
            snapshot = snapshot.with_field(URL_FIELD, html_url);
        }
        Ok(snapshot)
    }

    fn build_changelog(
        &self,
        reference: &VersionSnapshot,
        new: &VersionSnapshot,
        _workdir: &Path,
    ) -> String {
        match new.get(URL_FIELD) {
            Some(url) => format!(
                "New release `{}` (previous reference `{}`).\n\n{}",
                new.version(),
                reference.version(),
                url
            ),
            None => NO_CHANGELOG.to_string(),
        }
    }
}
