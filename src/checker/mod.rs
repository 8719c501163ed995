//! Version checkers for fetching upstream release information
//!
//! This module provides:
//! - The `VersionChecker` capability shared by all checker variants
//! - GitHub latest-release checker
//! - cfitsio tarball checker (MD5 short-circuit, header scan, changelog excerpt)
//! - `create_checker`, the registry mapping a dependency's plugin name to a variant

mod cfitsio;
mod github;
pub mod scan;

pub use cfitsio::{CfitsioChecker, CfitsioSettings, CFITSIO_REFERENCE_FIELDS};
pub use github::GitHubReleaseChecker;

use crate::config::RunConfig;
use crate::domain::{CheckerKind, Dependency, VersionSnapshot};
use crate::error::CheckError;
use crate::http::HttpClient;
use crate::reference::ReferenceFormat;
use async_trait::async_trait;
use std::path::Path;

/// Changelog text used when nothing structured is available
pub const NO_CHANGELOG: &str = "No changelog";

/// Trait for version checkers
#[async_trait]
pub trait VersionChecker: Send + Sync {
    /// Get the variant this checker implements
    fn kind(&self) -> CheckerKind;

    /// Layout of the reference file this checker's snapshots are stored in
    fn reference_format(&self) -> ReferenceFormat {
        ReferenceFormat::Yaml
    }

    /// Fetch the current upstream version
    ///
    /// `reference` is the previously persisted snapshot, if any, and
    /// `workdir` a scratch directory private to this dependency.
    async fn fetch_version(
        &self,
        dependency: &Dependency,
        reference: Option<&VersionSnapshot>,
        workdir: &Path,
    ) -> Result<VersionSnapshot, CheckError>;

    /// Describe what changed between two snapshots; never fails
    fn build_changelog(
        &self,
        reference: &VersionSnapshot,
        new: &VersionSnapshot,
        workdir: &Path,
    ) -> String;
}

/// Create the checker responsible for a dependency
pub fn create_checker(
    dependency: &Dependency,
    client: HttpClient,
    config: &RunConfig,
) -> Result<Box<dyn VersionChecker>, CheckError> {
    let kind: CheckerKind = dependency
        .plugin
        .parse()
        .map_err(|message| CheckError::plugin_load(&dependency.name, &dependency.plugin, message))?;

    match kind {
        CheckerKind::GitHub => {
            if dependency.owner_repo().is_none() {
                return Err(CheckError::plugin_load(
                    &dependency.name,
                    &dependency.plugin,
                    "GitHub checker needs a dependency named <owner>/<repo>",
                ));
            }
            Ok(Box::new(GitHubReleaseChecker::new(
                client,
                &config.api_url,
                config.credentials.clone(),
            )))
        }
        CheckerKind::Cfitsio => Ok(Box::new(CfitsioChecker::new(
            client,
            CfitsioSettings::from_options(&dependency.options),
        ))),
    }
}
