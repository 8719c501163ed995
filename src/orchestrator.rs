//! Release check orchestrator
//!
//! This module provides:
//! - Workflow coordination per dependency: resolve checker → read reference →
//!   fetch → bootstrap or compare → notify and persist
//! - Rollback of the reference when persisting or posting fails
//! - Error isolation: a failing dependency never stops the run

use crate::checker::{create_checker, VersionChecker};
use crate::config::RunConfig;
use crate::domain::{Dependency, DependencyOutcome, DependencyReport, RunReport, VersionSnapshot};
use crate::error::{AppError, CheckError, ReferenceError};
use crate::http::HttpClient;
use crate::notify::{create_notifier, Notification, Notifier};
use crate::progress::Progress;
use crate::reference::{ReferenceFormat, ReferenceStore};
use semver::Version;
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

/// Orchestrator for the release check workflow
pub struct Orchestrator {
    /// Run-wide settings
    config: RunConfig,
    /// Dependencies in config file order
    dependencies: Vec<Dependency>,
    /// HTTP client shared by checkers and the notifier
    client: HttpClient,
    /// Reference files
    store: ReferenceStore,
    /// Notification sink
    notifier: Box<dyn Notifier>,
}

impl Orchestrator {
    /// Create a new orchestrator for the given configuration
    pub fn new(config: RunConfig, dependencies: Vec<Dependency>) -> Result<Self, AppError> {
        let client = HttpClient::with_timeout(config.timeout)
            .map_err(|e| AppError::HttpClient(e.to_string()))?;
        Ok(Self::with_client(config, dependencies, client))
    }

    /// Create an orchestrator with a custom HTTP client
    pub fn with_client(
        config: RunConfig,
        dependencies: Vec<Dependency>,
        client: HttpClient,
    ) -> Self {
        let notifier = create_notifier(&config, client.clone());
        let store = ReferenceStore::new(config.refdir.clone());
        Self {
            config,
            dependencies,
            client,
            store,
            notifier,
        }
    }

    /// Replace the notifier
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the reference store
    #[cfg(test)]
    pub(crate) fn with_store(mut self, store: ReferenceStore) -> Self {
        self.store = store;
        self
    }

    /// Run the check workflow without progress display
    pub async fn run(&self) -> RunReport {
        self.run_with_progress(false).await
    }

    /// Run the check workflow over every dependency, in order
    pub async fn run_with_progress(&self, show_progress: bool) -> RunReport {
        let mut progress = Progress::new(show_progress);
        let mut report = RunReport::new(self.config.dry_run);

        info!(
            "Checking {} dependencies (references in {})",
            self.dependencies.len(),
            self.store.dir().display()
        );

        for dependency in &self.dependencies {
            progress.spinner(&format!("Checking {}...", dependency.name));
            let outcome = match self.process(dependency, &mut progress).await {
                Ok(outcome) => {
                    info!("{}: {}", dependency.name, outcome);
                    outcome
                }
                Err(e) => {
                    warn!("{}", e);
                    DependencyOutcome::failed(e.kind(), e.to_string())
                }
            };
            progress.finish_and_clear();
            report.add(DependencyReport::new(dependency, outcome));
        }

        report
    }

    /// Drive one dependency through its state machine
    async fn process(
        &self,
        dependency: &Dependency,
        progress: &mut Progress,
    ) -> Result<DependencyOutcome, CheckError> {
        let checker = create_checker(dependency, self.client.clone(), &self.config)?;
        let format = checker.reference_format();
        debug!("Using {} checker for {}", checker.kind(), dependency.name);

        let reference = if self.store.exists(dependency) {
            Some(
                self.store
                    .read(dependency, format)
                    .map_err(CheckError::Reference)?,
            )
        } else {
            None
        };

        let workdir = TempDir::new().map_err(|source| CheckError::Workdir {
            dependency: dependency.name.clone(),
            source,
        })?;
        debug!("Working directory for {}: {}", dependency.name, workdir.path().display());

        progress.set_message(&format!("Fetching {}...", dependency.name));
        let snapshot = checker
            .fetch_version(dependency, reference.as_ref(), workdir.path())
            .await?;

        let Some(reference) = reference else {
            info!("No reference for {}, bootstrapping", dependency.name);
            self.persist(dependency, &snapshot, format)?;
            return Ok(DependencyOutcome::Bootstrapped {
                version: snapshot.version().to_string(),
            });
        };

        if reference.same_version(&snapshot) {
            return Ok(DependencyOutcome::Unchanged {
                version: snapshot.version().to_string(),
            });
        }

        info!(
            "New release of {}: {} -> {}",
            dependency.name,
            reference.version(),
            snapshot.version()
        );
        self.notify(
            dependency,
            checker.as_ref(),
            &reference,
            &snapshot,
            workdir.path(),
            progress,
        )
        .await
    }

    /// Persist the new reference and post the notification, rolling the
    /// reference back if either step fails
    async fn notify(
        &self,
        dependency: &Dependency,
        checker: &dyn VersionChecker,
        reference: &VersionSnapshot,
        snapshot: &VersionSnapshot,
        workdir: &std::path::Path,
        progress: &mut Progress,
    ) -> Result<DependencyOutcome, CheckError> {
        let changelog = checker.build_changelog(reference, snapshot, workdir);
        let mut notification = Notification::for_release(dependency, &changelog);

        let regression = is_regression(reference.version(), snapshot.version());
        if regression {
            warn!(
                "{}: new version {} sorts below reference {}",
                dependency.name,
                snapshot.version(),
                reference.version()
            );
            notification.push_paragraph(&format!(
                "NOTE: version `{}` sorts below the previous reference `{}`.",
                snapshot.version(),
                reference.version()
            ));
        }

        if let Err(e) = self.persist(dependency, snapshot, checker.reference_format()) {
            if let CheckError::ReferenceWrite {
                source: ReferenceError::Write { .. },
                ..
            } = &e
            {
                self.rollback(dependency);
            }
            return Err(e);
        }

        progress.finish_and_clear();
        if let Err(source) = self.notifier.post(&notification).await {
            self.rollback(dependency);
            return Err(CheckError::Posting {
                dependency: dependency.name.clone(),
                source,
            });
        }

        Ok(DependencyOutcome::Notified {
            from: reference.version().to_string(),
            to: snapshot.version().to_string(),
            regression,
        })
    }

    fn persist(
        &self,
        dependency: &Dependency,
        snapshot: &VersionSnapshot,
        format: ReferenceFormat,
    ) -> Result<(), CheckError> {
        self.store
            .write(dependency, snapshot, format)
            .map(|_| ())
            .map_err(|source| CheckError::ReferenceWrite {
                dependency: dependency.name.clone(),
                source,
            })
    }

    fn rollback(&self, dependency: &Dependency) {
        if let Err(e) = self.store.restore_backup(dependency) {
            error!("Rollback failed for {}: {}", dependency.name, e);
        }
    }
}

/// Parse a version leniently as semver: a leading `v` is ignored and missing
/// minor/patch components are padded with zeros
fn parse_semver(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let v = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    let split = v.find(['-', '+']).unwrap_or(v.len());
    let (core, suffix) = v.split_at(split);

    let mut core = core.to_string();
    for _ in core.matches('.').count()..2 {
        core.push_str(".0");
    }
    Version::parse(&format!("{}{}", core, suffix)).ok()
}

/// True when both versions are semver and the new one is lower
fn is_regression(old: &str, new: &str) -> bool {
    match (parse_semver(old), parse_semver(new)) {
        (Some(old), Some(new)) => new < old,
        _ => false,
    }
}
