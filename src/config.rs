//! Run configuration and dependency enumeration
//!
//! This module provides:
//! - `RunConfig`: everything a run needs, built once from CLI arguments
//! - Credential acquisition from the environment or an interactive prompt
//! - Notification destination parsing
//! - Loading the per-dependency TOML configuration file

use crate::cli::CliArgs;
use crate::domain::{Dependency, DependencyOptions};
use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the GitHub password or token
pub const PASSWORD_ENV: &str = "RELEASECHECK_PW";

/// Alternative variable name accepted for older deployments
pub const LEGACY_PASSWORD_ENV: &str = "RELCHECK_PW";

/// GitHub login used for API calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Where notifications are filed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub owner: String,
    pub repo: String,
    /// Comment on this issue instead of opening a new one
    pub issue: Option<u64>,
}

impl Destination {
    /// Parses `owner/repo` or `owner/repo#123`
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDestination {
            value: value.to_string(),
        };

        let (path, issue) = match value.split_once('#') {
            Some((path, number)) => (path, Some(number.parse::<u64>().map_err(|_| invalid())?)),
            None => (value, None),
        };

        let (owner, repo) = path.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            issue,
        })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            Some(issue) => write!(f, "{}/{}#{}", self.owner, self.repo, issue),
            None => write!(f, "{}/{}", self.owner, self.repo),
        }
    }
}

/// Settings shared by every component for the duration of a run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// GitHub username
    pub username: String,
    /// Notification target
    pub destination: Destination,
    /// Directory holding reference files
    pub refdir: PathBuf,
    /// Print notifications instead of posting them
    pub dry_run: bool,
    /// Present for live runs
    pub credentials: Option<Credentials>,
    /// GitHub API base URL
    pub api_url: String,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl RunConfig {
    /// Builds the run configuration, reading the credential from the
    /// environment (or prompting) unless this is a dry run
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        let destination = Destination::parse(&args.notify_repo)?;

        let credentials = if args.dry_run {
            None
        } else {
            let secret = if args.password {
                prompt_password(&args.username)?
            } else {
                password_from_env(|key| std::env::var(key).ok())?
            };
            Some(Credentials::new(&args.username, secret))
        };

        Ok(Self {
            username: args.username.clone(),
            destination,
            refdir: args.refdir.clone(),
            dry_run: args.dry_run,
            credentials,
            api_url: args.api_url.trim_end_matches('/').to_string(),
            timeout: args.timeout,
        })
    }
}

/// Looks up the credential, preferring `RELEASECHECK_PW`
fn password_from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    [PASSWORD_ENV, LEGACY_PASSWORD_ENV]
        .iter()
        .find_map(|key| lookup(key).filter(|v| !v.is_empty()))
        .ok_or_else(|| ConfigError::MissingCredential {
            variable: PASSWORD_ENV.to_string(),
        })
}

fn prompt_password(username: &str) -> Result<String, ConfigError> {
    dialoguer::Password::new()
        .with_prompt(format!("GitHub password for {}", username))
        .interact()
        .map_err(|e| ConfigError::Prompt {
            message: e.to_string(),
        })
}

/// One table of the config file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DependencySection {
    plugin: String,
    url: Option<String>,
    header: Option<String>,
    changelog: Option<String>,
    version_marker: Option<String>,
    soname_marker: Option<String>,
}

impl DependencySection {
    fn options(&self) -> DependencyOptions {
        DependencyOptions {
            url: self.url.clone(),
            header: self.header.clone(),
            changelog: self.changelog.clone(),
            version_marker: self.version_marker.clone(),
            soname_marker: self.soname_marker.clone(),
        }
    }
}

/// Parses dependency definitions from TOML text, preserving table order
pub fn parse_dependencies(content: &str, path: &Path) -> Result<Vec<Dependency>, ConfigError> {
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let table: toml::Table = toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

    let mut dependencies = Vec::with_capacity(table.len());
    for (name, value) in table {
        if !value.is_table() {
            return Err(parse_error(format!(
                "'{}' must be a table with a plugin key",
                name
            )));
        }
        let section: DependencySection = value
            .try_into()
            .map_err(|e| parse_error(format!("[{}]: {}", name, e)))?;
        dependencies.push(
            Dependency::new(name, section.plugin.trim()).with_options(section.options()),
        );
    }

    Ok(dependencies)
}

/// Reads and parses the dependency configuration file
pub fn load_dependencies(path: &Path) -> Result<Vec<Dependency>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dependencies = parse_dependencies(&content, path)?;
    debug!(
        "Loaded {} dependencies from {}",
        dependencies.len(),
        path.display()
    );
    Ok(dependencies)
}
