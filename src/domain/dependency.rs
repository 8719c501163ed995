//! Tracked dependency definitions

use std::fmt;

/// Plugin-specific settings attached to a dependency in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOptions {
    /// Download URL for tarball-based checkers
    pub url: Option<String>,
    /// Name of the header file scanned for version markers
    pub header: Option<String>,
    /// Name of the changelog file inside the archive
    pub changelog: Option<String>,
    /// Token preceding the version value in the header
    pub version_marker: Option<String>,
    /// Token preceding the interface identifier in the header
    pub soname_marker: Option<String>,
}

/// An upstream project whose releases are tracked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Identifier, e.g. `owner/repo`
    pub name: String,
    /// Plugin name as written in the config file
    pub plugin: String,
    /// Plugin-specific settings
    pub options: DependencyOptions,
}

impl Dependency {
    /// Creates a new dependency with default options
    pub fn new(name: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugin: plugin.into(),
            options: DependencyOptions::default(),
        }
    }

    /// Sets the plugin options (builder pattern)
    pub fn with_options(mut self, options: DependencyOptions) -> Self {
        self.options = options;
        self
    }

    /// Splits an `owner/repo` identifier
    pub fn owner_repo(&self) -> Option<(&str, &str)> {
        let (owner, repo) = self.name.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some((owner, repo))
    }

    /// Name with path separators flattened, used for reference file names
    pub fn file_stem(&self) -> String {
        self.name.replace('/', "-")
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.plugin)
    }
}
