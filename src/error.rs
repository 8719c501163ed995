//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: fatal problems detected before any dependency is processed
//! - CheckError: failures scoped to a single dependency
//! - ReferenceError: reference file read/write/backup failures
//! - NotifyError: issue posting failures
//! - HttpError: transport-level failures shared by checkers and notifiers

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Per-dependency check errors
    #[error(transparent)]
    Check(#[from] CheckError),

    /// HTTP client construction errors
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),
}

/// Errors that abort the whole run before any dependency is processed
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has an unexpected shape
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// No credential available for a live run
    #[error(
        "environment variable {variable} not defined; store the GitHub password or token \
         in that variable or run with `-p` to prompt for it interactively"
    )]
    MissingCredential { variable: String },

    /// Notification destination is not `owner/repo` or `owner/repo#N`
    #[error(
        "invalid notification destination '{value}': \
         expected <owner>/<repo> or <owner>/<repo>#<issue>"
    )]
    InvalidDestination { value: String },

    /// Interactive prompt failed
    #[error("failed to read password: {message}")]
    Prompt { message: String },
}

/// Errors that fail a single dependency without aborting the run
#[derive(Error, Debug)]
pub enum CheckError {
    /// No checker exists for the configured plugin name
    #[error("cannot load plugin '{plugin}' for {dependency}: {message}")]
    PluginLoad {
        dependency: String,
        plugin: String,
        message: String,
    },

    /// The upstream resource could not be retrieved
    #[error("upstream unavailable for {dependency}: {message}")]
    UpstreamUnavailable { dependency: String, message: String },

    /// Expected fields were not found in the fetched artifact
    #[error("failed to parse upstream data for {dependency}: {message}")]
    Parse { dependency: String, message: String },

    /// Scratch directory for the dependency could not be created
    #[error("failed to create working directory for {dependency}: {source}")]
    Workdir {
        dependency: String,
        #[source]
        source: std::io::Error,
    },

    /// Existing reference could not be read
    #[error(transparent)]
    Reference(ReferenceError),

    /// New reference could not be persisted
    #[error("failed to update reference for {dependency}: {source}")]
    ReferenceWrite {
        dependency: String,
        #[source]
        source: ReferenceError,
    },

    /// Notification could not be posted after the reference was updated
    #[error("failed to post notification for {dependency}: {source}")]
    Posting {
        dependency: String,
        #[source]
        source: NotifyError,
    },
}

/// Errors related to reference file operations
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// No reference exists yet for this dependency
    #[error("reference file not found: {path}")]
    Missing { path: PathBuf },

    /// Failed to read the reference file
    #[error("failed to read reference file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reference file content is malformed
    #[error("failed to parse reference file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Failed to create the reference directory
    #[error("failed to create reference directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the reference file
    #[error("failed to write reference file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a snapshot
    #[error("failed to serialize reference for {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    /// Failed to copy the reference to its backup path
    #[error("failed to back up reference file {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy the backup over the reference
    #[error("failed to restore reference file {path} from backup: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to posting notifications
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Credentials were rejected
    #[error("authentication failed for {destination}: {message}")]
    Authentication { destination: String, message: String },

    /// Any other posting failure
    #[error("failed to post to {destination}: {message}")]
    Posting { destination: String, message: String },
}

/// Transport-level HTTP failures
#[derive(Error, Debug)]
pub enum HttpError {
    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Request exceeded the configured timeout
    #[error("timeout while requesting {url}")]
    Timeout { url: String },

    /// Connection or protocol failure
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// Response body could not be decoded
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl HttpError {
    /// Returns the HTTP status if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl CheckError {
    /// Creates a new PluginLoad error
    pub fn plugin_load(
        dependency: impl Into<String>,
        plugin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CheckError::PluginLoad {
            dependency: dependency.into(),
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Creates a new UpstreamUnavailable error
    pub fn upstream(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        CheckError::UpstreamUnavailable {
            dependency: dependency.into(),
            message: message.into(),
        }
    }

    /// Creates a new Parse error
    pub fn parse(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        CheckError::Parse {
            dependency: dependency.into(),
            message: message.into(),
        }
    }

    /// Short machine-friendly label used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::PluginLoad { .. } => "plugin_load",
            CheckError::UpstreamUnavailable { .. } => "upstream_unavailable",
            CheckError::Parse { .. } => "parse",
            CheckError::Workdir { .. } => "workdir",
            CheckError::Reference(_) => "reference_read",
            CheckError::ReferenceWrite { .. } => "reference_write",
            CheckError::Posting { .. } => "posting",
        }
    }
}

impl ReferenceError {
    /// Returns true if the reference simply does not exist yet
    pub fn is_missing(&self) -> bool {
        matches!(self, ReferenceError::Missing { .. })
    }

    /// Creates a new Parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ReferenceError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl NotifyError {
    /// Creates a new Authentication error
    pub fn authentication(destination: impl Into<String>, message: impl Into<String>) -> Self {
        NotifyError::Authentication {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Creates a new Posting error
    pub fn posting(destination: impl Into<String>, message: impl Into<String>) -> Self {
        NotifyError::Posting {
            destination: destination.into(),
            message: message.into(),
        }
    }
}
