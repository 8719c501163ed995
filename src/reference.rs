//! Reference store: the last accepted snapshot per dependency
//!
//! Each dependency has at most one reference file, `<name>_reference`, inside
//! the reference directory. Before a reference is overwritten it is copied to
//! `<name>_reference.bkup` so a failed notification can be rolled back and the
//! next run retries the same transition.

use crate::domain::{Dependency, VersionSnapshot, VERSION_FIELD};
use crate::error::ReferenceError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to reference file names
const REFERENCE_SUFFIX: &str = "_reference";

/// Suffix appended to backup file names
const BACKUP_SUFFIX: &str = ".bkup";

/// On-disk layout of a reference file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFormat {
    /// YAML key/value map with at least a `version` key
    Yaml,
    /// Whitespace-separated values in a fixed field order
    Plain(&'static [&'static str]),
}

impl ReferenceFormat {
    /// Render a snapshot in this format
    fn render(&self, snapshot: &VersionSnapshot, path: &Path) -> Result<String, ReferenceError> {
        match self {
            ReferenceFormat::Yaml => {
                serde_yaml::to_string(snapshot).map_err(|e| ReferenceError::Serialize {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
            ReferenceFormat::Plain(fields) => {
                let mut values = Vec::with_capacity(fields.len());
                for field in fields.iter() {
                    let value = snapshot.get(field).ok_or_else(|| ReferenceError::Serialize {
                        path: path.to_path_buf(),
                        message: format!("snapshot has no '{}' field", field),
                    })?;
                    values.push(value);
                }
                Ok(format!("{}\n", values.join(" ")))
            }
        }
    }

    /// Parse file content in this format
    fn parse(&self, content: &str, path: &Path) -> Result<VersionSnapshot, ReferenceError> {
        let fields = match self {
            ReferenceFormat::Yaml => parse_yaml(content, path)?,
            ReferenceFormat::Plain(names) => {
                let values: Vec<&str> = content.split_whitespace().collect();
                if values.len() != names.len() {
                    return Err(ReferenceError::parse(
                        path,
                        format!(
                            "expected {} whitespace-separated values ({}), found {}",
                            names.len(),
                            names.join(" "),
                            values.len()
                        ),
                    ));
                }
                names
                    .iter()
                    .zip(values)
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            }
        };

        let snapshot = VersionSnapshot::from_fields(fields);
        if !snapshot.has_version() {
            return Err(ReferenceError::parse(
                path,
                format!("missing '{}' field", VERSION_FIELD),
            ));
        }
        Ok(snapshot)
    }
}

/// Reads a YAML map of plain scalars; values are kept as written, so a
/// hand-edited `version: 1.10` stays "1.10"
fn parse_yaml(content: &str, path: &Path) -> Result<BTreeMap<String, String>, ReferenceError> {
    serde_yaml::from_str(content).map_err(|e| ReferenceError::parse(path, e.to_string()))
}

/// Writes rendered reference content to disk
type WriteFn = fn(&Path, &str) -> io::Result<()>;

fn write_to_disk(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content)
}

/// Reference files for all dependencies, rooted at one directory
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    dir: PathBuf,
    write_file: WriteFn,
}

impl ReferenceStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_file: write_to_disk,
        }
    }

    /// Replace the function that writes reference content (for testing)
    #[cfg(test)]
    pub(crate) fn with_writer(mut self, write_file: WriteFn) -> Self {
        self.write_file = write_file;
        self
    }

    /// Directory holding the reference files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the reference file for a dependency
    pub fn reference_path(&self, dependency: &Dependency) -> PathBuf {
        self.dir
            .join(format!("{}{}", dependency.file_stem(), REFERENCE_SUFFIX))
    }

    /// Path of the backup copy for a dependency
    pub fn backup_path(&self, dependency: &Dependency) -> PathBuf {
        let mut name = self.reference_path(dependency).into_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Returns true if a reference exists for the dependency
    pub fn exists(&self, dependency: &Dependency) -> bool {
        self.reference_path(dependency).is_file()
    }

    /// Read the reference snapshot
    ///
    /// Returns `ReferenceError::Missing` when no reference exists yet, which
    /// callers treat as a first run rather than a failure.
    pub fn read(
        &self,
        dependency: &Dependency,
        format: ReferenceFormat,
    ) -> Result<VersionSnapshot, ReferenceError> {
        let path = self.reference_path(dependency);
        debug!("Reading version reference from {}", path.display());

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReferenceError::Missing { path });
            }
            Err(source) => return Err(ReferenceError::Read { path, source }),
        };

        format.parse(&content, &path)
    }

    /// Persist a snapshot, first copying any existing reference to the backup
    /// path
    ///
    /// Returns the backup path if a backup was taken.
    pub fn write(
        &self,
        dependency: &Dependency,
        snapshot: &VersionSnapshot,
        format: ReferenceFormat,
    ) -> Result<Option<PathBuf>, ReferenceError> {
        let path = self.reference_path(dependency);
        let content = format.render(snapshot, &path)?;

        fs::create_dir_all(&self.dir).map_err(|source| ReferenceError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let backup = if path.is_file() {
            let backup = self.backup_path(dependency);
            debug!("Backing up {} to {}", path.display(), backup.display());
            fs::copy(&path, &backup).map_err(|source| ReferenceError::Backup {
                path: path.clone(),
                source,
            })?;
            Some(backup)
        } else {
            None
        };

        (self.write_file)(&path, &content).map_err(|source| ReferenceError::Write {
            path: path.clone(),
            source,
        })?;
        info!(
            "Updated {} version reference to {}",
            dependency.name,
            snapshot.version()
        );

        Ok(backup)
    }

    /// Copy the backup back over the reference
    pub fn restore_backup(&self, dependency: &Dependency) -> Result<(), ReferenceError> {
        let path = self.reference_path(dependency);
        let backup = self.backup_path(dependency);
        fs::copy(&backup, &path).map_err(|source| ReferenceError::Restore {
            path: path.clone(),
            source,
        })?;
        info!("Rolled back {} version reference", dependency.name);
        Ok(())
    }
}
