//! cfitsio tarball checker
//!
//! cfitsio publishes no release feed, only a "latest" tarball. The checker
//! downloads it, compares its MD5 with the reference, and only when the hash
//! changed extracts `fitsio.h` and `changes.txt` to read the version, the
//! SONAME and the newest changelog section.

use crate::checker::scan::{first_section, scan_marker};
use crate::checker::{VersionChecker, NO_CHANGELOG};
use crate::domain::{CheckerKind, Dependency, DependencyOptions, VersionSnapshot};
use crate::error::CheckError;
use crate::http::HttpClient;
use crate::reference::ReferenceFormat;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use md5::{Digest, Md5};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Official location of the latest cfitsio release
pub const DEFAULT_TARBALL_URL: &str =
    "https://heasarc.gsfc.nasa.gov/FTP/software/fitsio/c/cfitsio_latest.tar.gz";

/// Field order of the plain reference file: hash, version, interface id
pub const CFITSIO_REFERENCE_FIELDS: &[&str] = &[MD5_FIELD, "version", SONAME_FIELD];

const MD5_FIELD: &str = "md5";
const SONAME_FIELD: &str = "soname";

/// Local file name of the downloaded archive
const TARBALL_NAME: &str = "release.tar.gz";

/// Where and how to look for version information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfitsioSettings {
    pub url: String,
    pub header: String,
    pub changelog: String,
    pub version_marker: String,
    pub soname_marker: String,
}

impl Default for CfitsioSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TARBALL_URL.to_string(),
            header: "fitsio.h".to_string(),
            changelog: "changes.txt".to_string(),
            version_marker: "CFITSIO_VERSION".to_string(),
            soname_marker: "CFITSIO_SONAME".to_string(),
        }
    }
}

impl CfitsioSettings {
    /// Apply config file overrides on top of the defaults
    pub fn from_options(options: &DependencyOptions) -> Self {
        let defaults = Self::default();
        Self {
            url: options.url.clone().unwrap_or(defaults.url),
            header: options.header.clone().unwrap_or(defaults.header),
            changelog: options.changelog.clone().unwrap_or(defaults.changelog),
            version_marker: options
                .version_marker
                .clone()
                .unwrap_or(defaults.version_marker),
            soname_marker: options
                .soname_marker
                .clone()
                .unwrap_or(defaults.soname_marker),
        }
    }
}

/// Tarball-based checker for cfitsio
pub struct CfitsioChecker {
    client: HttpClient,
    settings: CfitsioSettings,
}

impl CfitsioChecker {
    /// Create a new checker
    pub fn new(client: HttpClient, settings: CfitsioSettings) -> Self {
        Self { client, settings }
    }

    /// Path the changelog is extracted to
    fn changelog_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.settings.changelog)
    }

    /// Extract the header and changelog from the archive into `workdir`
    ///
    /// Entries are matched by file name regardless of their directory inside
    /// the archive. Returns the extracted header path.
    fn extract(
        &self,
        dependency: &Dependency,
        tarball: &Path,
        workdir: &Path,
    ) -> Result<PathBuf, CheckError> {
        let parse_err = |e: std::io::Error| {
            CheckError::parse(&dependency.name, format!("corrupt archive: {}", e))
        };

        let file = fs::File::open(tarball).map_err(parse_err)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut header = None;

        for entry in archive.entries().map_err(parse_err)? {
            let mut entry = entry.map_err(parse_err)?;
            let name = entry
                .path()
                .map_err(parse_err)?
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());

            let Some(name) = name else { continue };
            let wanted = name == self.settings.header || name == self.settings.changelog;
            if !wanted || !entry.header().entry_type().is_file() {
                continue;
            }

            let target = workdir.join(&name);
            // First match wins; later copies of the same name are ignored
            if target.exists() {
                continue;
            }
            entry.unpack(&target).map_err(parse_err)?;
            debug!("Extracted {} to {}", name, target.display());

            if name == self.settings.header {
                header = Some(target);
            }
        }

        header.ok_or_else(|| {
            CheckError::parse(
                &dependency.name,
                format!("{} not found in archive", self.settings.header),
            )
        })
    }
}

/// Lowercase hex MD5 of a byte slice
pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

#[async_trait]
impl VersionChecker for CfitsioChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::Cfitsio
    }

    fn reference_format(&self) -> ReferenceFormat {
        ReferenceFormat::Plain(CFITSIO_REFERENCE_FIELDS)
    }

    async fn fetch_version(
        &self,
        dependency: &Dependency,
        reference: Option<&VersionSnapshot>,
        workdir: &Path,
    ) -> Result<VersionSnapshot, CheckError> {
        info!("Downloading {}", self.settings.url);
        let bytes = self
            .client
            .get_bytes(&self.settings.url)
            .await
            .map_err(|e| CheckError::upstream(&dependency.name, e.to_string()))?;

        let md5 = md5_hex(&bytes);
        debug!("MD5 of {} is {}", self.settings.url, md5);

        if let Some(reference) = reference {
            if reference.get(MD5_FIELD) == Some(md5.as_str()) {
                debug!("Archive unchanged for {}, skipping extraction", dependency.name);
                return Ok(reference.clone());
            }
        }

        let tarball = workdir.join(TARBALL_NAME);
        fs::write(&tarball, &bytes).map_err(|e| {
            CheckError::upstream(&dependency.name, format!("failed to store download: {}", e))
        })?;

        let header_path = self.extract(dependency, &tarball, workdir)?;
        let header = fs::read(&header_path).map_err(|e| {
            CheckError::parse(&dependency.name, format!("failed to read header: {}", e))
        })?;
        let header = String::from_utf8_lossy(&header);

        let missing = |marker: &str| {
            CheckError::parse(
                &dependency.name,
                format!("{} not found in {}", marker, self.settings.header),
            )
        };
        let version = scan_marker(&header, &self.settings.version_marker)
            .ok_or_else(|| missing(&self.settings.version_marker))?;
        let soname = scan_marker(&header, &self.settings.soname_marker)
            .ok_or_else(|| missing(&self.settings.soname_marker))?;

        Ok(VersionSnapshot::new(version)
            .with_field(MD5_FIELD, md5)
            .with_field(SONAME_FIELD, soname))
    }

    fn build_changelog(
        &self,
        reference: &VersionSnapshot,
        new: &VersionSnapshot,
        workdir: &Path,
    ) -> String {
        let path = self.changelog_path(workdir);
        let mut changelog = match fs::read(&path) {
            Ok(bytes) => first_section(&String::from_utf8_lossy(&bytes))
                .unwrap_or_else(|| NO_CHANGELOG.to_string()),
            Err(e) => {
                debug!("No changelog at {}: {}", path.display(), e);
                NO_CHANGELOG.to_string()
            }
        };

        let old_soname = reference.get(SONAME_FIELD);
        let new_soname = new.get(SONAME_FIELD);
        if let (Some(old), Some(new)) = (old_soname, new_soname) {
            if old != new {
                warn!("SONAME changed from {} to {}", old, new);
                changelog.push_str(&format!(
                    "\n\nWARNING: SONAME changed from {} to {}.",
                    old, new
                ));
            }
        }

        changelog
    }
}
