//! Checker variant tags selectable from the configuration file

use std::fmt;
use std::str::FromStr;

/// Supported version checker variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckerKind {
    /// Latest GitHub release of an `owner/repo` project
    GitHub,
    /// cfitsio tarball download with MD5 and header scan
    Cfitsio,
}

impl CheckerKind {
    /// Returns the canonical plugin name used in config files
    pub fn plugin_name(&self) -> &'static str {
        match self {
            CheckerKind::GitHub => "github",
            CheckerKind::Cfitsio => "cfitsio",
        }
    }

    /// Returns the display name for this checker
    pub fn display_name(&self) -> &'static str {
        match self {
            CheckerKind::GitHub => "GitHub releases",
            CheckerKind::Cfitsio => "cfitsio tarball",
        }
    }

    /// Returns all supported checker variants
    pub fn all() -> &'static [CheckerKind] {
        &[CheckerKind::GitHub, CheckerKind::Cfitsio]
    }
}

impl FromStr for CheckerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older configs name the plugin module rather than the checker
        match s.trim().to_ascii_lowercase().as_str() {
            "github" | "relcheck_github" => Ok(CheckerKind::GitHub),
            "cfitsio" | "tarball" => Ok(CheckerKind::Cfitsio),
            other => Err(format!(
                "unknown plugin '{}' (expected one of: {})",
                other,
                CheckerKind::all()
                    .iter()
                    .map(|k| k.plugin_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
