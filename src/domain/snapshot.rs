//! Version snapshot: the field map a checker produces and the reference store persists

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field holding the version string; present in every snapshot
pub const VERSION_FIELD: &str = "version";

/// Mapping from field name to value describing one upstream release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionSnapshot {
    fields: BTreeMap<String, String>,
}

impl VersionSnapshot {
    /// Creates a snapshot holding only a version
    pub fn new(version: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(VERSION_FIELD.to_string(), version.into());
        Self { fields }
    }

    /// Creates a snapshot from an arbitrary field map
    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Adds a field (builder pattern)
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the version string, empty if the field is absent
    pub fn version(&self) -> &str {
        self.get(VERSION_FIELD).unwrap_or_default()
    }

    /// Returns a field value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns true if the snapshot has a version field
    pub fn has_version(&self) -> bool {
        self.fields.contains_key(VERSION_FIELD)
    }

    /// Exact string comparison of the version fields
    pub fn same_version(&self, other: &VersionSnapshot) -> bool {
        self.version() == other.version()
    }
}

impl fmt::Display for VersionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
