//! Data model for scraped Go release notes.
//!
//! Everything in here is created fresh per run and handed once to the output
//! step. The JSON shape produced by serializing a `Vec<VersionData>` is the
//! public output format of the `gover` binary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A Go 1.x minor release identifier such as `go1.22`.
///
/// Ordering is by the numeric minor, so `go1.9 < go1.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GoVersion {
    minor: u32,
}

impl GoVersion {
    pub const PREFIX: &'static str = "go1.";

    pub fn new(minor: u32) -> Self {
        Self { minor }
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.minor)
    }
}

/// Returned when a string is not exactly `go1.<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a go1.<minor> version identifier: {0:?}")]
pub struct InvalidVersion(pub String);

impl FromStr for GoVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| InvalidVersion(s.to_string()))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidVersion(s.to_string()));
        }
        digits
            .parse::<u32>()
            .map(GoVersion::new)
            .map_err(|_| InvalidVersion(s.to_string()))
    }
}

impl TryFrom<String> for GoVersion {
    type Error = InvalidVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GoVersion> for String {
    fn from(version: GoVersion) -> Self {
        version.to_string()
    }
}

/// Initial release date (`YYYY-MM-DD`) per minor version.
pub type ReleaseDateIndex = BTreeMap<GoVersion, String>;

/// Kind of change applied to a single symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolChangeKind {
    Added,
    Changed,
    Obsoleted,
}

/// A change to a function, method or type within a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolChange {
    #[serde(rename = "type")]
    pub kind: SymbolChangeKind,
    /// Fully-qualified name, e.g. `http.NewRequestWithContext`.
    pub symbol: String,
    pub description: String,
}

/// One section of a release notes page, e.g. "Changes to the language".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCategory {
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<SymbolChange>,
}

impl ChangeCategory {
    pub const OVERVIEW: &'static str = "Overview";

    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Everything collected for one minor release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionData {
    pub version: GoVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub changes: Vec<ChangeCategory>,
}

impl VersionData {
    pub fn new(version: GoVersion) -> Self {
        Self {
            version,
            release_date: None,
            changes: Vec::new(),
        }
    }
}
