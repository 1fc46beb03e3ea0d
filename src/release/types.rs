//! Common types for Go releases

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::release::error::ReleaseError;

/// A Go toolchain version such as `1.22` or `1.13.1`.
///
/// Versions are opaque tokens compared by exact string equality; `1.22` and
/// `1.22.0` are different versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoVersion(String);

impl GoVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a version from a release tag as published by go.dev (`go1.22.3`)
    pub fn from_release_tag(tag: &str) -> Result<Self, ReleaseError> {
        tag.strip_prefix("go")
            .ok_or_else(|| ReleaseError::InvalidVersion(tag.to_string()))?
            .parse()
    }
}

impl FromStr for GoVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.contains(char::is_whitespace) {
            return Err(ReleaseError::InvalidVersion(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the `go.dev/dl/?mode=json` feed
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GoRelease {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}
