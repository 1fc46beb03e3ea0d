//! Source of the target Go version

#[cfg(test)]
use mockall::automock;

use crate::release::error::ReleaseError;
use crate::release::types::GoVersion;

/// Trait for looking up the Go version every config gets pinned to
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Returns the latest stable Go version
    async fn latest_stable(&self) -> Result<GoVersion, ReleaseError>;
}

/// A source that always answers with the same version (`--go-version`)
#[derive(Debug, Clone)]
pub struct PinnedRelease {
    version: GoVersion,
}

impl PinnedRelease {
    pub fn new(version: GoVersion) -> Self {
        Self { version }
    }
}

#[async_trait::async_trait]
impl ReleaseSource for PinnedRelease {
    async fn latest_stable(&self) -> Result<GoVersion, ReleaseError> {
        Ok(self.version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pinned_release_returns_its_version() {
        let source = PinnedRelease::new("1.21.4".parse().unwrap());
        assert_eq!(source.latest_stable().await.unwrap().as_str(), "1.21.4");
    }
}
