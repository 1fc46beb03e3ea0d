//! go.dev download feed implementation

use std::time::Duration;

use tracing::{debug, warn};

use crate::release::error::ReleaseError;
use crate::release::source::ReleaseSource;
use crate::release::types::{GoRelease, GoVersion};

/// Release source backed by `https://go.dev/dl/?mode=json`
pub struct GoDevReleaseSource {
    client: reqwest::Client,
    base_url: String,
}

impl GoDevReleaseSource {
    /// Creates a new GoDevReleaseSource with a custom base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ReleaseError> {
        let client = reqwest::Client::builder()
            .user_agent("gopin")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GoDevReleaseSource {
    async fn latest_stable(&self) -> Result<GoVersion, ReleaseError> {
        let url = format!("{}/dl/?mode=json", self.base_url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Go release feed returned status {}: {}", status, url);
            return Err(ReleaseError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let releases: Vec<GoRelease> = response.json().await.map_err(|e| {
            warn!("Failed to decode Go release feed: {}", e);
            ReleaseError::InvalidResponse(e.to_string())
        })?;

        // The feed lists newest releases first
        let release = releases
            .iter()
            .find(|release| release.stable)
            .ok_or(ReleaseError::NoStableRelease)?;
        debug!("Latest stable Go release is {}", release.version);

        GoVersion::from_release_tag(&release.version)
    }
}
