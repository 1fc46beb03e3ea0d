//! Release source test utilities

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

use gopin::release::{GoVersion, ReleaseError, ReleaseSource};

/// Release source answering with a fixed version, or with
/// `NoStableRelease` when built with `failing()`
pub struct StaticReleaseSource {
    version: Option<GoVersion>,
    calls: AtomicUsize,
}

impl StaticReleaseSource {
    pub fn new(version: &str) -> Self {
        Self {
            version: Some(version.parse().unwrap()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            version: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for StaticReleaseSource {
    async fn latest_stable(&self) -> Result<GoVersion, ReleaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.version.clone().ok_or(ReleaseError::NoStableRelease)
    }
}

/// Serve `releases` as `(tag, stable)` pairs from the go.dev feed endpoint
pub async fn mock_release_feed(server: &mut ServerGuard, releases: &[(&str, bool)]) -> Mock {
    let body: Vec<_> = releases
        .iter()
        .map(|(version, stable)| json!({ "version": version, "stable": stable, "files": [] }))
        .collect();

    server
        .mock("GET", "/dl/")
        .match_query(Matcher::UrlEncoded("mode".into(), "json".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&body).unwrap())
        .create_async()
        .await
}
