//! Pins every discovered file to the latest stable Go release
//!
//! Every file is read and rewritten in memory first; nothing is written
//! unless all of them succeed.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::{debug, info};

use crate::config::Config;
use crate::discovery::{TargetFile, discover};
use crate::release::{GoDevReleaseSource, GoVersion, PinnedRelease, ReleaseSource};
use crate::updater::{FileKind, FileUpdate, UpdateError, Updater, create_updaters};

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The version every file is now pinned to
    pub version: GoVersion,
    /// Files whose content changed, sorted by path
    pub updates: Vec<FileUpdate>,
}

/// Release source for `config`: the pinned version if one is set, the
/// go.dev feed otherwise
pub fn release_source(config: &Config) -> anyhow::Result<Box<dyn ReleaseSource>> {
    if let Some(version) = &config.go_version {
        let version: GoVersion = version
            .parse()
            .with_context(|| format!("invalid Go version {version:?}"))?;
        debug!("Using pinned Go version {}", version);
        return Ok(Box::new(PinnedRelease::new(version)));
    }

    let source = GoDevReleaseSource::new(
        &config.release.base_url,
        Duration::from_millis(config.release.timeout),
    )
    .context("unable to create HTTP client")?;
    Ok(Box::new(source))
}

pub async fn run(config: &Config, source: &dyn ReleaseSource) -> anyhow::Result<RunReport> {
    let files = discover(config)?;
    if files.is_empty() {
        bail!(
            "no files to update under {}; set dockerfiles, travisfiles or workflows",
            config.root.display()
        );
    }
    debug!("Discovered {} file(s)", files.len());

    let updaters = create_updaters(&config.docker_image)?;
    let version = source
        .latest_stable()
        .await
        .context("unable to determine the latest stable Go release")?;
    info!("Target Go version is {}", version);

    let mut updates = plan_updates(&files, &updaters, &version)?;
    updates.sort_by(|a, b| a.path.cmp(&b.path));

    for update in &updates {
        if config.dry_run {
            info!("Would update {}", update.path.display());
            continue;
        }
        std::fs::write(&update.path, &update.content)
            .with_context(|| format!("unable to write {}", update.path.display()))?;
        info!("Updated {}", update.path.display());
    }

    Ok(RunReport { version, updates })
}

/// Compute the new content of every file that needs it, failing on the
/// first file that cannot be read or rewritten
fn plan_updates(
    files: &[TargetFile],
    updaters: &HashMap<FileKind, Box<dyn Updater>>,
    version: &GoVersion,
) -> anyhow::Result<Vec<FileUpdate>> {
    let mut updates = Vec::new();
    for file in files {
        let Some(updater) = updaters.get(&file.kind) else {
            debug!("No updater for {} ({})", file.path.display(), file.kind.as_str());
            continue;
        };
        let content = read_text(&file.path)?;
        match updater.update(&file.path, &content, version)? {
            Some(updated) => updates.push(FileUpdate {
                path: file.path.clone(),
                kind: file.kind,
                content: updated,
            }),
            None => debug!("{} is up to date", file.path.display()),
        }
    }
    Ok(updates)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("unable to read {}", path.display()))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| UpdateError::parse(path, format!("not valid UTF-8 text: {e}")))?;
    Ok(content)
}
