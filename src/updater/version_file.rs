//! Updater for `.github/versions/go`, a file holding nothing but a version

use std::path::Path;

use tracing::debug;

use crate::release::GoVersion;
use crate::updater::traits::{UpdateError, Updater};
use crate::updater::types::FileKind;

#[derive(Debug, Default)]
pub struct VersionFileUpdater;

impl VersionFileUpdater {
    pub fn new() -> Self {
        Self
    }
}

impl Updater for VersionFileUpdater {
    fn file_kind(&self) -> FileKind {
        FileKind::VersionFile
    }

    fn update(
        &self,
        path: &Path,
        content: &str,
        version: &GoVersion,
    ) -> Result<Option<String>, UpdateError> {
        if content.trim() == version.as_str() {
            debug!("{} already pins {}", path.display(), version);
            return Ok(None);
        }

        let newline = if content.ends_with("\r\n") {
            "\r\n"
        } else if content.ends_with('\n') {
            "\n"
        } else {
            ""
        };
        Ok(Some(format!("{version}{newline}")))
    }
}
