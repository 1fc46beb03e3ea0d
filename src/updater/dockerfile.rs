//! Dockerfile updater
//!
//! Rewrites the tag of the base image on the first `FROM` line:
//!
//! ```text
//! FROM golang:1.13.1-alpine AS build   # builder
//! ^^^^^               ^^^^^^^^^^^^^^^^^^^^^^^^^^  kept verbatim
//!             ^^^^^^  replaced by the target version
//! ```
//!
//! Only the first `FROM` line is considered; later stages of a multi-stage
//! build are left untouched.

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::release::GoVersion;
use crate::updater::traits::{UpdateError, Updater};
use crate::updater::types::FileKind;

/// Updater for Dockerfiles based on a Go image
pub struct DockerfileUpdater {
    image: String,
    /// Regex for the `FROM` line: prefix, optional tag, trailing suffix
    from_re: Regex,
    /// Regex for a versioned tag with a variant: `1.13.1-alpine`
    variant_tag_re: Regex,
}

impl DockerfileUpdater {
    /// Creates an updater for the given base image name
    pub fn new(image: &str) -> Result<Self, UpdateError> {
        let invalid = |reason: &str| UpdateError::InvalidImage {
            image: image.to_string(),
            reason: reason.to_string(),
        };
        if image.is_empty() {
            return Err(invalid("image name is empty"));
        }
        if image.contains(char::is_whitespace) {
            return Err(invalid("image name contains whitespace"));
        }
        if image.contains([':', '@']) {
            return Err(invalid("image name must not carry a tag or digest"));
        }

        let from_expr = format!(
            r"^(?P<prefix>\s*(?i:from)\s+(?:--\S+\s+)*){}(?::(?P<tag>[\w.-]+))?(?P<suffix>[\s#].*)?$",
            regex::escape(image)
        );
        let from_re = Regex::new(&from_expr).map_err(|e| {
            invalid(&format!("unable to compile pattern {from_expr:?}: {e}"))
        })?;
        let variant_tag_re = Regex::new(r"^\d+\.\d+(?:\.\d+)?(?P<variant>-.+)$")
            .map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            image: image.to_string(),
            from_re,
            variant_tag_re,
        })
    }

    /// Rewrite a single `FROM` line. Lines that do not use the image are
    /// returned unchanged.
    pub fn update_from_line(&self, line: &str, version: &GoVersion) -> String {
        let Some(caps) = self.from_re.captures(line) else {
            return line.to_string();
        };
        let prefix = caps.name("prefix").map_or("", |m| m.as_str());
        let suffix = caps.name("suffix").map_or("", |m| m.as_str());
        let variant = caps
            .name("tag")
            .and_then(|tag| self.variant_tag_re.captures(tag.as_str()))
            .and_then(|tag_caps| tag_caps.name("variant"))
            .map_or("", |m| m.as_str());

        format!("{prefix}{}:{version}{variant}{suffix}", self.image)
    }
}

impl Updater for DockerfileUpdater {
    fn file_kind(&self) -> FileKind {
        FileKind::Dockerfile
    }

    fn update(
        &self,
        path: &Path,
        content: &str,
        version: &GoVersion,
    ) -> Result<Option<String>, UpdateError> {
        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

        let Some(from_line) = lines
            .iter_mut()
            .find(|line| line.trim().to_lowercase().starts_with("from "))
        else {
            debug!("No FROM line in {}", path.display());
            return Ok(None);
        };
        *from_line = self.update_from_line(from_line, version);

        let updated = lines.join("\n");
        if updated == content {
            Ok(None)
        } else {
            Ok(Some(updated))
        }
    }
}
