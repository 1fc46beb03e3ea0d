//! Travis CI config updater
//!
//! Rewrites the top-level `go:` key, either a single version or a list:
//!
//! ```yaml
//! language: go
//! go:
//!   - 1.13.1
//!   - 1.10.0
//! ```

use std::path::Path;

use tracing::{debug, warn};

use crate::release::GoVersion;
use crate::updater::traits::{UpdateError, Updater};
use crate::updater::types::FileKind;
use crate::updater::version_list::{SinglePin, merge_versions};
use crate::yaml::{Document, Editor, Node, ScalarType, scalar};

const GO_KEY: &str = "go";

/// Updater for `.travis.yml` files
#[derive(Debug, Default)]
pub struct TravisUpdater;

impl TravisUpdater {
    pub fn new() -> Self {
        Self
    }
}

impl Updater for TravisUpdater {
    fn file_kind(&self) -> FileKind {
        FileKind::Travis
    }

    fn update(
        &self,
        path: &Path,
        content: &str,
        version: &GoVersion,
    ) -> Result<Option<String>, UpdateError> {
        let doc = Document::parse(content).map_err(|e| {
            warn!("Failed to parse Travis CI config {}: {}", path.display(), e);
            UpdateError::parse(path, e)
        })?;

        let Some(entry) = doc.root_mapping().and_then(|root| root.get(GO_KEY)) else {
            debug!("No `go` key in {}", path.display());
            return Ok(None);
        };

        let mut editor = Editor::new(content);
        match &entry.value {
            Some(node @ Node::Scalar(current)) => {
                if !matches!(current.resolved_type(), ScalarType::Str | ScalarType::Int) {
                    return Err(UpdateError::schema(
                        path,
                        GO_KEY,
                        format!(
                            "expected a version string or a sequence, found {}",
                            node.kind_name()
                        ),
                    ));
                }
                if current.value != version.as_str() {
                    editor.replace(node, scalar::render(version.as_str(), current.style));
                }
            }
            Some(Node::Sequence(seq)) => {
                if let Some(index) = seq.items.iter().position(|i| i.node.as_scalar().is_none()) {
                    return Err(UpdateError::schema(
                        path,
                        format!("{GO_KEY}[{index}]"),
                        format!(
                            "expected a version string, found {}",
                            seq.items[index].node.kind_name()
                        ),
                    ));
                }
                merge_versions(&mut editor, seq, version, SinglePin::Replace);
            }
            Some(other) => {
                return Err(UpdateError::schema(
                    path,
                    GO_KEY,
                    format!(
                        "expected a version string or a sequence, found {}",
                        other.kind_name()
                    ),
                ));
            }
            None => {
                return Err(UpdateError::schema(
                    path,
                    GO_KEY,
                    "expected a version string or a sequence, found no value",
                ));
            }
        }

        if editor.is_changed() {
            Ok(Some(editor.finish()))
        } else {
            Ok(None)
        }
    }
}
