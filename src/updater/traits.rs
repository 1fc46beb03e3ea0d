//! Updater trait definition

use std::path::{Path, PathBuf};

use crate::release::GoVersion;
use crate::updater::types::FileKind;

/// Trait for rewriting the Go version referenced by one kind of file
pub trait Updater: Send + Sync {
    /// The kind of file this updater handles
    fn file_kind(&self) -> FileKind;

    /// Rewrite `content` so it references `version`.
    ///
    /// Returns `Ok(None)` when the file has nothing to update or already
    /// references `version`; the caller must then leave the file alone.
    fn update(
        &self,
        path: &Path,
        content: &str,
        version: &GoVersion,
    ) -> Result<Option<String>, UpdateError>;
}

/// Error type for update operations
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The file could not be parsed (invalid YAML, or not UTF-8 text)
    #[error("unable to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A targeted key has a type or shape that cannot be rewritten safely
    #[error("unsupported value for `{key_path}` in {}: {message}", path.display())]
    Schema {
        path: PathBuf,
        key_path: String,
        message: String,
    },

    /// The Dockerfile base image name cannot be matched
    #[error("invalid base image name {image:?}: {reason}")]
    InvalidImage { image: String, reason: String },
}

impl UpdateError {
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        UpdateError::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn schema(path: &Path, key_path: impl Into<String>, message: impl Into<String>) -> Self {
        UpdateError::Schema {
            path: path.to_path_buf(),
            key_path: key_path.into(),
            message: message.into(),
        }
    }
}
