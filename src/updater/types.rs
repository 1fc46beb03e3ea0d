//! Common types for updaters

use std::path::PathBuf;

/// Kind of file an updater handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    /// Dockerfile with a `FROM golang` base image
    Dockerfile,
    /// Travis CI config (.travis.yml)
    Travis,
    /// GitHub Actions workflow (.github/workflows/*.yml)
    GitHubActions,
    /// Single-line version file (.github/versions/go)
    VersionFile,
}

impl FileKind {
    pub const ALL: [FileKind; 4] = [
        FileKind::Dockerfile,
        FileKind::Travis,
        FileKind::GitHubActions,
        FileKind::VersionFile,
    ];

    /// Returns the string representation of the file kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Dockerfile => "dockerfile",
            FileKind::Travis => "travis",
            FileKind::GitHubActions => "github_actions",
            FileKind::VersionFile => "version_file",
        }
    }
}

/// New content for a file whose Go version reference changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: PathBuf,
    pub kind: FileKind,
    pub content: String,
}
