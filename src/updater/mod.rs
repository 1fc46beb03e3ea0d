//! Updater layer
//! - traits.rs: Updater trait and UpdateError
//! - types.rs: Common types (FileKind, FileUpdate)
//! - version_list.rs: Version list dedup/append shared by the YAML updaters
//! - dockerfile.rs: Dockerfile `FROM golang:<tag>` updater
//! - travis.rs: .travis.yml `go:` updater
//! - github_actions.rs: GitHub Actions setup-go / matrix updater
//! - version_file.rs: .github/versions/go updater

pub mod dockerfile;
pub mod github_actions;
pub mod traits;
pub mod travis;
pub mod types;
pub mod version_file;
pub mod version_list;

use std::collections::HashMap;

pub use dockerfile::DockerfileUpdater;
pub use github_actions::GitHubActionsUpdater;
pub use traits::{UpdateError, Updater};
pub use travis::TravisUpdater;
pub use types::{FileKind, FileUpdate};
pub use version_file::VersionFileUpdater;

/// Build one updater per file kind
pub fn create_updaters(
    docker_image: &str,
) -> Result<HashMap<FileKind, Box<dyn Updater>>, UpdateError> {
    let mut updaters: HashMap<FileKind, Box<dyn Updater>> = HashMap::new();
    updaters.insert(
        FileKind::Dockerfile,
        Box::new(DockerfileUpdater::new(docker_image)?),
    );
    updaters.insert(FileKind::Travis, Box::new(TravisUpdater::new()));
    updaters.insert(FileKind::GitHubActions, Box::new(GitHubActionsUpdater::new()));
    updaters.insert(FileKind::VersionFile, Box::new(VersionFileUpdater::new()));
    Ok(updaters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_updaters_registers_every_kind() {
        let updaters = create_updaters("golang").unwrap();
        for kind in FileKind::ALL {
            assert_eq!(updaters[&kind].file_kind(), kind);
        }
    }

    #[test]
    fn create_updaters_rejects_invalid_image() {
        assert!(matches!(
            create_updaters("golang:1.22"),
            Err(UpdateError::InvalidImage { .. })
        ));
    }
}
