//! Locates the files whose Go version gets pinned
//!
//! Explicit lists from the configuration win; an empty list falls back to the
//! well-known location for that kind of file under the root directory.

use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{Config, DOCKERFILE_NAME, TRAVIS_FILE, VERSION_FILE, WORKFLOWS_DIR};
use crate::updater::FileKind;

/// A file to update together with the updater that handles it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

/// Collect every file to update, sorted by path
pub fn discover(config: &Config) -> anyhow::Result<Vec<TargetFile>> {
    let root = absolute_root(&config.root)?;
    let mut found: BTreeMap<PathBuf, FileKind> = BTreeMap::new();
    let mut add = |paths: Vec<PathBuf>, kind: FileKind| {
        for path in paths {
            found.entry(path).or_insert(kind);
        }
    };

    let dockerfiles = if config.dockerfiles.is_empty() {
        find_dockerfiles(&root)?
    } else {
        resolve_all(&root, &config.dockerfiles)
    };
    add(dockerfiles, FileKind::Dockerfile);

    let travisfiles = if config.travisfiles.is_empty() {
        existing_file(&root, TRAVIS_FILE)
    } else {
        resolve_all(&root, &config.travisfiles)
    };
    add(travisfiles, FileKind::Travis);

    let workflows = if config.workflows.is_empty() {
        find_workflows(&root)?
    } else {
        resolve_all(&root, &config.workflows)
    };
    add(workflows, FileKind::GitHubActions);

    add(existing_file(&root, VERSION_FILE), FileKind::VersionFile);

    let excludes: HashSet<PathBuf> = resolve_all(&root, &config.excludes).into_iter().collect();
    let files = found
        .into_iter()
        .filter(|(path, _)| {
            let excluded = excludes.contains(path);
            if excluded {
                debug!("Excluding {}", path.display());
            }
            !excluded
        })
        .map(|(path, kind)| TargetFile { path, kind })
        .collect();
    Ok(files)
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// parent. Symlinks are not resolved.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

fn absolute_root(root: &Path) -> anyhow::Result<PathBuf> {
    if root.is_absolute() {
        return Ok(clean_path(root));
    }
    let cwd = std::env::current_dir().context("unable to determine the current directory")?;
    Ok(clean_path(&cwd.join(root)))
}

fn resolve_all(root: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| clean_path(&root.join(path)))
        .collect()
}

fn existing_file(root: &Path, relative: &str) -> Vec<PathBuf> {
    let path = root.join(relative);
    if path.is_file() {
        vec![clean_path(&path)]
    } else {
        Vec::new()
    }
}

fn find_dockerfiles(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
    {
        let entry = entry.with_context(|| format!("unable to walk {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == DOCKERFILE_NAME {
            paths.push(clean_path(entry.path()));
        }
    }
    Ok(paths)
}

fn find_workflows(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let dir = root.join(WORKFLOWS_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("unable to list {}", dir.display()))?;
        let is_yaml = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if entry.file_type().is_file() && is_yaml {
            paths.push(clean_path(entry.path()));
        }
    }
    Ok(paths)
}
