//! Temporary repository test utilities

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use gopin::config::Config;

/// A throwaway repository checkout
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Default configuration rooted at this repository
    pub fn config(&self) -> Config {
        Config {
            root: self.root().to_path_buf(),
            ..Config::default()
        }
    }
}
