use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

// =============================================================================
// Release feed
// =============================================================================

/// Base URL of the Go download feed
pub const DEFAULT_RELEASE_URL: &str = "https://go.dev";

/// Timeout for fetching the release feed in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Well-known files
// =============================================================================

/// Base image rewritten in Dockerfile `FROM` lines
pub const DEFAULT_DOCKER_IMAGE: &str = "golang";

pub const DOCKERFILE_NAME: &str = "Dockerfile";

pub const TRAVIS_FILE: &str = ".travis.yml";

pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Single-line file holding the Go version used by GitHub Actions workflows
pub const VERSION_FILE: &str = ".github/versions/go";

/// gopin configuration.
///
/// Every field is optional in the JSON file; command line flags override
/// what the file sets.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory discovery runs from and relative paths resolve against
    pub root: PathBuf,
    /// Explicit Dockerfiles; empty means "every Dockerfile under root"
    pub dockerfiles: Vec<PathBuf>,
    /// Explicit Travis CI files; empty means `.travis.yml` if present
    pub travisfiles: Vec<PathBuf>,
    /// Explicit workflow files; empty means `.github/workflows/*.y{a,}ml`
    pub workflows: Vec<PathBuf>,
    /// Paths never touched
    pub excludes: Vec<PathBuf>,
    pub docker_image: String,
    /// Skip the release feed and pin to this version
    pub go_version: Option<String>,
    pub release: ReleaseConfig,
    /// Report what would change without writing
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            dockerfiles: Vec::new(),
            travisfiles: Vec::new(),
            workflows: Vec::new(),
            excludes: Vec::new(),
            docker_image: DEFAULT_DOCKER_IMAGE.to_string(),
            go_version: None,
            release: ReleaseConfig::default(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("unable to parse config file {}", path.display()))
    }

    /// Load `path` if given, otherwise the user config file if it exists,
    /// otherwise defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Release feed configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseConfig {
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout: u64,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RELEASE_URL.to_string(),
            timeout: FETCH_TIMEOUT_MS,
        }
    }
}

/// Returns the path to the user configuration file.
/// Uses $XDG_CONFIG_HOME/gopin/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/gopin/config.json,
/// or ./gopin/config.json if neither is available.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir()).join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("gopin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "excludes": ["vendor/Dockerfile"]
        }))
        .unwrap();

        assert_eq!(result.excludes, vec![PathBuf::from("vendor/Dockerfile")]);
        assert_eq!(result.docker_image, "golang");
        assert_eq!(result.release, ReleaseConfig::default());
        assert!(!result.dry_run);
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "root": "/repo",
            "dockerfiles": ["Dockerfile", "build/Dockerfile"],
            "travisfiles": [".travis.yml"],
            "workflows": [".github/workflows/ci.yml"],
            "excludes": ["build/Dockerfile"],
            "dockerImage": "docker.io/library/golang",
            "goVersion": "1.22.3",
            "release": {
                "baseUrl": "http://localhost:8080",
                "timeout": 500
            },
            "dryRun": true
        }))
        .unwrap();

        assert_eq!(
            result,
            Config {
                root: PathBuf::from("/repo"),
                dockerfiles: vec![
                    PathBuf::from("Dockerfile"),
                    PathBuf::from("build/Dockerfile")
                ],
                travisfiles: vec![PathBuf::from(".travis.yml")],
                workflows: vec![PathBuf::from(".github/workflows/ci.yml")],
                excludes: vec![PathBuf::from("build/Dockerfile")],
                docker_image: "docker.io/library/golang".to_string(),
                go_version: Some("1.22.3".to_string()),
                release: ReleaseConfig {
                    base_url: "http://localhost:8080".to_string(),
                    timeout: 500,
                },
                dry_run: true,
            }
        );
    }

    #[test]
    fn from_file_reports_invalid_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("unable to parse config file"));
    }

    #[test]
    fn config_dir_with_env_uses_xdg_config_home_when_set() {
        let path = config_dir_with_env(
            Some("/tmp/test-config".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-config/gopin"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_home_config() {
        let path = config_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.config/gopin"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = config_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./gopin"));
    }
}
