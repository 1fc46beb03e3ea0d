use std::path::PathBuf;

use clap::Parser;
use gopin::config::Config;
use gopin::runner::{release_source, run};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gopin")]
#[command(
    version,
    about = "Pin Dockerfiles, Travis CI and GitHub Actions configs to the latest stable Go release"
)]
struct Cli {
    /// Directory to search; relative paths resolve against it
    #[arg(long)]
    root: Option<PathBuf>,

    /// JSON configuration file (default: $XDG_CONFIG_HOME/gopin/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated Dockerfiles (default: every Dockerfile under the root)
    #[arg(long, env = "INPUT_DOCKERFILES", value_delimiter = ',')]
    dockerfiles: Option<Vec<String>>,

    /// Comma-separated Travis CI files (default: .travis.yml)
    #[arg(long, env = "INPUT_TRAVISFILES", value_delimiter = ',')]
    travisfiles: Option<Vec<String>>,

    /// Comma-separated workflow files (default: .github/workflows/*.yml)
    #[arg(long, env = "INPUT_WORKFLOWS", value_delimiter = ',')]
    workflows: Option<Vec<String>>,

    /// Comma-separated paths to leave untouched
    #[arg(long, env = "INPUT_EXCLUDES", value_delimiter = ',')]
    excludes: Option<Vec<String>>,

    /// Base image rewritten in Dockerfile FROM lines
    #[arg(long)]
    docker_image: Option<String>,

    /// Pin to this version instead of asking go.dev
    #[arg(long, env = "INPUT_GO_VERSION")]
    go_version: Option<String>,

    /// Base URL of the Go release feed
    #[arg(long)]
    release_url: Option<String>,

    /// Report what would change without writing files
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(paths) = path_list(self.dockerfiles) {
            config.dockerfiles = paths;
        }
        if let Some(paths) = path_list(self.travisfiles) {
            config.travisfiles = paths;
        }
        if let Some(paths) = path_list(self.workflows) {
            config.workflows = paths;
        }
        if let Some(paths) = path_list(self.excludes) {
            config.excludes = paths;
        }
        if let Some(image) = self.docker_image {
            config.docker_image = image;
        }
        if let Some(version) = self.go_version.filter(|v| !v.trim().is_empty()) {
            config.go_version = Some(version);
        }
        if let Some(url) = self.release_url {
            config.release.base_url = url;
        }
        config.dry_run |= self.dry_run;

        Ok(config)
    }
}

/// Action inputs arrive as `a, b,` with stray blanks; an all-blank list
/// counts as unset
fn path_list(values: Option<Vec<String>>) -> Option<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = values?
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .collect();
    (!paths.is_empty()).then_some(paths)
}

/// Logs go to stderr; stdout carries only the target version
fn init_tracing() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .init();
    guard
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing();
    let config = cli.into_config()?;

    let report = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let source = release_source(&config)?;
            run(&config, source.as_ref()).await
        })?;

    // consumed as the action's output
    println!("{}", report.version);
    Ok(())
}
