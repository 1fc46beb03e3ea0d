//! GitHub Actions workflow updater
//!
//! Two places reference a Go version in a workflow:
//!
//! ```yaml
//! jobs:
//!   test:
//!     strategy:
//!       matrix:
//!         go: ['1.21', '1.22']          # every strategy.matrix.go list
//!     steps:
//!       - uses: actions/setup-go@v5
//!         with:
//!           go-version: ${{ matrix.go }} # with.go-version of setup-go steps
//! ```
//!
//! Templated values (`${{ ... }}`) are left alone.

use std::path::Path;

use tracing::{debug, warn};

use crate::release::GoVersion;
use crate::updater::traits::{UpdateError, Updater};
use crate::updater::types::FileKind;
use crate::updater::version_list::{SinglePin, merge_versions};
use crate::yaml::{Document, Editor, Entry, Mapping, Node, ScalarStyle, ScalarType, scalar};

const SETUP_GO_ACTION: &str = "actions/setup-go";

/// Updater for GitHub Actions workflow files
#[derive(Debug, Default)]
pub struct GitHubActionsUpdater;

impl GitHubActionsUpdater {
    pub fn new() -> Self {
        Self
    }
}

impl Updater for GitHubActionsUpdater {
    fn file_kind(&self) -> FileKind {
        FileKind::GitHubActions
    }

    fn update(
        &self,
        path: &Path,
        content: &str,
        version: &GoVersion,
    ) -> Result<Option<String>, UpdateError> {
        let doc = Document::parse(content).map_err(|e| {
            warn!("Failed to parse workflow {}: {}", path.display(), e);
            UpdateError::parse(path, e)
        })?;

        let Some(root) = doc.root_mapping() else {
            return Ok(None);
        };
        let Some(jobs) = root.get("jobs") else {
            debug!("No jobs in {}", path.display());
            return Ok(None);
        };

        let mut rewrite = WorkflowRewrite {
            path,
            version,
            editor: Editor::new(content),
        };
        match &jobs.value {
            Some(Node::Mapping(jobs)) => rewrite.jobs(jobs)?,
            None => return Ok(None),
            Some(other) => {
                return Err(unexpected(path, "jobs", "a mapping", other));
            }
        }

        if !rewrite.editor.is_changed() {
            return Ok(None);
        }
        quote_on_key(&mut rewrite.editor, root);
        Ok(Some(rewrite.editor.finish()))
    }
}

/// Whether a `uses:` value refers to the setup-go action
fn is_setup_go(uses: &str) -> bool {
    uses == SETUP_GO_ACTION
        || uses
            .strip_prefix(SETUP_GO_ACTION)
            .is_some_and(|rest| rest.starts_with('@'))
}

/// Quote a plain top-level `on` key, which YAML 1.1 loaders read as `true`
fn quote_on_key(editor: &mut Editor<'_>, root: &Mapping) {
    for entry in &root.entries {
        if let Node::Scalar(key) = &entry.key
            && key.style == ScalarStyle::Plain
            && matches!(key.value.as_str(), "on" | "On" | "ON")
        {
            editor.replace(&entry.key, "\"on\"");
        }
    }
}

fn unexpected(path: &Path, key_path: &str, expected: &str, found: &Node) -> UpdateError {
    UpdateError::schema(
        path,
        key_path,
        format!("expected {expected}, found {}", found.kind_name()),
    )
}

struct WorkflowRewrite<'a> {
    path: &'a Path,
    version: &'a GoVersion,
    editor: Editor<'a>,
}

impl WorkflowRewrite<'_> {
    fn jobs(&mut self, jobs: &Mapping) -> Result<(), UpdateError> {
        for job_entry in &jobs.entries {
            let name = self.key_name(job_entry, "jobs")?;
            let key_path = format!("jobs.{name}");
            match &job_entry.value {
                Some(Node::Mapping(job)) => {
                    self.steps(job, &key_path)?;
                    self.matrix(job, &key_path)?;
                }
                Some(other) => return Err(unexpected(self.path, &key_path, "a mapping", other)),
                None => {
                    return Err(UpdateError::schema(
                        self.path,
                        key_path,
                        "expected a mapping, found no value",
                    ));
                }
            }
        }
        Ok(())
    }

    fn steps(&mut self, job: &Mapping, job_path: &str) -> Result<(), UpdateError> {
        let key_path = format!("{job_path}.steps");
        let steps = match job.get("steps").and_then(|e| e.value.as_ref()) {
            None => return Ok(()),
            Some(Node::Sequence(steps)) => steps,
            Some(other) => return Err(unexpected(self.path, &key_path, "a sequence", other)),
        };

        for (index, item) in steps.items.iter().enumerate() {
            let step_path = format!("{key_path}[{index}]");
            match &item.node {
                Node::Mapping(step) => self.step(step, &step_path)?,
                other => return Err(unexpected(self.path, &step_path, "a mapping", other)),
            }
        }
        Ok(())
    }

    fn step(&mut self, step: &Mapping, step_path: &str) -> Result<(), UpdateError> {
        for entry in &step.entries {
            self.key_name(entry, step_path)?;
        }

        let Some(uses) = step.get("uses") else {
            return Ok(());
        };
        let uses_path = format!("{step_path}.uses");
        let uses = match &uses.value {
            Some(Node::Scalar(s)) if s.resolved_type() == ScalarType::Str => s.value.as_str(),
            Some(other) => return Err(unexpected(self.path, &uses_path, "a string", other)),
            None => {
                return Err(UpdateError::schema(
                    self.path,
                    uses_path,
                    "expected a string, found no value",
                ));
            }
        };
        if !is_setup_go(uses) {
            return Ok(());
        }

        let rendered = scalar::render(self.version.as_str(), ScalarStyle::Plain);
        let with_path = format!("{step_path}.with");
        let Some(with_entry) = step.get("with") else {
            self.editor
                .insert_nested_entry(step, "with", "go-version", &rendered);
            return Ok(());
        };

        match &with_entry.value {
            None => {
                self.editor
                    .fill_empty_entry(step, with_entry, "go-version", &rendered);
                Ok(())
            }
            Some(node @ Node::Scalar(s)) if s.resolved_type() == ScalarType::Null => {
                self.editor
                    .replace(node, format!("{{go-version: {rendered}}}"));
                Ok(())
            }
            Some(Node::Mapping(with)) => self.go_version(with, &with_path),
            Some(other) => Err(unexpected(self.path, &with_path, "a mapping", other)),
        }
    }

    fn go_version(&mut self, with: &Mapping, with_path: &str) -> Result<(), UpdateError> {
        let key_path = format!("{with_path}.go-version");
        let Some(entry) = with.get("go-version") else {
            let rendered = scalar::render(self.version.as_str(), ScalarStyle::Plain);
            self.editor.insert_entry(with, "go-version", &rendered);
            return Ok(());
        };

        match &entry.value {
            Some(node @ Node::Scalar(current)) => {
                if current.is_template() {
                    debug!(
                        "Leaving templated {} in {} untouched",
                        key_path,
                        self.path.display()
                    );
                    return Ok(());
                }
                if current.resolved_type() != ScalarType::Str {
                    return Err(unexpected(self.path, &key_path, "a string", node));
                }
                if current.value != self.version.as_str() {
                    self.editor
                        .replace(node, scalar::render(self.version.as_str(), current.style));
                }
                Ok(())
            }
            Some(other) => Err(unexpected(self.path, &key_path, "a string", other)),
            None => Err(UpdateError::schema(
                self.path,
                key_path,
                "expected a string, found no value",
            )),
        }
    }

    fn matrix(&mut self, job: &Mapping, job_path: &str) -> Result<(), UpdateError> {
        let strategy_path = format!("{job_path}.strategy");
        let Some(strategy) = self.nested_mapping(job, "strategy", &strategy_path)? else {
            return Ok(());
        };
        let matrix_path = format!("{strategy_path}.matrix");
        let Some(matrix) = self.nested_mapping(strategy, "matrix", &matrix_path)? else {
            return Ok(());
        };

        let go_path = format!("{matrix_path}.go");
        let versions = match matrix.get("go").and_then(|e| e.value.as_ref()) {
            None => return Ok(()),
            Some(Node::Scalar(s)) if s.is_template() => return Ok(()),
            Some(Node::Sequence(seq)) => seq,
            Some(other) => return Err(unexpected(self.path, &go_path, "a sequence", other)),
        };

        for (index, item) in versions.items.iter().enumerate() {
            let is_string = item
                .node
                .as_scalar()
                .is_some_and(|s| s.resolved_type() == ScalarType::Str);
            if !is_string {
                return Err(unexpected(
                    self.path,
                    &format!("{go_path}[{index}]"),
                    "a string",
                    &item.node,
                ));
            }
        }

        merge_versions(&mut self.editor, versions, self.version, SinglePin::Keep);
        Ok(())
    }

    /// The mapping under `key`, or `None` when it is absent, empty or a
    /// template expression
    fn nested_mapping<'m>(
        &self,
        parent: &'m Mapping,
        key: &str,
        key_path: &str,
    ) -> Result<Option<&'m Mapping>, UpdateError> {
        match parent.get(key).and_then(|e| e.value.as_ref()) {
            None => Ok(None),
            Some(Node::Mapping(mapping)) => Ok(Some(mapping)),
            Some(Node::Scalar(s)) if s.is_template() => Ok(None),
            Some(other) => Err(unexpected(self.path, key_path, "a mapping", other)),
        }
    }

    fn key_name<'e>(&self, entry: &'e Entry, parent_path: &str) -> Result<&'e str, UpdateError> {
        match &entry.key {
            Node::Scalar(key) if key.resolved_type() != ScalarType::Null => Ok(&key.value),
            other => Err(UpdateError::schema(
                self.path,
                parent_path,
                format!("expected string keys, found {}", other.kind_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(content: &str, target: &str) -> Result<Option<String>, UpdateError> {
        GitHubActionsUpdater::new().update(
            Path::new(".github/workflows/ci.yml"),
            content,
            &target.parse().unwrap(),
        )
    }

    fn schema_key_path(err: UpdateError) -> String {
        match err {
            UpdateError::Schema { key_path, .. } => key_path,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn update_rewrites_setup_go_version_and_quotes_on_key() {
        let content = r#"name: Go
on:
  push:
    branches:
      - master
  pull_request:
    branches:
      - master

jobs:
  test:
    name: Run Go build
    runs-on: ubuntu-latest
    steps:

    - name: Set up Go
      uses: actions/setup-go@v1
      with:
        go-version: 1.13.1
      id: go

    - name: Check out code into the Go module directory
      uses: actions/checkout@v1

    - name: Build
      run: go install -race ./...
"#;
        let expected = r#"name: Go
"on":
  push:
    branches:
      - master
  pull_request:
    branches:
      - master

jobs:
  test:
    name: Run Go build
    runs-on: ubuntu-latest
    steps:

    - name: Set up Go
      uses: actions/setup-go@v1
      with:
        go-version: "1.22"
      id: go

    - name: Check out code into the Go module directory
      uses: actions/checkout@v1

    - name: Build
      run: go install -race ./...
"#;
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_keeps_template_and_appends_to_matrix() {
        let content = r#"name: CI
on: [push, pull_request]
jobs:
  test:
    strategy:
      matrix:
        go: ['1.9', '1.10.x']
    runs-on: ubuntu-latest
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: ${{ matrix.go }}
      - run: go test ./...
"#;
        let expected = r#"name: CI
"on": [push, pull_request]
jobs:
  test:
    strategy:
      matrix:
        go: ['1.9', '1.10.x', '1.22']
    runs-on: ubuntu-latest
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: ${{ matrix.go }}
      - run: go test ./...
"#;
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_deduplicates_block_matrix() {
        let content = r#"jobs:
  test:
    strategy:
      matrix:
        os: [ubuntu-latest]
        go:
          - "1.22"
          - "1.21.x"
          - "1.22"
"#;
        let expected = r#"jobs:
  test:
    strategy:
      matrix:
        os: [ubuntu-latest]
        go:
          - "1.22"
          - "1.21.x"
"#;
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_adds_with_block_when_missing() {
        let content = r#"jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - name: Set up Go
        uses: actions/setup-go@v5
      - run: go build ./...
"#;
        let expected = r#"jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - name: Set up Go
        uses: actions/setup-go@v5
        with:
          go-version: "1.22"
      - run: go build ./...
"#;
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_adds_go_version_to_existing_with() {
        let content = r#"jobs:
  build:
    steps:
      - uses: actions/setup-go
        with:
          cache: true
"#;
        let expected = r#"jobs:
  build:
    steps:
      - uses: actions/setup-go
        with:
          cache: true
          go-version: 1.22.3
"#;
        assert_eq!(update(content, "1.22.3").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_fills_empty_with() {
        let content = r#"jobs:
  build:
    steps:
      - uses: actions/setup-go@v5
        with:
      - run: make
"#;
        let expected = r#"jobs:
  build:
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: "1.22"
      - run: make
"#;
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_extends_flow_step() {
        let content = "jobs:\n  test:\n    steps:\n      - {uses: actions/setup-go@v5}\n";
        let expected = "jobs:\n  test:\n    steps:\n      - {uses: actions/setup-go@v5, with: {go-version: \"1.22\"}}\n";
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_keeps_quote_style_and_comments() {
        let content = r#"on: push # trigger
jobs:
  test:
    steps:
      # toolchain
      - uses: actions/setup-go@v4
        with:
          go-version: '1.21.5' # pinned
"#;
        let expected = r#""on": push # trigger
jobs:
  test:
    steps:
      # toolchain
      - uses: actions/setup-go@v4
        with:
          go-version: '1.22' # pinned
"#;
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_visits_every_job() {
        let content = r#"jobs:
  lint:
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: "1.21"
  test:
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: "1.20"
"#;
        let expected = r#"jobs:
  lint:
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: "1.22"
  test:
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: "1.22"
"#;
        assert_eq!(update(content, "1.22").unwrap().as_deref(), Some(expected));
    }

    #[test]
    fn update_returns_none_when_current() {
        let content = r#"on: push
jobs:
  test:
    strategy:
      matrix:
        go: ["1.21", "1.22"]
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: "1.22"
"#;
        assert_eq!(update(content, "1.22").unwrap(), None);
    }

    #[test]
    fn update_returns_none_without_setup_go() {
        let content = r#"on: push
jobs:
  test:
    steps:
      - uses: actions/setup-node@v4
      - uses: actions/setup-golang@v1
      - uses: actions/setup-go-extra@v1
      - run: echo hi
"#;
        assert_eq!(update(content, "1.22").unwrap(), None);
    }

    #[test]
    fn update_returns_none_without_jobs() {
        assert_eq!(update("on: push\nname: noop\n", "1.22").unwrap(), None);
    }

    #[test]
    fn update_skips_templated_matrix() {
        let content = r#"jobs:
  test:
    strategy:
      matrix: ${{ fromJSON(needs.setup.outputs.matrix) }}
    steps:
      - run: go test
"#;
        assert_eq!(update(content, "1.22").unwrap(), None);
    }

    #[test]
    fn update_is_idempotent() {
        let content = r#"on: push
jobs:
  test:
    strategy:
      matrix:
        go: ['1.20', '1.21', '1.20']
    steps:
      - uses: actions/setup-go@v5
"#;
        let first = update(content, "1.22").unwrap().unwrap();
        assert_eq!(update(&first, "1.22").unwrap(), None);
    }

    #[test]
    fn update_rejects_numeric_go_version() {
        let content = r#"jobs:
  test:
    steps:
      - uses: actions/setup-go@v5
        with:
          go-version: 1.21
"#;
        let err = update(content, "1.22").unwrap_err();
        assert!(err.to_string().contains("float"));
        assert_eq!(schema_key_path(err), "jobs.test.steps[0].with.go-version");
    }

    #[test]
    fn update_rejects_mapping_matrix_go() {
        let content = r#"jobs:
  test:
    strategy:
      matrix:
        go:
          version: "1.21"
"#;
        let err = update(content, "1.22").unwrap_err();
        assert_eq!(schema_key_path(err), "jobs.test.strategy.matrix.go");
    }

    #[test]
    fn update_rejects_non_string_matrix_entries() {
        let content = "jobs:\n  test:\n    strategy:\n      matrix:\n        go: [1.21, '1.22']\n";
        let err = update(content, "1.22").unwrap_err();
        assert_eq!(schema_key_path(err), "jobs.test.strategy.matrix.go[0]");
    }

    #[test]
    fn update_rejects_non_string_uses() {
        let content = "jobs:\n  test:\n    steps:\n      - uses: [actions/setup-go]\n";
        let err = update(content, "1.22").unwrap_err();
        assert_eq!(schema_key_path(err), "jobs.test.steps[0].uses");
    }

    #[test]
    fn update_rejects_non_sequence_steps() {
        let content = "jobs:\n  test:\n    steps: run tests\n";
        let err = update(content, "1.22").unwrap_err();
        assert_eq!(schema_key_path(err), "jobs.test.steps");
    }

    #[test]
    fn update_rejects_non_mapping_job() {
        let content = "jobs:\n  test: [a, b]\n";
        let err = update(content, "1.22").unwrap_err();
        assert_eq!(schema_key_path(err), "jobs.test");
    }

    #[test]
    fn update_rejects_invalid_yaml() {
        let err = update("jobs: {test: [\n", "1.22").unwrap_err();
        assert!(matches!(err, UpdateError::Parse { .. }));
    }

    #[test]
    fn is_setup_go_matches_action_reference() {
        assert!(is_setup_go("actions/setup-go"));
        assert!(is_setup_go("actions/setup-go@v5"));
        assert!(is_setup_go("actions/setup-go@0c52d547c9bc32b1aa3301fd7a9cb496313a4491"));
        assert!(!is_setup_go("actions/setup-go-extra@v1"));
        assert!(!is_setup_go("actions/setup-golang@v1"));
        assert!(!is_setup_go("docker://actions/setup-go"));
    }
}
