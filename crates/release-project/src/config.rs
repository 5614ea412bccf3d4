use std::path::{Path, PathBuf};

use release_core::CommitMode;

use crate::error::ProjectError;
use crate::manifest::{ReleaseMetadata, read_manifest};
use crate::project::{CargoProject, ProjectKind};

pub const DEFAULT_PR_BODY_MAX_CHARS: usize = 60_000;

const DEFAULT_BRANCH_PREFIX: &str = "changeset-release/";
const DEFAULT_TITLE: &str = "Version Packages";

/// Release settings from `[workspace.metadata.changeset-release]`
/// (`[package.metadata.changeset-release]` for single packages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseConfig {
    changeset_dir: PathBuf,
    branch_prefix: String,
    pr_title: String,
    commit_message: String,
    pr_body_max_chars: usize,
    create_releases: bool,
    setup_git_user: bool,
    commit_mode: CommitMode,
    version_command: Option<Vec<String>>,
    publish_command: Option<Vec<String>>,
    labels: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            changeset_dir: PathBuf::from(crate::DEFAULT_CHANGESET_DIR),
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            pr_title: DEFAULT_TITLE.to_string(),
            commit_message: DEFAULT_TITLE.to_string(),
            pr_body_max_chars: DEFAULT_PR_BODY_MAX_CHARS,
            create_releases: true,
            setup_git_user: true,
            commit_mode: CommitMode::default(),
            version_command: None,
            publish_command: None,
            labels: Vec::new(),
        }
    }
}

impl ReleaseConfig {
    #[must_use]
    pub fn changeset_dir(&self) -> &Path {
        &self.changeset_dir
    }

    /// Name of the branch that carries the version PR for `base`.
    #[must_use]
    pub fn version_branch(&self, base: &str) -> String {
        format!("{}{base}", self.branch_prefix)
    }

    #[must_use]
    pub fn pr_title(&self) -> &str {
        &self.pr_title
    }

    #[must_use]
    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    #[must_use]
    pub fn pr_body_max_chars(&self) -> usize {
        self.pr_body_max_chars
    }

    #[must_use]
    pub fn create_releases(&self) -> bool {
        self.create_releases
    }

    #[must_use]
    pub fn setup_git_user(&self) -> bool {
        self.setup_git_user
    }

    #[must_use]
    pub fn commit_mode(&self) -> CommitMode {
        self.commit_mode
    }

    #[must_use]
    pub fn version_command(&self) -> Option<&[String]> {
        self.version_command.as_deref()
    }

    #[must_use]
    pub fn publish_command(&self) -> Option<&[String]> {
        self.publish_command.as_deref()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn with_pr_title(mut self, title: impl Into<String>) -> Self {
        self.pr_title = title.into();
        self
    }

    #[must_use]
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    #[must_use]
    pub fn with_pr_body_max_chars(mut self, max: usize) -> Self {
        self.pr_body_max_chars = max;
        self
    }

    #[must_use]
    pub fn with_create_releases(mut self, create: bool) -> Self {
        self.create_releases = create;
        self
    }

    #[must_use]
    pub fn with_setup_git_user(mut self, setup: bool) -> Self {
        self.setup_git_user = setup;
        self
    }

    #[must_use]
    pub fn with_commit_mode(mut self, mode: CommitMode) -> Self {
        self.commit_mode = mode;
        self
    }

    #[must_use]
    pub fn with_version_command(mut self, command: Vec<String>) -> Self {
        self.version_command = Some(command).filter(|c| !c.is_empty());
        self
    }

    #[must_use]
    pub fn with_publish_command(mut self, command: Vec<String>) -> Self {
        self.publish_command = Some(command).filter(|c| !c.is_empty());
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }
}

fn build_release_config(metadata: Option<ReleaseMetadata>) -> ReleaseConfig {
    let defaults = ReleaseConfig::default();
    let Some(meta) = metadata else {
        return defaults;
    };

    ReleaseConfig {
        changeset_dir: meta
            .changeset_dir
            .map_or(defaults.changeset_dir, PathBuf::from),
        branch_prefix: meta.branch_prefix.unwrap_or(defaults.branch_prefix),
        pr_title: meta.pr_title.unwrap_or(defaults.pr_title),
        commit_message: meta.commit_message.unwrap_or(defaults.commit_message),
        pr_body_max_chars: meta.pr_body_max_chars.unwrap_or(defaults.pr_body_max_chars),
        create_releases: meta.create_releases.unwrap_or(defaults.create_releases),
        setup_git_user: meta.setup_git_user.unwrap_or(defaults.setup_git_user),
        commit_mode: meta.commit_mode.unwrap_or(defaults.commit_mode),
        version_command: meta.version_command.filter(|c| !c.is_empty()),
        publish_command: meta.publish_command.filter(|c| !c.is_empty()),
        labels: meta.labels,
    }
}

/// Reads the release configuration from the project's root manifest.
///
/// For single-package projects, reads from `[package.metadata.changeset-release]`.
/// For workspaces, reads from `[workspace.metadata.changeset-release]`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn parse_release_config(project: &CargoProject) -> Result<ReleaseConfig, ProjectError> {
    let manifest = read_manifest(&project.root.join("Cargo.toml"))?;

    let metadata = match project.kind {
        ProjectKind::SinglePackage => manifest
            .package
            .and_then(|pkg| pkg.metadata)
            .and_then(|meta| meta.release),
        ProjectKind::VirtualWorkspace | ProjectKind::WorkspaceWithRoot => manifest
            .workspace
            .and_then(|ws| ws.metadata)
            .and_then(|meta| meta.release),
    };

    Ok(build_release_config(metadata))
}
