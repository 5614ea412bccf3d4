use std::path::Path;

use release_core::CommitMode;
use serde::Deserialize;

use crate::error::ProjectError;

#[derive(Debug, Deserialize)]
pub(crate) struct CargoManifest {
    pub(crate) package: Option<Package>,
    pub(crate) workspace: Option<WorkspaceSection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Package {
    pub(crate) name: String,
    pub(crate) version: Option<VersionField>,
    pub(crate) publish: Option<PublishField>,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VersionField {
    Literal(String),
    Inherited(InheritedVersion),
}

#[derive(Debug, Deserialize)]
pub(crate) struct InheritedVersion {
    pub(crate) workspace: bool,
}

/// `publish = false` or `publish = ["registry", ...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PublishField {
    Flag(bool),
    Registries(Vec<String>),
}

impl PublishField {
    pub(crate) fn allows_publishing(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Registries(registries) => !registries.is_empty(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceSection {
    pub(crate) members: Option<Vec<String>>,
    pub(crate) exclude: Option<Vec<String>>,
    pub(crate) package: Option<WorkspacePackage>,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspacePackage {
    pub(crate) version: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Metadata {
    #[serde(rename = "changeset-release")]
    pub(crate) release: Option<ReleaseMetadata>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct ReleaseMetadata {
    pub(crate) changeset_dir: Option<String>,
    pub(crate) branch_prefix: Option<String>,
    pub(crate) pr_title: Option<String>,
    pub(crate) commit_message: Option<String>,
    pub(crate) pr_body_max_chars: Option<usize>,
    pub(crate) create_releases: Option<bool>,
    pub(crate) setup_git_user: Option<bool>,
    pub(crate) commit_mode: Option<CommitMode>,
    pub(crate) version_command: Option<Vec<String>>,
    pub(crate) publish_command: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) labels: Vec<String>,
}

pub(crate) fn read_manifest(path: &Path) -> Result<CargoManifest, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ProjectError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}
