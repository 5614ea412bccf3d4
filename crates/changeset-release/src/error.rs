use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine the current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("project error")]
    Project(#[from] release_project::ProjectError),

    #[error("git error")]
    Git(#[from] release_git::GitError),

    #[error("GitHub client error")]
    GitHub(#[from] release_github::GitHubError),

    #[error("release failed")]
    Operation(#[from] release_operations::OperationError),

    #[error("a GitHub token is required: pass --github-token or set GITHUB_TOKEN")]
    MissingToken,

    #[error(
        "cannot determine the GitHub repository: pass --repo, set GITHUB_REPOSITORY or add an 'origin' remote"
    )]
    UnknownRepository,

    #[error("failed to write outputs to '{path}'")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize published packages")]
    OutputSerialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
