use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] release_core::CoreError),

    #[error(transparent)]
    Git(#[from] release_git::GitError),

    #[error(transparent)]
    GitHub(#[from] release_github::GitHubError),

    #[error(transparent)]
    Project(#[from] release_project::ProjectError),

    #[error(transparent)]
    Changelog(#[from] release_changelog::ChangelogError),

    #[error("failed to read changeset file '{path}'")]
    ChangesetFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse changeset file '{path}'")]
    ChangesetParse {
        path: PathBuf,
        #[source]
        source: release_parse::FormatError,
    },

    #[error("failed to list changeset files in '{path}'")]
    ChangesetList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read release state file '{path}'")]
    ReleaseStateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse release state file '{path}'")]
    ReleaseStateParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to start '{program}'")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {}: {}", describe_exit(*code), stderr.trim())]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{purpose} command is empty")]
    EmptyCommand { purpose: &'static str },

    #[error("tag '{tag}' already exists")]
    TagAlreadyExists { tag: String },

    #[error("commit mode 'api' requires a GitHub token")]
    ApiModeRequiresToken,
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

pub type Result<T> = std::result::Result<T, OperationError>;
