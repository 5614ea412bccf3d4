mod config;
mod error;
mod manifest;
mod project;
mod release_state;

pub const DEFAULT_CHANGESET_DIR: &str = ".changeset";

pub use config::{DEFAULT_PR_BODY_MAX_CHARS, ReleaseConfig, parse_release_config};
pub use error::ProjectError;
pub use project::{CargoProject, ProjectKind, discover_project};
pub use release_state::{PreMode, PreReleaseState};

pub type Result<T> = std::result::Result<T, ProjectError>;
