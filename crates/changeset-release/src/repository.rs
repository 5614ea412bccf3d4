use std::path::Path;

use release_git::Repository;
use release_github::RepoId;

use crate::error::{CliError, Result};

/// `explicit` when given, otherwise the `origin` remote of the repository
/// at `root`.
pub(crate) fn resolve_repo(explicit: Option<&str>, root: &Path) -> Result<RepoId> {
    if let Some(repo) = explicit {
        return Ok(repo.parse()?);
    }

    let remote = Repository::open(root)?.remote_url()?;
    remote
        .as_deref()
        .and_then(RepoId::from_remote_url)
        .ok_or(CliError::UnknownRepository)
}

/// `explicit` when given, otherwise the branch checked out at `root`.
pub(crate) fn resolve_base_branch(explicit: Option<&str>, root: &Path) -> Result<String> {
    match explicit {
        Some(branch) => Ok(branch.to_string()),
        None => Ok(Repository::open(root)?.current_branch()?),
    }
}
