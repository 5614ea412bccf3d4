use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::GitHubError;

/// `owner/repo` coordinates of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Derives the coordinates from a git remote URL.
    ///
    /// Handles `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo`
    /// and the scp-like `git@host:owner/repo.git` form.
    #[must_use]
    pub fn from_remote_url(remote: &str) -> Option<Self> {
        let remote = remote.trim();

        let path = if let Ok(url) = Url::parse(remote) {
            url.path().to_string()
        } else {
            let (user_host, path) = remote.split_once(':')?;
            if user_host.contains('/') {
                return None;
            }
            path.to_string()
        };

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);

        let mut parts = path.rsplitn(2, '/');
        let name = parts.next().filter(|s| !s.is_empty())?;
        let owner = parts.next()?.rsplit('/').next().filter(|s| !s.is_empty())?;

        Some(Self::new(owner, name))
    }
}

impl FromStr for RepoId {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GitHubError::InvalidRepository(s.to_string());

        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
