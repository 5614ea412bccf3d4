use release_github::TreeEntry;

use crate::Result;

/// Remote git object and reference endpoints used for API-mode commits.
pub trait GitDataApi: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the lookup fails for a reason other than absence.
    fn branch_sha(&self, branch: &str) -> Result<Option<String>>;

    /// Creates `refs/<name>`. An existing ref yields an error for which
    /// `GitHubError::is_already_exists` holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the ref cannot be created.
    fn create_ref(&self, name: &str, sha: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the ref cannot be updated.
    fn force_update_ref(&self, name: &str, sha: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the blob cannot be uploaded.
    fn create_blob(&self, content: &[u8]) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the tree cannot be created.
    fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn create_commit(&self, message: &str, tree: &str, parents: &[String]) -> Result<String>;
}
