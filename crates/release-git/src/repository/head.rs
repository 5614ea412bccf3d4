use crate::{CommitInfo, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if HEAD does not point at a commit.
    pub fn head_commit(&self) -> Result<CommitInfo> {
        let commit = self.inner.head()?.peel_to_commit()?;

        Ok(CommitInfo {
            sha: commit.id().to_string(),
            tree_sha: commit.tree_id().to_string(),
        })
    }
}
