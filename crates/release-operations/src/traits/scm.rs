use crate::Result;
use crate::types::GitIdentity;

/// Mutations of the remote repository. Implementations are fixed to one
/// mechanism (local `git` or the git data API) for their whole lifetime.
pub trait ScmAdapter {
    /// # Errors
    ///
    /// Returns an error if the identity cannot be configured.
    fn configure_identity(&self, identity: &GitIdentity) -> Result<()>;

    /// Points the working branch at the current base commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch cannot be prepared.
    fn prepare_branch(&self, branch: &str) -> Result<()>;

    /// Commits every working tree change and force-updates the remote `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit or push fails.
    fn commit_all_and_push(&self, branch: &str, message: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`crate::OperationError::TagAlreadyExists`] if the remote already
    /// has the tag, or another error if the push fails.
    fn push_tag(&self, tag: &str) -> Result<()>;
}

impl<T: ScmAdapter + ?Sized> ScmAdapter for Box<T> {
    fn configure_identity(&self, identity: &GitIdentity) -> Result<()> {
        (**self).configure_identity(identity)
    }

    fn prepare_branch(&self, branch: &str) -> Result<()> {
        (**self).prepare_branch(branch)
    }

    fn commit_all_and_push(&self, branch: &str, message: &str) -> Result<()> {
        (**self).commit_all_and_push(branch, message)
    }

    fn push_tag(&self, tag: &str) -> Result<()> {
        (**self).push_tag(tag)
    }
}
