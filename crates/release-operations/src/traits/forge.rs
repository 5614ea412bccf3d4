use release_github::{NewPullRequest, NewRelease, PullRequestUpdate};

use crate::Result;

/// Pull requests, labels and releases on the hosting service.
pub trait ForgeProvider: Send + Sync {
    /// Number of an open pull request from `head_branch` into `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_open_pull(&self, head_branch: &str, base: &str) -> Result<Option<u64>>;

    /// # Errors
    ///
    /// Returns an error if the pull request cannot be created.
    fn create_pull(&self, pull: &NewPullRequest) -> Result<u64>;

    /// # Errors
    ///
    /// Returns an error if the pull request cannot be updated.
    fn update_pull(&self, number: u64, update: &PullRequestUpdate) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the labels cannot be applied.
    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the release cannot be created.
    fn create_release(&self, release: &NewRelease) -> Result<()>;
}
