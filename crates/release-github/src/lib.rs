mod client;
mod error;
mod repo;
mod retry;
mod types;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use error::{GitHubError, Result};
pub use repo::RepoId;
pub use retry::RetryConfig;
pub use types::{
    CreatedRelease, NewPullRequest, NewRelease, PullRequest, PullRequestUpdate, TreeEntry,
};
