use release_github::{
    GitHubClient, NewPullRequest, NewRelease, PullRequestUpdate, TreeEntry,
};

use crate::Result;
use crate::traits::{ForgeProvider, GitDataApi};

impl ForgeProvider for GitHubClient {
    fn find_open_pull(&self, head_branch: &str, base: &str) -> Result<Option<u64>> {
        let pulls = self.find_open_pulls(head_branch, base)?;
        Ok(pulls.first().map(|pull| pull.number))
    }

    fn create_pull(&self, pull: &NewPullRequest) -> Result<u64> {
        Ok(GitHubClient::create_pull(self, pull)?.number)
    }

    fn update_pull(&self, number: u64, update: &PullRequestUpdate) -> Result<()> {
        GitHubClient::update_pull(self, number, update)?;
        Ok(())
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        Ok(GitHubClient::add_labels(self, number, labels)?)
    }

    fn create_release(&self, release: &NewRelease) -> Result<()> {
        GitHubClient::create_release(self, release)?;
        Ok(())
    }
}

impl GitDataApi for GitHubClient {
    fn branch_sha(&self, branch: &str) -> Result<Option<String>> {
        Ok(GitHubClient::branch_sha(self, branch)?)
    }

    fn create_ref(&self, name: &str, sha: &str) -> Result<()> {
        Ok(GitHubClient::create_ref(self, name, sha)?)
    }

    fn force_update_ref(&self, name: &str, sha: &str) -> Result<()> {
        Ok(GitHubClient::force_update_ref(self, name, sha)?)
    }

    fn create_blob(&self, content: &[u8]) -> Result<String> {
        Ok(GitHubClient::create_blob(self, content)?)
    }

    fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        Ok(GitHubClient::create_tree(self, base_tree, entries)?)
    }

    fn create_commit(&self, message: &str, tree: &str, parents: &[String]) -> Result<String> {
        Ok(GitHubClient::create_commit(self, message, tree, parents)?)
    }
}
