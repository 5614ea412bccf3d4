use std::path::{Path, PathBuf};

use release_git::{FileStatus, Repository};
use release_github::TreeEntry;
use tracing::{debug, info};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{GitDataApi, ScmAdapter};
use crate::types::GitIdentity;

/// Commits through the git data API: the working tree is read locally and
/// rebuilt remotely as blobs, a tree and a commit on top of HEAD.
pub struct ApiScm<A> {
    root: PathBuf,
    api: A,
}

impl<A: GitDataApi> ApiScm<A> {
    #[must_use]
    pub fn new(root: &Path, api: A) -> Self {
        Self {
            root: root.to_path_buf(),
            api,
        }
    }

    fn build_commit(&self, repo: &Repository, message: &str) -> Result<String> {
        let head = repo.head_commit()?;
        let changes = repo.working_tree_changes()?;

        if changes.is_empty() {
            debug!("working tree matches HEAD, pointing branch at HEAD");
            return Ok(head.sha);
        }

        let mut entries = Vec::with_capacity(changes.len());
        for change in &changes {
            let entry = match change.status {
                FileStatus::Deleted => TreeEntry::deletion(&change.path),
                FileStatus::Added | FileStatus::Modified => {
                    let file = repo.read_worktree_file(Path::new(&change.path))?;
                    let sha = self.api.create_blob(&file.content)?;
                    TreeEntry::blob(&change.path, file.mode(), sha)
                }
            };
            entries.push(entry);
        }

        let tree = self.api.create_tree(&head.tree_sha, &entries)?;
        let commit = self.api.create_commit(message, &tree, &[head.sha])?;
        debug!(files = changes.len(), %commit, "created commit through API");
        Ok(commit)
    }
}

impl<A: GitDataApi> ScmAdapter for ApiScm<A> {
    fn configure_identity(&self, _identity: &GitIdentity) -> Result<()> {
        Ok(())
    }

    fn prepare_branch(&self, _branch: &str) -> Result<()> {
        Ok(())
    }

    fn commit_all_and_push(&self, branch: &str, message: &str) -> Result<()> {
        let repo = Repository::open(&self.root)?;
        let commit = self.build_commit(&repo, message)?;

        let ref_name = format!("heads/{branch}");
        if self.api.branch_sha(branch)?.is_some() {
            self.api.force_update_ref(&ref_name, &commit)?;
        } else {
            self.api.create_ref(&ref_name, &commit)?;
        }

        info!(branch, %commit, "updated version branch");
        Ok(())
    }

    fn push_tag(&self, tag: &str) -> Result<()> {
        let repo = Repository::open(&self.root)?;
        let head = repo.head_commit()?;

        match self.api.create_ref(&format!("tags/{tag}"), &head.sha) {
            Ok(()) => Ok(()),
            Err(OperationError::GitHub(e)) if e.is_already_exists() => {
                Err(OperationError::TagAlreadyExists {
                    tag: tag.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{GitDataCall, MockGitData};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup_repo() -> anyhow::Result<(TempDir, git2::Oid)> {
        let dir = TempDir::new()?;
        let repo = git2::Repository::init(dir.path())?;
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n")?;
        fs::create_dir_all(dir.path().join(".changeset"))?;
        fs::write(dir.path().join(".changeset/brave-lions.md"), "---\n---\n")?;

        let mut index = repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let sig = git2::Signature::now("Test", "test@example.com")?;
        let oid = repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?;
        Ok((dir, oid))
    }

    #[test]
    fn identity_and_branch_preparation_are_no_ops() -> anyhow::Result<()> {
        let (dir, _) = setup_repo()?;
        let api = Arc::new(MockGitData::new());
        let scm = ApiScm::new(dir.path(), Arc::clone(&api));

        scm.configure_identity(&GitIdentity::default())?;
        scm.prepare_branch("changeset-release/main")?;

        assert!(api.calls().is_empty());

        Ok(())
    }

    #[test]
    fn commit_uploads_changes_and_creates_missing_branch() -> anyhow::Result<()> {
        let (dir, head) = setup_repo()?;
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\nmembers = []\n")?;
        fs::remove_file(dir.path().join(".changeset/brave-lions.md"))?;

        let api = Arc::new(MockGitData::new());
        let scm = ApiScm::new(dir.path(), Arc::clone(&api));

        scm.commit_all_and_push("changeset-release/main", "Version Packages")?;

        let calls = api.calls();
        assert_eq!(calls[0], GitDataCall::CreateBlob("[workspace]\nmembers = []\n".to_string()));
        let GitDataCall::CreateTree { entries, .. } = &calls[1] else {
            panic!("expected tree creation, got {:?}", calls[1]);
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], TreeEntry::deletion(".changeset/brave-lions.md"));
        assert_eq!(entries[1].path, "Cargo.toml");
        assert_eq!(entries[1].mode, "100644");
        assert_eq!(
            calls[2],
            GitDataCall::CreateCommit {
                message: "Version Packages".to_string(),
                parents: vec![head.to_string()],
            }
        );
        assert_eq!(calls[3], GitDataCall::BranchSha("changeset-release/main".to_string()));
        assert!(matches!(
            &calls[4],
            GitDataCall::CreateRef { name, .. } if name == "heads/changeset-release/main"
        ));

        Ok(())
    }

    #[test]
    fn existing_branch_is_force_updated() -> anyhow::Result<()> {
        let (dir, head) = setup_repo()?;
        let api = Arc::new(MockGitData::new().with_branch("changeset-release/main", "old-sha"));
        let scm = ApiScm::new(dir.path(), Arc::clone(&api));

        scm.commit_all_and_push("changeset-release/main", "Version Packages")?;

        let calls = api.calls();
        assert_eq!(
            calls.last(),
            Some(&GitDataCall::ForceUpdateRef {
                name: "heads/changeset-release/main".to_string(),
                sha: head.to_string(),
            })
        );
        assert!(!calls.iter().any(|c| matches!(c, GitDataCall::CreateCommit { .. })));

        Ok(())
    }

    #[test]
    fn push_tag_points_at_head() -> anyhow::Result<()> {
        let (dir, head) = setup_repo()?;
        let api = Arc::new(MockGitData::new());
        let scm = ApiScm::new(dir.path(), Arc::clone(&api));

        scm.push_tag("pkg-a@1.2.0")?;

        assert_eq!(
            api.calls(),
            vec![GitDataCall::CreateRef {
                name: "tags/pkg-a@1.2.0".to_string(),
                sha: head.to_string(),
            }]
        );

        Ok(())
    }

    #[test]
    fn existing_remote_tag_is_reported() -> anyhow::Result<()> {
        let (dir, _) = setup_repo()?;
        let api = Arc::new(MockGitData::new().with_existing_ref("tags/pkg-a@1.2.0"));
        let scm = ApiScm::new(dir.path(), Arc::clone(&api));

        let err = scm.push_tag("pkg-a@1.2.0").expect_err("tag exists");

        assert!(matches!(err, OperationError::TagAlreadyExists { tag } if tag == "pkg-a@1.2.0"));

        Ok(())
    }
}
