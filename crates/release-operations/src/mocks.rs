use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use release_changelog::Changelog;
use release_core::{BumpType, Changeset, PackageInfo, PackageRelease};
use release_github::{GitHubError, NewPullRequest, NewRelease, PullRequestUpdate, TreeEntry};
use release_project::{CargoProject, PreReleaseState, ProjectKind};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ChangesetReader, CommandRunner, ForgeProvider, GitDataApi, ProjectProvider,
    ReleaseStateReader, ScmAdapter,
};
use crate::types::{CommandOutput, CommandSpec, GitIdentity};

/// Serves one project per `discover_project` call in the order given; the
/// last one is repeated once the queue runs dry. Queue a second project with
/// [`MockProjectProvider::with_versions_after`] to simulate the version
/// command rewriting manifests.
pub struct MockProjectProvider {
    projects: Mutex<VecDeque<CargoProject>>,
    changelogs: HashMap<PathBuf, String>,
}

impl MockProjectProvider {
    #[must_use]
    pub fn new(project: CargoProject) -> Self {
        Self {
            projects: Mutex::new(VecDeque::from([project])),
            changelogs: HashMap::new(),
        }
    }

    /// Workspace rooted at `/mock/workspace` with members under `crates/`.
    ///
    /// # Panics
    ///
    /// Panics if any version string is not valid semver.
    #[must_use]
    pub fn workspace(packages: &[(&str, &str)]) -> Self {
        let root = PathBuf::from("/mock/workspace");
        let packages = packages
            .iter()
            .map(|(name, version)| PackageInfo {
                name: (*name).to_string(),
                version: version.parse().expect("valid version"),
                path: root.join("crates").join(name),
                publishable: true,
            })
            .collect();

        Self::new(CargoProject {
            root,
            kind: ProjectKind::VirtualWorkspace,
            packages,
        })
    }

    /// # Panics
    ///
    /// Panics if the version string is not valid semver.
    #[must_use]
    pub fn single_package(name: &str, version: &str) -> Self {
        let root = PathBuf::from("/mock/project");
        Self::new(CargoProject {
            packages: vec![PackageInfo {
                name: name.to_string(),
                version: version.parse().expect("valid version"),
                path: root.clone(),
                publishable: true,
            }],
            root,
            kind: ProjectKind::SinglePackage,
        })
    }

    /// Queues a copy of the most recent project with the given package
    /// versions replaced.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned or a version is not valid semver.
    #[must_use]
    pub fn with_versions_after(self, versions: &[(&str, &str)]) -> Self {
        {
            let mut projects = self.projects.lock().expect("lock poisoned");
            let mut next = projects.back().cloned().expect("at least one project");
            for (name, version) in versions {
                if let Some(pkg) = next.packages.iter_mut().find(|p| p.name == *name) {
                    pkg.version = version.parse().expect("valid version");
                }
            }
            projects.push_back(next);
        }
        self
    }

    /// Marks the package as `publish = false` in every queued project.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn with_unpublishable(self, name: &str) -> Self {
        {
            let mut projects = self.projects.lock().expect("lock poisoned");
            for project in projects.iter_mut() {
                for pkg in project.packages.iter_mut().filter(|p| p.name == name) {
                    pkg.publishable = false;
                }
            }
        }
        self
    }

    #[must_use]
    pub fn with_changelog(mut self, package_dir: impl Into<PathBuf>, content: &str) -> Self {
        self.changelogs.insert(package_dir.into(), content.to_string());
        self
    }
}

impl ProjectProvider for MockProjectProvider {
    fn discover_project(&self, _start_path: &Path) -> Result<CargoProject> {
        let mut projects = self.projects.lock().expect("lock poisoned");
        let project = if projects.len() > 1 {
            projects.pop_front()
        } else {
            projects.front().cloned()
        };
        Ok(project.expect("mock project configured"))
    }

    fn read_changelog(&self, package_dir: &Path) -> Result<Option<Changelog>> {
        Ok(self.changelogs.get(package_dir).map(Changelog::new))
    }
}

impl ProjectProvider for Arc<MockProjectProvider> {
    fn discover_project(&self, start_path: &Path) -> Result<CargoProject> {
        (**self).discover_project(start_path)
    }

    fn read_changelog(&self, package_dir: &Path) -> Result<Option<Changelog>> {
        (**self).read_changelog(package_dir)
    }
}

#[derive(Default)]
pub struct MockChangesetReader {
    changesets: HashMap<PathBuf, Changeset>,
    listed_files: Vec<PathBuf>,
}

impl MockChangesetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_changeset(mut self, path: PathBuf, changeset: Changeset) -> Self {
        self.listed_files.push(path.clone());
        self.changesets.insert(path, changeset);
        self
    }
}

impl ChangesetReader for MockChangesetReader {
    fn list_changesets(&self, _changeset_dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.listed_files.clone())
    }

    fn read_changeset(&self, path: &Path) -> Result<Changeset> {
        self.changesets
            .get(path)
            .cloned()
            .ok_or_else(|| OperationError::ChangesetFileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock file not found"),
            })
    }
}

impl ChangesetReader for Arc<MockChangesetReader> {
    fn list_changesets(&self, changeset_dir: &Path) -> Result<Vec<PathBuf>> {
        (**self).list_changesets(changeset_dir)
    }

    fn read_changeset(&self, path: &Path) -> Result<Changeset> {
        (**self).read_changeset(path)
    }
}

#[derive(Default)]
pub struct MockReleaseStateIO {
    pre_state: Option<PreReleaseState>,
}

impl MockReleaseStateIO {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pre_state(mut self, state: PreReleaseState) -> Self {
        self.pre_state = Some(state);
        self
    }
}

impl ReleaseStateReader for MockReleaseStateIO {
    fn load_pre_state(&self, _changeset_dir: &Path) -> Result<Option<PreReleaseState>> {
        Ok(self.pre_state.clone())
    }
}

impl ReleaseStateReader for Arc<MockReleaseStateIO> {
    fn load_pre_state(&self, changeset_dir: &Path) -> Result<Option<PreReleaseState>> {
        (**self).load_pre_state(changeset_dir)
    }
}

/// Answers commands by their full command line; anything unconfigured
/// succeeds with empty output.
#[derive(Default)]
pub struct MockCommandRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl MockCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_response(mut self, command_line: &str, output: CommandOutput) -> Self {
        self.responses.insert(command_line.to_string(), output);
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(command.clone());

        Ok(self
            .responses
            .get(&command.to_string())
            .cloned()
            .unwrap_or_else(|| CommandOutput::success("")))
    }
}

impl CommandRunner for Arc<MockCommandRunner> {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        (**self).run(command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmCall {
    ConfigureIdentity(GitIdentity),
    PrepareBranch(String),
    CommitAllAndPush { branch: String, message: String },
    PushTag(String),
}

#[derive(Default)]
pub struct MockScm {
    existing_tags: HashSet<String>,
    failing_tags: HashSet<String>,
    fail_push: bool,
    calls: Mutex<Vec<ScmCall>>,
}

impl MockScm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `push_tag` reports the tag as already present on the remote.
    #[must_use]
    pub fn with_existing_tag(mut self, tag: &str) -> Self {
        self.existing_tags.insert(tag.to_string());
        self
    }

    /// `push_tag` fails for the tag as if the push was rejected.
    #[must_use]
    pub fn with_failing_tag(mut self, tag: &str) -> Self {
        self.failing_tags.insert(tag.to_string());
        self
    }

    #[must_use]
    pub fn with_failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<ScmCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn pushed_tags(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ScmCall::PushTag(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ScmCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

impl ScmAdapter for MockScm {
    fn configure_identity(&self, identity: &GitIdentity) -> Result<()> {
        self.record(ScmCall::ConfigureIdentity(identity.clone()));
        Ok(())
    }

    fn prepare_branch(&self, branch: &str) -> Result<()> {
        self.record(ScmCall::PrepareBranch(branch.to_string()));
        Ok(())
    }

    fn commit_all_and_push(&self, branch: &str, message: &str) -> Result<()> {
        self.record(ScmCall::CommitAllAndPush {
            branch: branch.to_string(),
            message: message.to_string(),
        });
        if self.fail_push {
            return Err(OperationError::CommandFailed {
                command: format!("git push origin HEAD:refs/heads/{branch} --force"),
                code: Some(1),
                stderr: "remote: Permission denied".to_string(),
            });
        }
        Ok(())
    }

    fn push_tag(&self, tag: &str) -> Result<()> {
        self.record(ScmCall::PushTag(tag.to_string()));
        if self.existing_tags.contains(tag) {
            return Err(OperationError::TagAlreadyExists {
                tag: tag.to_string(),
            });
        }
        if self.failing_tags.contains(tag) {
            return Err(OperationError::CommandFailed {
                command: format!("git push origin refs/tags/{tag}"),
                code: Some(1),
                stderr: "remote: rejected".to_string(),
            });
        }
        Ok(())
    }
}

impl ScmAdapter for Arc<MockScm> {
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeCall {
    FindOpenPull { head: String, base: String },
    CreatePull(NewPullRequest),
    UpdatePull { number: u64, update: PullRequestUpdate },
    AddLabels { number: u64, labels: Vec<String> },
    CreateRelease(NewRelease),
}

pub struct MockForge {
    open_pull: Option<u64>,
    next_pull_number: u64,
    fail_labels: bool,
    failing_releases: HashSet<String>,
    calls: Mutex<Vec<ForgeCall>>,
}

impl Default for MockForge {
    fn default() -> Self {
        Self {
            open_pull: None,
            next_pull_number: 1,
            fail_labels: false,
            failing_releases: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockForge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_open_pull(mut self, number: u64) -> Self {
        self.open_pull = Some(number);
        self
    }

    #[must_use]
    pub fn with_next_pull_number(mut self, number: u64) -> Self {
        self.next_pull_number = number;
        self
    }

    #[must_use]
    pub fn with_failing_labels(mut self) -> Self {
        self.fail_labels = true;
        self
    }

    #[must_use]
    pub fn with_failing_release(mut self, tag: &str) -> Self {
        self.failing_releases.insert(tag.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<ForgeCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn created_pulls(&self) -> Vec<NewPullRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ForgeCall::CreatePull(pull) => Some(pull),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn updated_pulls(&self) -> Vec<(u64, PullRequestUpdate)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ForgeCall::UpdatePull { number, update } => Some((number, update)),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn releases(&self) -> Vec<NewRelease> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ForgeCall::CreateRelease(release) => Some(release),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ForgeCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

fn api_error(status: u16, message: &str) -> OperationError {
    OperationError::GitHub(GitHubError::Api {
        status,
        message: message.to_string(),
        retry_after: None,
    })
}

impl ForgeProvider for MockForge {
    fn find_open_pull(&self, head_branch: &str, base: &str) -> Result<Option<u64>> {
        self.record(ForgeCall::FindOpenPull {
            head: head_branch.to_string(),
            base: base.to_string(),
        });
        Ok(self.open_pull)
    }

    fn create_pull(&self, pull: &NewPullRequest) -> Result<u64> {
        self.record(ForgeCall::CreatePull(pull.clone()));
        Ok(self.next_pull_number)
    }

    fn update_pull(&self, number: u64, update: &PullRequestUpdate) -> Result<()> {
        self.record(ForgeCall::UpdatePull {
            number,
            update: update.clone(),
        });
        Ok(())
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        self.record(ForgeCall::AddLabels {
            number,
            labels: labels.to_vec(),
        });
        if self.fail_labels {
            return Err(api_error(403, "Resource not accessible by integration"));
        }
        Ok(())
    }

    fn create_release(&self, release: &NewRelease) -> Result<()> {
        self.record(ForgeCall::CreateRelease(release.clone()));
        if self.failing_releases.contains(&release.tag_name) {
            return Err(api_error(422, "Validation Failed"));
        }
        Ok(())
    }
}

impl ForgeProvider for Arc<MockForge> {
    fn find_open_pull(&self, head_branch: &str, base: &str) -> Result<Option<u64>> {
        (**self).find_open_pull(head_branch, base)
    }

    fn create_pull(&self, pull: &NewPullRequest) -> Result<u64> {
        (**self).create_pull(pull)
    }

    fn update_pull(&self, number: u64, update: &PullRequestUpdate) -> Result<()> {
        (**self).update_pull(number, update)
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        (**self).add_labels(number, labels)
    }

    fn create_release(&self, release: &NewRelease) -> Result<()> {
        (**self).create_release(release)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitDataCall {
    BranchSha(String),
    CreateRef { name: String, sha: String },
    ForceUpdateRef { name: String, sha: String },
    /// Blob content, lossily decoded.
    CreateBlob(String),
    CreateTree {
        base_tree: String,
        entries: Vec<TreeEntry>,
    },
    CreateCommit { message: String, parents: Vec<String> },
}

#[derive(Default)]
pub struct MockGitData {
    branches: HashMap<String, String>,
    existing_refs: HashSet<String>,
    calls: Mutex<Vec<GitDataCall>>,
}

impl MockGitData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_branch(mut self, branch: &str, sha: &str) -> Self {
        self.branches.insert(branch.to_string(), sha.to_string());
        self
    }

    /// `create_ref` for `name` (relative to `refs/`) fails as already present.
    #[must_use]
    pub fn with_existing_ref(mut self, name: &str) -> Self {
        self.existing_refs.insert(name.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<GitDataCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Records the call and returns a fake sha numbered by call position.
    fn record(&self, call: GitDataCall, prefix: &str) -> String {
        let mut calls = self.calls.lock().expect("lock poisoned");
        calls.push(call);
        format!("{prefix}-{}", calls.len())
    }
}

impl GitDataApi for MockGitData {
    fn branch_sha(&self, branch: &str) -> Result<Option<String>> {
        self.record(GitDataCall::BranchSha(branch.to_string()), "branch");
        Ok(self.branches.get(branch).cloned())
    }

    fn create_ref(&self, name: &str, sha: &str) -> Result<()> {
        self.record(
            GitDataCall::CreateRef {
                name: name.to_string(),
                sha: sha.to_string(),
            },
            "ref",
        );
        if self.existing_refs.contains(name) {
            return Err(api_error(422, "Reference already exists"));
        }
        Ok(())
    }

    fn force_update_ref(&self, name: &str, sha: &str) -> Result<()> {
        self.record(
            GitDataCall::ForceUpdateRef {
                name: name.to_string(),
                sha: sha.to_string(),
            },
            "ref",
        );
        Ok(())
    }

    fn create_blob(&self, content: &[u8]) -> Result<String> {
        Ok(self.record(
            GitDataCall::CreateBlob(String::from_utf8_lossy(content).into_owned()),
            "blob",
        ))
    }

    fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        Ok(self.record(
            GitDataCall::CreateTree {
                base_tree: base_tree.to_string(),
                entries: entries.to_vec(),
            },
            "tree",
        ))
    }

    fn create_commit(&self, message: &str, _tree: &str, parents: &[String]) -> Result<String> {
        Ok(self.record(
            GitDataCall::CreateCommit {
                message: message.to_string(),
                parents: parents.to_vec(),
            },
            "commit",
        ))
    }
}

impl GitDataApi for Arc<MockGitData> {
    fn branch_sha(&self, branch: &str) -> Result<Option<String>> {
        (**self).branch_sha(branch)
    }

    fn create_ref(&self, name: &str, sha: &str) -> Result<()> {
        (**self).create_ref(name, sha)
    }

    fn force_update_ref(&self, name: &str, sha: &str) -> Result<()> {
        (**self).force_update_ref(name, sha)
    }

    fn create_blob(&self, content: &[u8]) -> Result<String> {
        (**self).create_blob(content)
    }

    fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        (**self).create_tree(base_tree, entries)
    }

    fn create_commit(&self, message: &str, tree: &str, parents: &[String]) -> Result<String> {
        (**self).create_commit(message, tree, parents)
    }
}

#[must_use]
pub fn make_changeset(id: &str, package_name: &str, bump: BumpType, summary: &str) -> Changeset {
    Changeset {
        id: id.to_string(),
        summary: summary.to_string(),
        releases: vec![PackageRelease {
            name: package_name.to_string(),
            bump_type: bump,
        }],
    }
}
