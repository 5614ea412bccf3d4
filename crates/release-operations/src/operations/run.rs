use std::collections::HashSet;
use std::path::{Path, PathBuf};

use release_core::PublishedPackage;
use release_github::{NewPullRequest, NewRelease, PullRequestUpdate};
use release_parse::{mentions_new_tag, parse_publish_output};
use release_project::{CargoProject, PreMode, ReleaseConfig};
use tracing::{debug, info, warn};

use super::package_diff::{ChangedPackage, VersionSnapshot, diff_versions, relative_dir};
use super::pr_body::PrBodyBuilder;
use super::release_plan::{ReleasePlan, read_release_plan};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ChangesetReader, CommandRunner, ForgeProvider, ProjectProvider, ReleaseStateReader,
    ScmAdapter,
};
use crate::types::{CommandOutput, CommandSpec, GitIdentity};

const DEFAULT_VERSION_COMMAND: [&str; 3] = ["cargo", "changeset", "version"];

pub struct RunInput {
    pub start_path: PathBuf,
    /// Branch the version PR targets and the publish flow runs on.
    pub base_branch: String,
    pub dry_run: bool,
    pub identity: GitIdentity,
    pub config: ReleaseConfig,
    /// Web URL of the repository, e.g. `https://github.com/acme/monorepo`;
    /// used to link changelogs from collapsed PR sections.
    pub repository_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    NoChangesets,
    EmptyChangesets,
    NoVersionChanges,
    DryRun,
}

#[derive(Debug, Clone)]
pub struct VersionOutcome {
    pub branch: String,
    /// `None` on a dry run.
    pub pr_number: Option<u64>,
    /// Whether the pull request was opened by this run rather than updated.
    pub created: bool,
    pub body: String,
    pub packages: Vec<ChangedPackage>,
}

#[derive(Debug, Clone, Default)]
pub struct PublishOutcome {
    pub published: bool,
    pub packages: Vec<PublishedPackage>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    NoOp(NoOpReason),
    Version(VersionOutcome),
    Published(PublishOutcome),
}

impl RunOutcome {
    /// Whether pending changesets were found, empty ones included.
    #[must_use]
    pub fn has_changesets(&self) -> bool {
        match self {
            Self::Version(_) => true,
            Self::NoOp(reason) => matches!(
                reason,
                NoOpReason::EmptyChangesets | NoOpReason::NoVersionChanges
            ),
            Self::Published(_) => false,
        }
    }

    #[must_use]
    pub fn published(&self) -> Option<&PublishOutcome> {
        match self {
            Self::Published(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn pr_number(&self) -> Option<u64> {
        match self {
            Self::Version(outcome) => outcome.pr_number,
            _ => None,
        }
    }
}

/// A package matched from the publish output, with the tag to push for it.
struct PublishTarget {
    package: PublishedPackage,
    tag: String,
    dir: PathBuf,
}

pub struct RunOperation<P, R, S, C, G, F> {
    project_provider: P,
    changeset_reader: R,
    state_reader: S,
    command_runner: C,
    scm: G,
    forge: F,
}

impl<P, R, S, C, G, F> RunOperation<P, R, S, C, G, F>
where
    P: ProjectProvider,
    R: ChangesetReader,
    S: ReleaseStateReader,
    C: CommandRunner,
    G: ScmAdapter,
    F: ForgeProvider,
{
    pub fn new(
        project_provider: P,
        changeset_reader: R,
        state_reader: S,
        command_runner: C,
        scm: G,
        forge: F,
    ) -> Self {
        Self {
            project_provider,
            changeset_reader,
            state_reader,
            command_runner,
            scm,
            forge,
        }
    }

    /// Versions when releasable changesets are pending, publishes when none
    /// are pending and a publish command is configured, and does nothing
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a changeset cannot be read, the version or publish
    /// command fails, pushing the version branch fails, or the pull request
    /// cannot be created or updated. Tag, release and label failures are
    /// logged and skipped.
    pub fn execute(&self, input: &RunInput) -> Result<RunOutcome> {
        let project = self.project_provider.discover_project(&input.start_path)?;
        let changeset_dir = project.root.join(input.config.changeset_dir());
        let plan = read_release_plan(&self.changeset_reader, &self.state_reader, &changeset_dir)?;

        if !plan.has_changesets() {
            return match input.config.publish_command() {
                Some(command) => self.publish(&project, command, input),
                None => {
                    info!("no changesets and no publish command, nothing to do");
                    Ok(RunOutcome::NoOp(NoOpReason::NoChangesets))
                }
            };
        }

        if !plan.has_releases() {
            info!(
                changesets = plan.changesets.len(),
                "all changesets are empty, nothing to version"
            );
            return Ok(RunOutcome::NoOp(NoOpReason::EmptyChangesets));
        }

        self.version(&project, &plan, input)
    }

    fn version(
        &self,
        project: &CargoProject,
        plan: &ReleasePlan,
        input: &RunInput,
    ) -> Result<RunOutcome> {
        let config = &input.config;
        let branch = config.version_branch(&input.base_branch);
        info!(
            %branch,
            changesets = plan.changesets.len(),
            "pending changesets found, preparing version pull request"
        );

        if config.setup_git_user() {
            self.scm.configure_identity(&input.identity)?;
        }
        self.scm.prepare_branch(&branch)?;

        let before = VersionSnapshot::capture(project);
        let version_command = config.version_command().map_or_else(
            || DEFAULT_VERSION_COMMAND.iter().map(ToString::to_string).collect(),
            <[String]>::to_vec,
        );
        self.run_command(&version_command, &project.root, "version")?;

        let versioned = self.project_provider.discover_project(&project.root)?;
        let after = VersionSnapshot::capture(&versioned);
        let packages = self.changed_packages(&versioned, &before, &diff_versions(&before, &after))?;

        if packages.is_empty() {
            info!("version command changed no package versions");
            return Ok(RunOutcome::NoOp(NoOpReason::NoVersionChanges));
        }

        let title = with_pre_tag(config.pr_title(), plan.pre_tag());
        let commit_message = with_pre_tag(config.commit_message(), plan.pre_tag());
        let pre_mode = plan
            .pre_state
            .as_ref()
            .is_some_and(|state| state.mode() == PreMode::Pre);

        let body = PrBodyBuilder::new(&input.base_branch)
            .with_max_chars(config.pr_body_max_chars())
            .with_pre_release(pre_mode)
            .with_changelog_url_base(
                input
                    .repository_url
                    .as_ref()
                    .map(|url| format!("{}/blob/{branch}", url.trim_end_matches('/'))),
            )
            .build(&packages);

        if body.truncated {
            warn!(
                max_chars = config.pr_body_max_chars(),
                "pull request body exceeded the size limit and was truncated"
            );
        } else if body.collapsed > 0 {
            info!(
                collapsed = body.collapsed,
                "collapsed changelog sections to fit the pull request body"
            );
        }

        if input.dry_run {
            info!(%branch, packages = packages.len(), "dry run, skipping commit and pull request");
            return Ok(RunOutcome::Version(VersionOutcome {
                branch,
                pr_number: None,
                created: false,
                body: body.text,
                packages,
            }));
        }

        let existing = self.forge.find_open_pull(&branch, &input.base_branch)?;

        self.scm.commit_all_and_push(&branch, &commit_message)?;

        let (number, created) = match existing {
            Some(number) => {
                info!(number, "updating version pull request");
                self.forge.update_pull(
                    number,
                    &PullRequestUpdate {
                        title: Some(title),
                        body: Some(body.text.clone()),
                    },
                )?;
                (number, false)
            }
            None => {
                let number = self.forge.create_pull(&NewPullRequest {
                    title,
                    head: branch.clone(),
                    base: input.base_branch.clone(),
                    body: body.text.clone(),
                })?;
                info!(number, "created version pull request");
                (number, true)
            }
        };

        if !config.labels().is_empty() {
            if let Err(err) = self.forge.add_labels(number, config.labels()) {
                warn!(number, error = %err, "failed to label version pull request");
            }
        }

        Ok(RunOutcome::Version(VersionOutcome {
            branch,
            pr_number: Some(number),
            created,
            body: body.text,
            packages,
        }))
    }

    fn changed_packages(
        &self,
        project: &CargoProject,
        before: &VersionSnapshot,
        changed_dirs: &[PathBuf],
    ) -> Result<Vec<ChangedPackage>> {
        let mut changed = Vec::new();

        for dir in changed_dirs {
            let Some(pkg) = project.packages.iter().find(|p| &p.path == dir) else {
                debug!(path = %dir.display(), "package was removed by the version command");
                continue;
            };

            let new_version = pkg.version.to_string();
            let changelog = self
                .project_provider
                .read_changelog(&pkg.path)?
                .and_then(|c| c.entry_for_version(&new_version));

            if changelog.is_none() {
                debug!(
                    package = %pkg.name,
                    version = %new_version,
                    "no changelog entry for new version"
                );
            }

            changed.push(ChangedPackage {
                name: pkg.name.clone(),
                old_version: before.get(&pkg.path).map(str::to_string),
                new_version,
                relative_dir: relative_dir(&project.root, &pkg.path),
                publishable: pkg.publishable,
                changelog,
            });
        }

        Ok(changed)
    }

    fn publish(
        &self,
        project: &CargoProject,
        command: &[String],
        input: &RunInput,
    ) -> Result<RunOutcome> {
        let config = &input.config;

        if input.dry_run {
            info!(command = %command.join(" "), "dry run, skipping publish");
            return Ok(RunOutcome::NoOp(NoOpReason::DryRun));
        }

        info!("no pending changesets, running publish command");
        if config.setup_git_user() {
            self.scm.configure_identity(&input.identity)?;
        }

        let output = self.run_command(command, &project.root, "publish")?;
        let targets = match_published(project, &output.combined());

        if targets.is_empty() {
            info!("publish command released no packages");
            return Ok(RunOutcome::Published(PublishOutcome::default()));
        }

        let mut tagged = Vec::new();
        for target in &targets {
            match self.scm.push_tag(&target.tag) {
                Ok(()) => {
                    info!(tag = %target.tag, "pushed tag");
                    tagged.push(target);
                }
                Err(OperationError::TagAlreadyExists { tag }) => {
                    warn!(%tag, "tag already exists, skipping");
                }
                Err(err) => {
                    warn!(tag = %target.tag, error = %err, "failed to push tag, skipping");
                }
            }
        }

        if config.create_releases() {
            for target in tagged {
                self.create_release(target);
            }
        }

        Ok(RunOutcome::Published(PublishOutcome {
            published: true,
            packages: targets.into_iter().map(|t| t.package).collect(),
        }))
    }

    fn create_release(&self, target: &PublishTarget) {
        let body = match self.project_provider.read_changelog(&target.dir) {
            Ok(changelog) => changelog
                .and_then(|c| c.entry_for_version(&target.package.version))
                .map(|entry| entry.content)
                .unwrap_or_default(),
            Err(err) => {
                warn!(tag = %target.tag, error = %err, "failed to read changelog for release");
                String::new()
            }
        };

        let release = NewRelease {
            tag_name: target.tag.clone(),
            name: target.tag.clone(),
            body,
            prerelease: is_prerelease(&target.package.version),
            target_commitish: None,
        };

        match self.forge.create_release(&release) {
            Ok(()) => info!(tag = %target.tag, "created release"),
            Err(err) => warn!(tag = %target.tag, error = %err, "failed to create release"),
        }
    }

    fn run_command(
        &self,
        parts: &[String],
        cwd: &Path,
        purpose: &'static str,
    ) -> Result<CommandOutput> {
        let command = CommandSpec::from_parts(parts, cwd)
            .ok_or(OperationError::EmptyCommand { purpose })?;

        info!(%command, "running {purpose} command");
        let output = self.command_runner.run(&command)?;

        if !output.success {
            return Err(OperationError::CommandFailed {
                command: command.to_string(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }
}

/// Matches `New tag:` announcements against the project's packages.
///
/// A single-package project releases its root package under `v<version>`
/// whenever any announcement appears. Workspaces tag `<name>@<version>` and
/// ignore names they do not contain. Repeated announcements of the same
/// release are reported once, in first-seen order.
fn match_published(project: &CargoProject, output: &str) -> Vec<PublishTarget> {
    if !project.is_workspace() {
        let Some(pkg) = project.packages.first() else {
            return Vec::new();
        };
        if !mentions_new_tag(output) {
            return Vec::new();
        }
        let version = pkg.version.to_string();
        return vec![PublishTarget {
            tag: format!("v{version}"),
            package: PublishedPackage::new(&pkg.name, version),
            dir: pkg.path.clone(),
        }];
    }

    let mut seen = HashSet::new();
    parse_publish_output(output)
        .into_iter()
        .filter(|candidate| seen.insert((candidate.name.clone(), candidate.version.clone())))
        .filter_map(|candidate| {
            let Some(pkg) = project.package(&candidate.name) else {
                warn!(
                    package = %candidate.name,
                    version = %candidate.version,
                    "publish output names a package outside the workspace, ignoring"
                );
                return None;
            };
            let package = PublishedPackage::new(candidate.name, candidate.version);
            Some(PublishTarget {
                tag: package.tag_name(),
                package,
                dir: pkg.path.clone(),
            })
        })
        .collect()
}

fn with_pre_tag(text: &str, pre_tag: Option<&str>) -> String {
    match pre_tag {
        Some(tag) => format!("{text} ({tag})"),
        None => text.to_string(),
    }
}

fn is_prerelease(version: &str) -> bool {
    semver::Version::parse(version).is_ok_and(|v| !v.pre.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_core::PackageInfo;
    use release_project::ProjectKind;

    fn workspace() -> CargoProject {
        let root = PathBuf::from("/repo");
        CargoProject {
            packages: vec![
                PackageInfo {
                    name: "pkg-a".to_string(),
                    version: "1.2.0".parse().expect("valid version"),
                    path: root.join("crates/pkg-a"),
                    publishable: true,
                },
                PackageInfo {
                    name: "@scope/pkg-b".to_string(),
                    version: "2.0.0".parse().expect("valid version"),
                    path: root.join("crates/pkg-b"),
                    publishable: true,
                },
            ],
            root,
            kind: ProjectKind::VirtualWorkspace,
        }
    }

    #[test]
    fn matches_only_local_packages() {
        let output = "New tag: pkg-a@1.2.0\nNew tag: @scope/pkg-b@2.0.0\nNew tag: stranger@0.1.0\n";

        let targets = match_published(&workspace(), output);

        let tags: Vec<_> = targets.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["pkg-a@1.2.0", "@scope/pkg-b@2.0.0"]);
        assert_eq!(targets[1].dir, PathBuf::from("/repo/crates/pkg-b"));
    }

    #[test]
    fn announcements_on_both_streams_yield_one_target() {
        let output = CommandOutput {
            success: true,
            code: Some(0),
            stdout: "New tag: pkg-a@1.2.0\n".to_string(),
            stderr: "\u{1f98b}  New tag: pkg-a@1.2.0\nNew tag: @scope/pkg-b@2.0.0\n".to_string(),
        };

        let targets = match_published(&workspace(), &output.combined());

        let tags: Vec<_> = targets.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["pkg-a@1.2.0", "@scope/pkg-b@2.0.0"]);
    }

    #[test]
    fn single_package_uses_v_prefixed_tag() {
        let root = PathBuf::from("/solo");
        let project = CargoProject {
            packages: vec![PackageInfo {
                name: "solo".to_string(),
                version: "0.3.1".parse().expect("valid version"),
                path: root.clone(),
                publishable: true,
            }],
            root,
            kind: ProjectKind::SinglePackage,
        };

        let targets = match_published(&project, "New tag: whatever@0.3.1\n");

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].tag, "v0.3.1");
        assert_eq!(targets[0].package, PublishedPackage::new("solo", "0.3.1"));
        assert!(match_published(&project, "Nothing published\n").is_empty());
    }

    #[test]
    fn pre_tag_suffix() {
        assert_eq!(with_pre_tag("Version Packages", None), "Version Packages");
        assert_eq!(
            with_pre_tag("Version Packages", Some("beta")),
            "Version Packages (beta)"
        );
    }

    #[test]
    fn prerelease_detection() {
        assert!(is_prerelease("2.0.0-beta.1"));
        assert!(!is_prerelease("2.0.0"));
        assert!(!is_prerelease("not-a-version"));
    }

    #[test]
    fn has_changesets_per_outcome() {
        assert!(!RunOutcome::NoOp(NoOpReason::NoChangesets).has_changesets());
        assert!(RunOutcome::NoOp(NoOpReason::EmptyChangesets).has_changesets());
        assert!(!RunOutcome::Published(PublishOutcome::default()).has_changesets());
    }
}
