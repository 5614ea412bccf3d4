use std::path::Path;

use release_github::GitHubClient;
use release_operations::GitIdentity;
use release_operations::operations::{RunInput, RunOperation, RunOutcome};
use release_operations::providers::{
    FileSystemChangesetIO, FileSystemProjectProvider, FileSystemReleaseStateIO,
    ProcessCommandRunner, select_scm,
};
use release_project::{ReleaseConfig, discover_project, parse_release_config};
use tracing::info;

use crate::Cli;
use crate::error::{CliError, Result};
use crate::output::{ActionOutputs, write_outputs};
use crate::repository::{resolve_base_branch, resolve_repo};

pub(crate) fn execute(cli: &Cli, start_path: &Path) -> Result<()> {
    let token = cli
        .github_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(CliError::MissingToken)?;

    let project = discover_project(start_path)?;
    let config = apply_overrides(parse_release_config(&project)?, cli);

    let repo = resolve_repo(cli.repo.as_deref(), &project.root)?;
    let base_branch = resolve_base_branch(cli.base_branch.as_deref(), &project.root)?;
    info!(%repo, %base_branch, root = %project.root.display(), "starting release run");

    let mut client = GitHubClient::new(repo.clone(), token)?;
    if let Some(api_url) = &cli.api_url {
        client = client.with_api_url(api_url)?;
    }

    let scm = select_scm(
        config.commit_mode(),
        &project.root,
        ProcessCommandRunner::new(),
        Some(client.clone()),
    )?;

    let operation = RunOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemChangesetIO::new(&project.root),
        FileSystemReleaseStateIO::new(),
        ProcessCommandRunner::new(),
        scm,
        client,
    );

    let outcome = operation.execute(&RunInput {
        start_path: project.root.clone(),
        base_branch,
        dry_run: cli.dry_run,
        identity: GitIdentity {
            name: cli.git_user_name.clone(),
            email: cli.git_user_email.clone(),
        },
        config,
        repository_url: Some(format!(
            "{}/{repo}",
            cli.server_url.trim_end_matches('/')
        )),
    })?;

    if let RunOutcome::Version(version) = &outcome {
        if version.pr_number.is_none() {
            println!("{}", version.body);
        }
    }

    write_outputs(&ActionOutputs::from_outcome(&outcome), cli.output_file.as_deref())
}

/// Command-line values take precedence over the manifest configuration.
fn apply_overrides(mut config: ReleaseConfig, cli: &Cli) -> ReleaseConfig {
    if let Some(command) = &cli.publish {
        config = config.with_publish_command(split_command(command));
    }
    if let Some(command) = &cli.version_command {
        config = config.with_version_command(split_command(command));
    }
    if let Some(title) = &cli.title {
        config = config.with_pr_title(title);
    }
    if let Some(message) = &cli.commit_message {
        config = config.with_commit_message(message);
    }
    if let Some(mode) = cli.commit_mode {
        config = config.with_commit_mode(mode);
    }
    if let Some(max) = cli.pr_body_max_chars {
        config = config.with_pr_body_max_chars(max);
    }
    if !cli.labels.is_empty() {
        config = config.with_labels(cli.labels.clone());
    }
    if cli.no_releases {
        config = config.with_create_releases(false);
    }
    if cli.no_setup_git_user {
        config = config.with_setup_git_user(false);
    }
    config
}

/// Whitespace-separated program and arguments; no shell quoting.
fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use release_core::CommitMode;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("changeset-release").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn flags_override_manifest_configuration() {
        let cli = parse(&[
            "--publish",
            "cargo workspaces publish --yes",
            "--title",
            "Release",
            "--commit-mode",
            "api",
            "--label",
            "release",
            "--label",
            "automated",
            "--no-releases",
        ]);

        let config = apply_overrides(ReleaseConfig::default(), &cli);

        assert_eq!(
            config.publish_command(),
            Some(
                &[
                    "cargo".to_string(),
                    "workspaces".to_string(),
                    "publish".to_string(),
                    "--yes".to_string(),
                ][..]
            )
        );
        assert_eq!(config.pr_title(), "Release");
        assert_eq!(config.commit_message(), "Version Packages");
        assert_eq!(config.commit_mode(), CommitMode::Api);
        assert_eq!(config.labels(), ["release".to_string(), "automated".to_string()]);
        assert!(!config.create_releases());
        assert!(config.setup_git_user());
    }

    #[test]
    fn absent_flags_keep_manifest_values() {
        let manifest = ReleaseConfig::default()
            .with_pr_title("From manifest")
            .with_labels(vec!["from-manifest".to_string()]);

        let config = apply_overrides(manifest.clone(), &parse(&[]));

        assert_eq!(config, manifest);
    }

    #[test]
    fn blank_publish_flag_is_ignored() {
        let config = apply_overrides(ReleaseConfig::default(), &parse(&["--publish", "  "]));

        assert!(config.publish_command().is_none());
    }

    #[test]
    fn unknown_commit_mode_is_rejected() {
        let result = Cli::try_parse_from(["changeset-release", "--commit-mode", "svn"]);

        assert!(result.is_err());
    }
}
