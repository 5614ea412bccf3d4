use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{CommandRunner, ScmAdapter};
use crate::types::{CommandOutput, CommandSpec, GitIdentity};

pub const DEFAULT_BOT_NAME: &str = "github-actions[bot]";
pub const DEFAULT_BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

const REMOTE: &str = "origin";

/// Drives the local `git` executable.
pub struct CliScm<C> {
    root: PathBuf,
    runner: C,
}

impl<C: CommandRunner> CliScm<C> {
    #[must_use]
    pub fn new(root: &Path, runner: C) -> Self {
        Self {
            root: root.to_path_buf(),
            runner,
        }
    }

    fn git_command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("git", &self.root).args(args)
    }

    fn try_git<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run(&self.git_command(args))
    }

    fn git<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = self.git_command(args);
        let output = self.runner.run(&command)?;
        if output.success {
            Ok(output)
        } else {
            Err(OperationError::CommandFailed {
                command: command.to_string(),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }
}

impl<C: CommandRunner> ScmAdapter for CliScm<C> {
    fn configure_identity(&self, identity: &GitIdentity) -> Result<()> {
        let name = identity.name.as_deref().unwrap_or(DEFAULT_BOT_NAME);
        let email = identity.email.as_deref().unwrap_or(DEFAULT_BOT_EMAIL);

        self.git(["config", "user.name", name])?;
        self.git(["config", "user.email", email])?;
        Ok(())
    }

    fn prepare_branch(&self, branch: &str) -> Result<()> {
        self.git(["checkout", "-B", branch])?;
        Ok(())
    }

    fn commit_all_and_push(&self, branch: &str, message: &str) -> Result<()> {
        self.git(["add", "-A"])?;

        let status = self.git(["status", "--porcelain"])?;
        if status.stdout.trim().is_empty() {
            debug!(branch, "nothing to commit");
        } else {
            self.git(["commit", "-m", message])?;
        }

        let refspec = format!("HEAD:refs/heads/{branch}");
        self.git(["push", REMOTE, refspec.as_str(), "--force"])?;
        info!(branch, "pushed version branch");
        Ok(())
    }

    fn push_tag(&self, tag: &str) -> Result<()> {
        let tag_ref = format!("refs/tags/{tag}");

        let exists = self
            .try_git(["rev-parse", "--quiet", "--verify", tag_ref.as_str()])?
            .success;
        if !exists {
            self.git(["tag", tag])?;
        }

        let command = self.git_command(["push", REMOTE, tag_ref.as_str()]);
        let output = self.runner.run(&command)?;
        if output.success {
            return Ok(());
        }

        if output.stderr.contains("already exists") {
            return Err(OperationError::TagAlreadyExists {
                tag: tag.to_string(),
            });
        }

        Err(OperationError::CommandFailed {
            command: command.to_string(),
            code: output.code,
            stderr: output.stderr,
        })
    }
}
