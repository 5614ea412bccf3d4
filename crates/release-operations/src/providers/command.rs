use std::process::Command;

use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::CommandRunner;
use crate::types::{CommandOutput, CommandSpec};

/// Runs commands as child processes, capturing stdout and stderr.
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        debug!(command = %command, cwd = %command.cwd.display(), "running command");

        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .output()
            .map_err(|source| OperationError::CommandSpawn {
                program: command.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captures_stdout_of_successful_command() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let spec = CommandSpec::new("git", dir.path()).arg("--version");

        let output = ProcessCommandRunner::new().run(&spec)?;

        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert!(output.stdout.starts_with("git version"));

        Ok(())
    }

    #[test]
    fn non_zero_exit_is_not_an_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let spec = CommandSpec::new("git", dir.path()).arg("not-a-git-command");

        let output = ProcessCommandRunner::new().run(&spec)?;

        assert!(!output.success);
        assert!(!output.stderr.is_empty());

        Ok(())
    }

    #[test]
    fn missing_program_is_a_spawn_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let spec = CommandSpec::new("definitely-not-an-installed-program", dir.path());

        let err = ProcessCommandRunner::new()
            .run(&spec)
            .expect_err("program does not exist");

        assert!(matches!(err, OperationError::CommandSpawn { .. }));

        Ok(())
    }
}
