mod changeset_io;
mod command;
mod github;
mod project;
mod release_state_io;
mod scm_api;
mod scm_cli;

use std::path::Path;

use release_core::CommitMode;
use tracing::info;

pub use changeset_io::FileSystemChangesetIO;
pub use command::ProcessCommandRunner;
pub use project::FileSystemProjectProvider;
pub use release_state_io::{FileSystemReleaseStateIO, PRE_STATE_FILENAME};
pub use scm_api::ApiScm;
pub use scm_cli::{CliScm, DEFAULT_BOT_EMAIL, DEFAULT_BOT_NAME};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{CommandRunner, GitDataApi, ScmAdapter};

/// Chooses the SCM adapter for a run. The choice is final: the returned
/// adapter uses one mechanism for every mutation.
///
/// # Errors
///
/// Returns [`OperationError::ApiModeRequiresToken`] when `mode` is
/// [`CommitMode::Api`] but no API client was supplied.
pub fn select_scm<C, A>(
    mode: CommitMode,
    root: &Path,
    runner: C,
    api: Option<A>,
) -> Result<Box<dyn ScmAdapter>>
where
    C: CommandRunner + 'static,
    A: GitDataApi + 'static,
{
    info!(%mode, "selected commit mode");
    match (mode, api) {
        (CommitMode::Cli, _) => Ok(Box::new(CliScm::new(root, runner))),
        (CommitMode::Api, Some(api)) => Ok(Box::new(ApiScm::new(root, api))),
        (CommitMode::Api, None) => Err(OperationError::ApiModeRequiresToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockCommandRunner, MockGitData};
    use crate::types::GitIdentity;
    use std::sync::Arc;

    #[test]
    fn cli_mode_runs_git() -> anyhow::Result<()> {
        let runner = Arc::new(MockCommandRunner::new());

        let scm = select_scm(
            CommitMode::Cli,
            Path::new("/repo"),
            Arc::clone(&runner),
            Some(Arc::new(MockGitData::new())),
        )?;
        scm.configure_identity(&GitIdentity::default())?;

        assert_eq!(runner.calls().len(), 2);

        Ok(())
    }

    #[test]
    fn api_mode_does_not_touch_local_git() -> anyhow::Result<()> {
        let runner = Arc::new(MockCommandRunner::new());

        let scm = select_scm(
            CommitMode::Api,
            Path::new("/repo"),
            Arc::clone(&runner),
            Some(Arc::new(MockGitData::new())),
        )?;
        scm.configure_identity(&GitIdentity::default())?;
        scm.prepare_branch("changeset-release/main")?;

        assert!(runner.calls().is_empty());

        Ok(())
    }

    #[test]
    fn api_mode_without_client_fails() {
        let result = select_scm::<_, Arc<MockGitData>>(
            CommitMode::Api,
            Path::new("/repo"),
            Arc::new(MockCommandRunner::new()),
            None,
        );

        assert!(matches!(result, Err(OperationError::ApiModeRequiresToken)));
    }
}
